use std::collections::HashMap;

use super::{GenreTaxonomy, UNKNOWN_GENRE};
use crate::types::EnrichedTrack;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStatus {
    Ready,
    /// Every track ended up with the placeholder genre.
    OnlyUnknown,
    Empty,
}

/// Every distinct genre across the tracks, sorted ignoring case.
pub fn genre_catalog(tracks: &[EnrichedTrack]) -> Vec<String> {
    genre_counts(tracks).into_iter().map(|(g, _)| g).collect()
}

/// The catalog restricted to the taxonomy's main genres.
pub fn main_genre_catalog(tracks: &[EnrichedTrack], taxonomy: &GenreTaxonomy) -> Vec<String> {
    genre_catalog(tracks)
        .into_iter()
        .filter(|g| taxonomy.is_main_genre(g))
        .collect()
}

/// Distinct genres with the number of tracks carrying each, sorted by
/// genre ignoring case.
pub fn genre_counts(tracks: &[EnrichedTrack]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for genre in tracks.iter().flat_map(|t| t.genres.iter()) {
        counts
            .entry(genre.to_lowercase())
            .or_insert_with(|| (genre.to_string(), 0))
            .1 += 1;
    }

    let mut counts: Vec<(String, usize)> = counts.into_values().collect();
    counts.sort_by(|a, b| {
        a.0.to_lowercase()
            .cmp(&b.0.to_lowercase())
            .then_with(|| a.0.cmp(&b.0))
    });
    counts
}

pub fn catalog_status(catalog: &[String]) -> CatalogStatus {
    match catalog {
        [] => CatalogStatus::Empty,
        [only] if only.eq_ignore_ascii_case(UNKNOWN_GENRE) => CatalogStatus::OnlyUnknown,
        _ => CatalogStatus::Ready,
    }
}

/// Tracks carrying at least one of the selected genres, in playlist order.
/// An empty selection selects nothing.
pub fn filter_by_genres<'a>(
    tracks: &'a [EnrichedTrack],
    selected: &[String],
) -> Vec<&'a EnrichedTrack> {
    if selected.is_empty() {
        return Vec::new();
    }

    tracks
        .iter()
        .filter(|t| selected.iter().any(|genre| t.genres.contains(genre)))
        .collect()
}
