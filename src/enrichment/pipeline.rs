use std::{collections::HashMap, time::Duration};

use super::{
    BatchFetcher, FallbackGenreStore, GenreNormalizer, GenreSet, PrimaryMetadataSource,
    RetryPolicy, SecondaryTagSource,
};
use crate::{
    config,
    types::{EnrichedTrack, TrackEntry},
    warning,
};

/// Genre given to tracks no source knows anything about.
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub primary_batch_size: usize,
    pub primary_delay: Duration,
    pub secondary_small_batch: usize,
    pub secondary_large_batch: usize,
    /// Artist lists longer than this use `secondary_large_batch`.
    pub secondary_threshold: usize,
    pub secondary_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            primary_batch_size: 25,
            primary_delay: Duration::from_millis(500),
            secondary_small_batch: 5,
            secondary_large_batch: 3,
            secondary_threshold: 20,
            secondary_delay: Duration::from_millis(1000),
            retry: RetryPolicy::default(),
        }
    }
}

impl EnrichmentSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            primary_batch_size: config::env_or(
                "GENRE_PRIMARY_BATCH_SIZE",
                defaults.primary_batch_size,
            ),
            primary_delay: config::env_millis("GENRE_PRIMARY_DELAY_MS", defaults.primary_delay),
            secondary_small_batch: config::env_or(
                "GENRE_SECONDARY_SMALL_BATCH",
                defaults.secondary_small_batch,
            ),
            secondary_large_batch: config::env_or(
                "GENRE_SECONDARY_LARGE_BATCH",
                defaults.secondary_large_batch,
            ),
            secondary_threshold: config::env_or(
                "GENRE_SECONDARY_THRESHOLD",
                defaults.secondary_threshold,
            ),
            secondary_delay: config::env_millis(
                "GENRE_SECONDARY_DELAY_MS",
                defaults.secondary_delay,
            ),
            retry: RetryPolicy {
                max_attempts: config::env_or("GENRE_RETRY_ATTEMPTS", defaults.retry.max_attempts),
                base_delay: config::env_millis("GENRE_RETRY_DELAY_MS", defaults.retry.base_delay),
                respect_server_hint: true,
                max_server_hint: Duration::from_secs(config::env_or(
                    "GENRE_RETRY_MAX_HINT_SECS",
                    defaults.retry.max_server_hint.as_secs(),
                )),
            },
        }
    }

    pub fn secondary_batch_size(&self, artist_count: usize) -> usize {
        if artist_count > self.secondary_threshold {
            self.secondary_large_batch
        } else {
            self.secondary_small_batch
        }
    }
}

/// Genres resolved per artist id during one enrichment run.
///
/// Sources only fill entries that are still empty; propagation is applied
/// to track genre sets, never to this map, so entries never shrink.
#[derive(Debug, Default)]
pub struct ArtistGenreMap {
    genres: HashMap<String, GenreSet>,
}

impl ArtistGenreMap {
    pub fn get(&self, artist_id: &str) -> Option<&GenreSet> {
        self.genres.get(artist_id)
    }

    pub fn is_resolved(&self, artist_id: &str) -> bool {
        self.genres.get(artist_id).is_some_and(|g| !g.is_empty())
    }

    /// Stores `genres` for an unresolved artist. Empty sets and already
    /// resolved artists are left alone. Returns whether the entry was set.
    pub fn fill(&mut self, artist_id: &str, genres: GenreSet) -> bool {
        if genres.is_empty() || self.is_resolved(artist_id) {
            return false;
        }
        self.genres.insert(artist_id.to_string(), genres);
        true
    }

    /// Union of the genres of the given artists.
    pub fn union_of<'a>(&self, artist_ids: impl IntoIterator<Item = &'a str>) -> GenreSet {
        let mut union = GenreSet::new();
        for id in artist_ids {
            if let Some(genres) = self.genres.get(id) {
                union.union_with(genres);
            }
        }
        union
    }
}

#[derive(Debug, Clone)]
struct ArtistKey {
    id: String,
    name: String,
}

/// Resolves a genre set for every track of a playlist.
///
/// Stages run in order and each only touches what earlier stages left
/// unresolved: primary source by artist id, fallback store by artist name,
/// secondary tag source for artists of still-unknown tracks, then
/// propagation of each artist's best-known genres across its tracks.
pub struct EnrichmentPipeline<'a> {
    primary: &'a dyn PrimaryMetadataSource,
    secondary: &'a dyn SecondaryTagSource,
    fallback: &'a dyn FallbackGenreStore,
    normalizer: &'a GenreNormalizer,
    settings: &'a EnrichmentSettings,
}

impl<'a> EnrichmentPipeline<'a> {
    pub fn new(
        primary: &'a dyn PrimaryMetadataSource,
        secondary: &'a dyn SecondaryTagSource,
        fallback: &'a dyn FallbackGenreStore,
        normalizer: &'a GenreNormalizer,
        settings: &'a EnrichmentSettings,
    ) -> Self {
        Self {
            primary,
            secondary,
            fallback,
            normalizer,
            settings,
        }
    }

    /// Returns exactly one enriched track per input entry, in input order.
    /// Source failures degrade to missing data; they never abort the run.
    pub async fn enrich(&self, tracks: Vec<TrackEntry>) -> Vec<EnrichedTrack> {
        let artists = distinct_artists(&tracks);

        let map = ArtistGenreMap::default();
        let map = self.resolve_primary(map, &artists).await;
        let map = self.resolve_fallback(map, &artists).await;
        let genres = union_per_track(&map, &tracks);

        let map = self.resolve_secondary(map, &artists, &tracks, &genres).await;
        let genres = union_per_track(&map, &tracks);

        let genres = propagate(&tracks, genres);

        tracks
            .into_iter()
            .zip(genres)
            .map(|(track, genres)| EnrichedTrack {
                track,
                genres: if genres.is_empty() {
                    GenreSet::single(UNKNOWN_GENRE)
                } else {
                    genres
                },
            })
            .collect()
    }

    async fn resolve_primary(
        &self,
        mut map: ArtistGenreMap,
        artists: &[ArtistKey],
    ) -> ArtistGenreMap {
        if artists.is_empty() {
            return map;
        }

        let chunks: Vec<Vec<String>> = artists
            .chunks(self.settings.primary_batch_size.max(1))
            .map(|chunk| chunk.iter().map(|a| a.id.clone()).collect())
            .collect();

        // Each chunk is one request; chunks go out one at a time.
        let fetcher = BatchFetcher::new(
            "Spotify genre",
            1,
            self.settings.primary_delay,
            self.settings.retry.clone(),
        );
        let primary = self.primary;
        let results = fetcher
            .fetch(chunks, |ids| async move {
                primary.genres_by_artist_ids(&ids).await
            })
            .await;

        let mut unmapped: Vec<String> = Vec::new();
        for (_, by_artist) in results {
            for (artist_id, raw_tags) in by_artist {
                let normalized = self.normalizer.normalize_tags(&raw_tags);
                collect_unmapped(&mut unmapped, normalized.unmapped);
                map.fill(&artist_id, normalized.genres);
            }
        }
        report_unmapped("Spotify", &unmapped);

        map
    }

    async fn resolve_fallback(
        &self,
        mut map: ArtistGenreMap,
        artists: &[ArtistKey],
    ) -> ArtistGenreMap {
        let missing: Vec<&ArtistKey> = artists
            .iter()
            .filter(|a| !map.is_resolved(&a.id) && !a.name.trim().is_empty())
            .collect();
        if missing.is_empty() {
            return map;
        }

        let mut names: Vec<String> = Vec::new();
        for artist in &missing {
            let name = match_key(&artist.name);
            if !names.contains(&name) {
                names.push(name);
            }
        }

        let records = match self.fallback.find_by_names(&names).await {
            Ok(records) => records,
            Err(e) => {
                warning!("Failed to fetch fallback artist genres: {}", e);
                return map;
            }
        };

        for record in records {
            if record.genres.is_empty() {
                continue;
            }
            let record_name = match_key(&record.name);
            let genres: GenreSet = record.genres.iter().map(String::as_str).collect();
            for artist in missing.iter().filter(|a| match_key(&a.name) == record_name) {
                map.fill(&artist.id, genres.clone());
            }
        }

        map
    }

    async fn resolve_secondary(
        &self,
        mut map: ArtistGenreMap,
        artists: &[ArtistKey],
        tracks: &[TrackEntry],
        genres: &[GenreSet],
    ) -> ArtistGenreMap {
        let mut wanted: Vec<&str> = Vec::new();
        for (track, set) in tracks.iter().zip(genres) {
            if !set.is_empty() {
                continue;
            }
            for id in track.artist_ids() {
                if !wanted.contains(&id) {
                    wanted.push(id);
                }
            }
        }

        let to_fetch: Vec<ArtistKey> = artists
            .iter()
            .filter(|a| wanted.contains(&a.id.as_str()) && !a.name.trim().is_empty())
            .cloned()
            .collect();
        if to_fetch.is_empty() {
            return map;
        }

        let fetcher = BatchFetcher::new(
            "Last.fm tag",
            self.settings.secondary_batch_size(to_fetch.len()),
            self.settings.secondary_delay,
            self.settings.retry.clone(),
        );
        let secondary = self.secondary;
        let results = fetcher
            .fetch(to_fetch, |artist| async move {
                secondary.top_tags(&artist.name).await
            })
            .await;

        let mut unmapped: Vec<String> = Vec::new();
        for (artist, raw_tags) in results {
            let normalized = self.normalizer.normalize_tags(&raw_tags);
            collect_unmapped(&mut unmapped, normalized.unmapped);
            map.fill(&artist.id, normalized.genres);
        }
        report_unmapped("Last.fm", &unmapped);

        map
    }
}

/// Distinct artists across all tracks in first-credit order. The first
/// non-blank name seen for an id is kept.
fn distinct_artists(tracks: &[TrackEntry]) -> Vec<ArtistKey> {
    let mut artists: Vec<ArtistKey> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for artist in tracks.iter().flat_map(|t| t.artists.iter()) {
        let Some(id) = artist.id() else {
            continue;
        };
        let name = artist.artist_name.trim();
        match index.get(id) {
            Some(&i) => {
                if artists[i].name.is_empty() && !name.is_empty() {
                    artists[i].name = name.to_string();
                }
            }
            None => {
                index.insert(id.to_string(), artists.len());
                artists.push(ArtistKey {
                    id: id.to_string(),
                    name: name.to_string(),
                });
            }
        }
    }

    artists
}

fn union_per_track(map: &ArtistGenreMap, tracks: &[TrackEntry]) -> Vec<GenreSet> {
    tracks
        .iter()
        .map(|track| map.union_of(track.artist_ids()))
        .collect()
}

/// Widens every track's genres with the largest genre set seen on any track
/// crediting the same artist. Ties keep the earlier track's set.
fn propagate(tracks: &[TrackEntry], mut genres: Vec<GenreSet>) -> Vec<GenreSet> {
    let mut best: HashMap<&str, GenreSet> = HashMap::new();
    for (track, set) in tracks.iter().zip(&genres) {
        if set.is_empty() {
            continue;
        }
        for id in track.artist_ids() {
            let replace = best.get(id).is_none_or(|current| set.len() > current.len());
            if replace {
                best.insert(id, set.clone());
            }
        }
    }

    for (track, set) in tracks.iter().zip(genres.iter_mut()) {
        for id in track.artist_ids() {
            if let Some(propagated) = best.get(id) {
                set.union_with(propagated);
            }
        }
    }

    genres
}

fn match_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn collect_unmapped(all: &mut Vec<String>, found: Vec<String>) {
    for tag in found {
        if !all.contains(&tag) {
            all.push(tag);
        }
    }
}

fn report_unmapped(source: &str, unmapped: &[String]) {
    if !unmapped.is_empty() {
        warning!("Unmapped {} genres: {}", source, unmapped.join(", "));
    }
}
