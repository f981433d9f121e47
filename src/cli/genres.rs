use tabled::Table;

use super::session::{enriched_tracks, session};
use crate::{
    enrichment::{
        CatalogStatus, GenreTaxonomy, catalog_status, filter_by_genres, genre_catalog,
        genre_counts,
    },
    error, info, playlist, success,
    types::{EnrichedTrack, GenreTableRow, TrackTableRow},
    utils, warning,
};

/// Counts tracks per genre. Only main genres unless `all` is set.
pub async fn genres(playlist_id: String, all: bool) {
    let session = session().await;
    let tracks = enriched_tracks(&session, &playlist_id).await;

    if !report_catalog(&tracks) {
        return;
    }

    let taxonomy = GenreTaxonomy::default();
    let rows: Vec<GenreTableRow> = genre_counts(&tracks)
        .into_iter()
        .filter(|(genre, _)| all || taxonomy.is_main_genre(genre))
        .map(|(genre, tracks)| GenreTableRow { genre, tracks })
        .collect();

    if rows.is_empty() {
        info!("No main genres found. Use --all to see every tag.");
        return;
    }

    println!("{}", Table::new(rows));
}

/// Lists the tracks having any of `selected` and optionally saves them as
/// a new playlist.
pub async fn filter(
    playlist_id: String,
    selected: Vec<String>,
    create: bool,
    name: Option<String>,
) {
    let session = session().await;
    let tracks = enriched_tracks(&session, &playlist_id).await;

    if !report_catalog(&tracks) {
        return;
    }

    let matching = filter_by_genres(&tracks, &selected);
    if matching.is_empty() {
        warning!("No tracks match {}.", selected.join(", "));
        return;
    }

    let rows: Vec<TrackTableRow> = matching.iter().map(|t| track_row(t)).collect();
    println!("{}", Table::new(rows));
    info!("{} of {} tracks match.", matching.len(), tracks.len());

    if !create {
        return;
    }

    let pb = utils::spinner("Creating playlist...");
    let created = playlist::create_from_tracks(
        &session.client,
        &session.user_id,
        &matching,
        &selected,
        name.as_deref(),
    )
    .await;
    pb.finish_and_clear();

    match created {
        Ok(created) => {
            let link = created
                .external_urls
                .and_then(|u| u.spotify)
                .unwrap_or(created.id);
            success!("Playlist \"{}\" created: {}", created.name, link);
        }
        Err(e) => error!("Failed to create playlist. Err: {}", e),
    }
}

/// Warns when there is nothing useful to pick from. Returns whether to go on.
fn report_catalog(tracks: &[EnrichedTrack]) -> bool {
    match catalog_status(&genre_catalog(tracks)) {
        CatalogStatus::Ready => true,
        CatalogStatus::OnlyUnknown => {
            warning!("No genre information could be found for any track of this playlist.");
            false
        }
        CatalogStatus::Empty => {
            warning!("The playlist has no tracks.");
            false
        }
    }
}

fn track_row(track: &EnrichedTrack) -> TrackTableRow {
    TrackTableRow {
        position: track.track.position,
        name: utils::truncate(&track.track.track_name, 40),
        artists: utils::truncate(&utils::join_artist_names(&track.track.artists), 40),
        genres: track.genres.iter().collect::<Vec<_>>().join(", "),
    }
}
