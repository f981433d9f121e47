use tabled::Table;

use super::session::{fetch_tracks, session};
use crate::{dedup, error, info, success, types::DuplicateTableRow, utils};

pub async fn duplicates(playlist_id: String) {
    let session = session().await;
    let tracks = fetch_tracks(&session, &playlist_id).await;

    if let Err(e) = dedup::validate_positions(&tracks) {
        error!("{}", e);
    }

    let found = dedup::find_duplicates(&tracks);
    if found.is_empty() {
        success!("No duplicates in this playlist.");
        return;
    }

    let rows: Vec<DuplicateTableRow> = found
        .iter()
        .map(|d| DuplicateTableRow {
            position: d.position,
            name: utils::truncate(&d.name, 40),
            artists: utils::truncate(&utils::join_artist_names(&d.artists), 40),
        })
        .collect();

    println!("{}", Table::new(rows));
    info!(
        "{} duplicate entries. Run spopify dedup {} to remove them.",
        found.len(),
        playlist_id
    );
}

pub async fn dedup(playlist_id: String) {
    let session = session().await;
    let tracks = fetch_tracks(&session, &playlist_id).await;

    let pb = utils::spinner("Removing duplicates...");
    let result = dedup::deduplicate_tracks(&session.client, &playlist_id, &tracks).await;
    pb.finish_and_clear();

    match result {
        Ok(0) => success!("No duplicates in this playlist."),
        Ok(removed) => success!("Removed {} duplicate entries.", removed),
        Err(e) => error!("Failed to remove duplicates. Err: {}", e),
    }
}
