use tabled::Table;

use super::session::session;
use crate::{error, info, playlist::PlaylistProvider, types::PlaylistTableRow, utils};

pub async fn playlists(search: Option<String>) {
    let session = session().await;

    let pb = utils::spinner("Fetching playlists...");
    let result = session.client.user_playlists().await;
    pb.finish_and_clear();

    let mut playlists = match result {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to fetch playlists. Err: {}", e),
    };

    if let Some(search) = search {
        let term = search.to_lowercase();
        playlists.retain(|p| p.name.to_lowercase().contains(&term));
    }

    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: utils::truncate(&p.name, 50),
            tracks: p
                .tracks
                .map(|t| t.total.to_string())
                .unwrap_or_else(|| "-".to_string()),
            id: p.id,
        })
        .collect();

    println!("{}", Table::new(rows));
}
