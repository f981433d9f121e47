use tabled::Table;

use crate::{error, info, management::FallbackGenreManager, success, types::FallbackTableRow};

async fn store() -> FallbackGenreManager {
    match FallbackGenreManager::load().await {
        Ok(store) => store,
        Err(e) => error!("Failed to load fallback genres. Err: {}", e),
    }
}

pub async fn list_fallback() {
    let store = store().await;
    if store.count() == 0 {
        info!("No fallback genres yet. Add some with spopify fallback add.");
        return;
    }

    let mut rows: Vec<FallbackTableRow> = store
        .records()
        .iter()
        .map(|r| FallbackTableRow {
            artist: r.name.clone(),
            genres: r.genres.join(", "),
        })
        .collect();
    rows.sort_by(|a, b| a.artist.to_lowercase().cmp(&b.artist.to_lowercase()));

    println!("{}", Table::new(rows));
    info!("{} artists with fallback genres.", store.count());
}

/// Sets the curated genres of an artist, replacing earlier ones.
pub async fn add_fallback(artist: String, genres: Vec<String>) {
    let genres: Vec<String> = genres
        .iter()
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    if genres.is_empty() {
        error!("Give at least one genre for {}.", artist.trim());
    }

    let mut store = store().await;
    if let Err(e) = store.upsert(&artist, genres.clone()) {
        error!("{}", e);
    }
    if let Err(e) = store.persist().await {
        error!("Failed to save fallback genres. Err: {}", e);
    }

    success!("{} now falls back to {}.", artist.trim(), genres.join(", "));
}
