use crate::{
    config, error, info,
    management::{UserGenreManager, UserGenreStore},
    success,
};

async fn store() -> UserGenreManager {
    match UserGenreManager::load().await {
        Ok(store) => store,
        Err(e) => error!("Failed to load custom tags. Err: {}", e),
    }
}

/// Tags are kept per Spotify user. Without `SPOTIFY_USER_ID` the profile
/// of the logged-in user is asked for.
async fn user_id() -> String {
    if let Some(id) = config::spotify_user() {
        return id;
    }
    super::session::session().await.user_id
}

fn print_tags(track_id: &str, tags: &[String]) {
    if tags.is_empty() {
        info!("Track {} has no custom tags.", track_id);
    } else {
        info!("Track {}: {}", track_id, tags.join(", "));
    }
}

pub async fn list_tags(track_id: String) {
    let user_id = user_id().await;
    match store().await.get(&user_id, &track_id).await {
        Ok(tags) => print_tags(&track_id, &tags),
        Err(e) => error!("{}", e),
    }
}

pub async fn add_tag(track_id: String, genre: String) {
    let user_id = user_id().await;
    match store().await.add(&user_id, &track_id, &genre).await {
        Ok(tags) => {
            success!("Tagged {} with {}.", track_id, genre.trim());
            print_tags(&track_id, &tags);
        }
        Err(e) => error!("{}", e),
    }
}

pub async fn remove_tag(track_id: String, genre: String) {
    let user_id = user_id().await;
    match store().await.remove(&user_id, &track_id, &genre).await {
        Ok(tags) => {
            success!("Removed {} from {}.", genre.trim(), track_id);
            print_tags(&track_id, &tags);
        }
        Err(e) => error!("{}", e),
    }
}
