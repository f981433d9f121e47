use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{error, info, management::TokenManager, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    info!("Waiting for Spotify authorization in the browser...");

    let token = match spotify::auth::auth(shared_state).await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = TokenManager::new(token).persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}
