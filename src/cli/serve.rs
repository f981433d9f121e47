use crate::{
    config, error, info,
    server::{AppState, build_router, serve as serve_router},
};

pub async fn serve() {
    let state = match AppState::from_env().await {
        Ok(state) => state,
        Err(e) => error!("Failed to prepare server. Err: {}", e),
    };

    info!("Listening on http://{}", config::server_addr());
    if let Err(e) = serve_router(build_router(state)).await {
        error!("Server stopped. Err: {}", e);
    }
}
