mod auth;
mod fallback;
mod user_genres;

pub use auth::TokenManager;
pub use fallback::FallbackGenreManager;
pub use user_genres::{UserGenreManager, UserGenreStore, apply_user_genres};
