//! HTTP handlers of the local server.
//!
//! Routes are wired in [`crate::server::build_router`]. Handlers that touch
//! Spotify take the caller's access token from `Authorization: Bearer`.
//! Failures are returned as `{"error": "..."}`:
//!
//! | Failure | Status |
//! |---------|--------|
//! | malformed body, invalid positions or selections | 400 |
//! | missing or rejected token | 401 |
//! | unknown playlist | 404 |
//! | upstream failure, partial removal | 502 |

mod callback;
mod duplicates;
mod enrich;
mod error;
mod health;
mod playlists;
mod user_genres;

pub use callback::callback;
pub use duplicates::{
    DeduplicateRequest, DuplicatesRequest, RemoveRequest, RemovedResponse, deduplicate,
    duplicates, remove,
};
pub use enrich::{EnrichRequest, FilterRequest, enrich, filter};
pub use error::{ApiError, ApiJson, BearerToken};
pub use health::health;
pub use playlists::{playlist_tracks, playlists};
pub use user_genres::{
    UserGenreRequest, UserGenresResponse, UserQuery, add_user_genre, get_user_genres,
    remove_user_genre,
};
