//! # Spotify Integration Module
//!
//! Access to the Spotify Web API: the PKCE login flow and a token-bound
//! [`SpotifyClient`] that serves both seams the rest of the crate talks to.
//!
//! ```text
//! EnrichmentPipeline ──> PrimaryMetadataSource ─┐
//!                                               ├──> SpotifyClient ──> Web API
//! dedup / playlist   ──> PlaylistProvider ──────┘
//! ```
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 PKCE flow, code exchange and token refresh
//! - [`artists`] - `GET /artists?ids=` for artist genre tags
//! - [`playlist`] - paginated reads plus create, add and remove writes
//!
//! ## Error Mapping
//!
//! Every response passes through one status check:
//!
//! | Status | Error |
//! |--------|-------|
//! | 429 | [`SourceError::RateLimited`] with the `Retry-After` hint |
//! | 401 | [`SourceError::Unauthorized`] |
//! | 404 | [`SourceError::NotFound`] |
//! | 5xx | [`SourceError::Unavailable`] |
//! | other 4xx | [`SourceError::Malformed`] |
//!
//! A 502 Bad Gateway is retried twice after a 10 second pause before it is
//! reported. Rate limits are not retried here; the enrichment fetcher owns
//! that policy.
//!
//! ## API Coverage
//!
//! - `GET /me`
//! - `GET /me/playlists`
//! - `GET /playlists/{id}/tracks`
//! - `GET /artists?ids=...`
//! - `POST /users/{user_id}/playlists`
//! - `POST /playlists/{id}/tracks`
//! - `DELETE /playlists/{id}/tracks`
//! - `POST /api/token` (code exchange and refresh)
//!
//! [`SourceError::RateLimited`]: crate::error::SourceError::RateLimited
//! [`SourceError::Unauthorized`]: crate::error::SourceError::Unauthorized
//! [`SourceError::NotFound`]: crate::error::SourceError::NotFound
//! [`SourceError::Unavailable`]: crate::error::SourceError::Unavailable
//! [`SourceError::Malformed`]: crate::error::SourceError::Malformed

pub mod artists;
pub mod auth;
mod client;
pub mod playlist;

pub use client::SpotifyClient;
