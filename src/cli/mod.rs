//! # CLI Module
//!
//! User-facing commands. Each one loads what it needs, shows a spinner while
//! talking to Spotify or Last.fm, prints a table and reports the outcome
//! with the `success!`, `warning!` and `error!` macros. Fatal problems such
//! as a missing login end the process through `error!`.
//!
//! ## Commands
//!
//! - [`auth`] - log in with the OAuth 2.0 PKCE flow and store the token
//! - [`playlists`] - list the user's playlists
//! - [`genres`] - enrich a playlist and count tracks per genre
//! - [`filter`] - list (and optionally save) the tracks of chosen genres
//! - [`duplicates`] - show repeated entries of a playlist
//! - [`dedup`] - remove repeated entries, keeping each first occurrence
//! - [`list_tags`], [`add_tag`], [`remove_tag`] - manage the user's own tags
//! - [`list_fallback`], [`add_fallback`] - curate artist genres used when
//!   Spotify knows none
//! - [`serve`] - run the HTTP API
//!
//! ```text
//! CLI ──> enrichment / dedup / playlist ──> SpotifyClient, LastFmClient
//!                                     └───> management (token, stores)
//! ```

mod auth;
mod duplicates;
mod fallback;
mod genres;
mod playlists;
mod serve;
mod session;
mod tags;

pub use auth::auth;
pub use duplicates::{dedup, duplicates};
pub use fallback::{add_fallback, list_fallback};
pub use genres::{filter, genres};
pub use playlists::playlists;
pub use serve::serve;
pub use tags::{add_tag, list_tags, remove_tag};
