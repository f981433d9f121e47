//! Collaborator traits the enrichment pipeline resolves genres through.
//!
//! Production implementations live in [`crate::spotify`], [`crate::lastfm`]
//! and [`crate::management`]; tests substitute in-memory versions.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{error::SourceError, types::FallbackGenreRecord};

/// Artist genres keyed by artist id (the streaming provider's own data).
#[async_trait]
pub trait PrimaryMetadataSource: Send + Sync {
    /// Raw genre tags for up to one chunk of artist ids. Unknown ids are
    /// simply absent from the result.
    async fn genres_by_artist_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, SourceError>;
}

/// Free-text tag service looked up by artist name, one artist per call.
#[async_trait]
pub trait SecondaryTagSource: Send + Sync {
    async fn top_tags(&self, artist_name: &str) -> Result<Vec<String>, SourceError>;
}

/// Curated artist-name to genre table.
#[async_trait]
pub trait FallbackGenreStore: Send + Sync {
    /// Records whose name equals one of `names`, ignoring case and
    /// surrounding whitespace.
    async fn find_by_names(&self, names: &[String])
    -> Result<Vec<FallbackGenreRecord>, SourceError>;
}
