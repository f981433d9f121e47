//! # Genre Enrichment
//!
//! Turns a raw playlist into tracks tagged with genres, combining three
//! sources behind narrow traits:
//!
//! ```text
//! TrackEntry[] ──► primary source (artist ids, batched by 25)
//!                     ↓ unresolved artists
//!                  fallback store (artist names, curated)
//!                     ↓ artists of tracks still without genres
//!                  secondary tag source (artist names, throttled)
//!                     ↓
//!                  same-artist propagation ──► EnrichedTrack[]
//! ```
//!
//! Raw tags from the external sources go through [`GenreNormalizer`]; the
//! curated fallback store is trusted as is. Anything left without a genre
//! gets [`UNKNOWN_GENRE`].
//!
//! All remote calls go through [`BatchFetcher`], which throttles batches,
//! retries rate-limited calls and degrades failing items to empty results.

mod fetcher;
mod filter;
mod genre_set;
mod normalizer;
mod pipeline;
mod sources;

pub use fetcher::{BatchFetcher, RetryPolicy, call_with_retry, fetch_batched};
pub use filter::{
    CatalogStatus, catalog_status, filter_by_genres, genre_catalog, genre_counts,
    main_genre_catalog,
};
pub use genre_set::GenreSet;
pub use normalizer::{
    GENRE_ALIASES, GenreNormalizer, GenreTaxonomy, MAIN_GENRES, NormalizedTags, TagMatch,
};
pub use pipeline::{ArtistGenreMap, EnrichmentPipeline, EnrichmentSettings, UNKNOWN_GENRE};
pub use sources::{FallbackGenreStore, PrimaryMetadataSource, SecondaryTagSource};
