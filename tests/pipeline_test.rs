mod common;

use std::time::Duration;

use common::{MockPrimary, MockSecondary, track};
use spopify::enrichment::*;
use spopify::error::SourceError;
use spopify::management::FallbackGenreManager;
use spopify::types::{EnrichedTrack, FallbackGenreRecord, TrackEntry};

// Helper function for settings without pauses between batches
fn fast_settings() -> EnrichmentSettings {
    EnrichmentSettings {
        primary_delay: Duration::ZERO,
        secondary_delay: Duration::ZERO,
        ..Default::default()
    }
}

// Helper function to create a fallback record
fn record(name: &str, genres: &[&str]) -> FallbackGenreRecord {
    FallbackGenreRecord {
        name: name.to_string(),
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}

async fn run(
    primary: &MockPrimary,
    secondary: &MockSecondary,
    fallback: &FallbackGenreManager,
    tracks: Vec<TrackEntry>,
) -> Vec<EnrichedTrack> {
    let normalizer = GenreNormalizer::default();
    let settings = fast_settings();
    EnrichmentPipeline::new(primary, secondary, fallback, &normalizer, &settings)
        .enrich(tracks)
        .await
}

fn genres_of(track: &EnrichedTrack) -> Vec<String> {
    let mut genres: Vec<String> = track.genres.iter().map(str::to_lowercase).collect();
    genres.sort();
    genres
}

#[tokio::test]
async fn test_empty_playlist() {
    let enriched = run(
        &MockPrimary::default(),
        &MockSecondary::default(),
        &FallbackGenreManager::new(Vec::new()),
        Vec::new(),
    )
    .await;
    assert!(enriched.is_empty());
}

#[tokio::test]
async fn test_order_and_length_are_preserved() {
    let tracks = vec![
        track(Some("t3"), 3, &[("a1", "One")]),
        track(None, 0, &[]),
        track(Some("t1"), 1, &[("a2", "Two")]),
        track(Some("t1"), 2, &[("a1", "One")]),
    ];
    let primary = MockPrimary::with(&[("a1", &["synthpop"])]);

    let enriched = run(
        &primary,
        &MockSecondary::default(),
        &FallbackGenreManager::new(Vec::new()),
        tracks.clone(),
    )
    .await;

    assert_eq!(enriched.len(), tracks.len());
    for (out, input) in enriched.iter().zip(&tracks) {
        assert_eq!(&out.track, input);
        assert!(!out.genres.is_empty());
    }
    assert_eq!(genres_of(&enriched[0]), vec!["pop"]);
    assert_eq!(genres_of(&enriched[1]), vec!["unknown genre"]);
    assert_eq!(genres_of(&enriched[2]), vec!["unknown genre"]);
}

#[tokio::test]
async fn test_primary_tags_are_normalized() {
    let primary = MockPrimary::with(&[("a1", &["Indie Pop", "grunge", "sea shanty"])]);

    let enriched = run(
        &primary,
        &MockSecondary::default(),
        &FallbackGenreManager::new(Vec::new()),
        vec![track(Some("t1"), 0, &[("a1", "One")])],
    )
    .await;

    assert_eq!(genres_of(&enriched[0]), vec!["pop", "rock", "sea shanty"]);
}

#[tokio::test]
async fn test_primary_requests_are_chunked() {
    let tracks: Vec<TrackEntry> = (0..60)
        .map(|i| {
            let track_id = format!("t{}", i);
            let artist_id = format!("a{}", i);
            track(Some(track_id.as_str()), i, &[(artist_id.as_str(), "Someone")])
        })
        .collect();
    let primary = MockPrimary::default();

    run(
        &primary,
        &MockSecondary::default(),
        &FallbackGenreManager::new(Vec::new()),
        tracks,
    )
    .await;

    let sizes: Vec<usize> = primary
        .requests
        .lock()
        .unwrap()
        .iter()
        .map(|ids| ids.len())
        .collect();
    assert_eq!(sizes, vec![25, 25, 10]);
}

#[tokio::test]
async fn test_fallback_fills_unresolved_artists() {
    let primary = MockPrimary::with(&[("a1", &["rock"])]);
    let fallback = FallbackGenreManager::new(vec![
        record("  the two  ", &["Shoegaze Revival"]),
        record("One", &["jazz"]),
    ]);

    let enriched = run(
        &primary,
        &MockSecondary::default(),
        &fallback,
        vec![
            track(Some("t1"), 0, &[("a1", "One")]),
            track(Some("t2"), 1, &[("a2", "The Two")]),
        ],
    )
    .await;

    // Resolved artists keep their primary genres
    assert_eq!(genres_of(&enriched[0]), vec!["rock"]);
    // Curated genres are used as they are
    assert_eq!(genres_of(&enriched[1]), vec!["shoegaze revival"]);
}

#[tokio::test]
async fn test_secondary_only_for_tracks_still_unknown() {
    let primary = MockPrimary::with(&[("a1", &["rock"])]);
    let secondary = MockSecondary::with(&[("Two", &["dream pop", "shoegaze"]), ("One", &["jazz"])]);

    let enriched = run(
        &primary,
        &secondary,
        &FallbackGenreManager::new(Vec::new()),
        vec![
            track(Some("t1"), 0, &[("a1", "One")]),
            track(Some("t2"), 1, &[("a2", "Two")]),
        ],
    )
    .await;

    assert_eq!(secondary.requested(), vec!["Two"]);
    assert_eq!(genres_of(&enriched[0]), vec!["rock"]);
    assert_eq!(genres_of(&enriched[1]), vec!["pop", "rock"]);
}

#[tokio::test]
async fn test_genres_propagate_across_tracks_of_an_artist() {
    let primary = MockPrimary::with(&[("a1", &["pop"])]);

    let enriched = run(
        &primary,
        &MockSecondary::default(),
        &FallbackGenreManager::new(Vec::new()),
        vec![
            track(Some("t1"), 0, &[("a1", "One"), ("a2", "Two")]),
            track(Some("t2"), 1, &[("a2", "Two")]),
        ],
    )
    .await;

    // a2 is unknown everywhere but shares a track with a1
    assert_eq!(genres_of(&enriched[1]), vec!["pop"]);

    // Every track of an artist ends up with at least the genres of any
    // other track of that artist
    for (i, a) in enriched.iter().enumerate() {
        for b in enriched.iter().skip(i + 1) {
            let shared = a
                .track
                .artist_ids()
                .iter()
                .any(|id| b.track.artist_ids().contains(id));
            if shared {
                assert!(a.genres.is_superset_of(&b.genres) || b.genres.is_superset_of(&a.genres));
            }
        }
    }
}

#[tokio::test]
async fn test_source_failures_degrade_to_unknown() {
    let primary = MockPrimary::failing(SourceError::Unavailable("down".to_string()));
    let secondary = MockSecondary {
        error: Some(SourceError::Unavailable("down".to_string())),
        ..Default::default()
    };

    let enriched = run(
        &primary,
        &secondary,
        &FallbackGenreManager::new(vec![record("Two", &["folk"])]),
        vec![
            track(Some("t1"), 0, &[("a1", "One")]),
            track(Some("t2"), 1, &[("a2", "Two")]),
        ],
    )
    .await;

    assert_eq!(primary.request_count(), 1);
    assert_eq!(genres_of(&enriched[0]), vec!["unknown genre"]);
    assert_eq!(genres_of(&enriched[1]), vec!["folk"]);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_primary_is_retried_then_skipped() {
    let primary = MockPrimary::failing(SourceError::RateLimited { retry_after: None });
    let secondary = MockSecondary::with(&[("One", &["techno"])]);

    let enriched = run(
        &primary,
        &secondary,
        &FallbackGenreManager::new(Vec::new()),
        vec![track(Some("t1"), 0, &[("a1", "One")])],
    )
    .await;

    assert_eq!(primary.request_count(), 3);
    assert_eq!(genres_of(&enriched[0]), vec!["electronic"]);
}
