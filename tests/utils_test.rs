use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use spopify::types::ArtistRef;
use spopify::utils::*;
use std::time::Duration;

// Helper function to create an artist credit
fn create_test_artist(id: Option<&str>, name: &str) -> ArtistRef {
    ArtistRef {
        artist_id: id.map(str::to_string),
        artist_name: name.to_string(),
    }
}

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should be deterministic - same input produces same output
    assert_eq!(challenge, generate_code_challenge(verifier));
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // Should be base64-encoded (URL-safe, no padding)
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_code_challenge_matches_rfc7636_example() {
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_parse_retry_after_seconds() {
    let now = Utc::now();
    assert_eq!(parse_retry_after("7", now), Some(Duration::from_secs(7)));
    assert_eq!(parse_retry_after("0", now), Some(Duration::ZERO));
    assert_eq!(parse_retry_after("soon", now), None);
}

#[test]
fn test_parse_retry_after_http_date() {
    let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 30).unwrap();
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
        Some(Duration::from_secs(30))
    );

    // A date in the past means retry right away
    let later = Utc.with_ymd_and_hms(2015, 10, 21, 8, 0, 0).unwrap();
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", later),
        Some(Duration::ZERO)
    );
}

#[test]
fn test_retry_after_header() {
    let mut headers = HeaderMap::new();
    assert_eq!(retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static(" 12 "));
    assert_eq!(retry_after(&headers), Some(Duration::from_secs(12)));
}

#[test]
fn test_join_artist_names() {
    let artists = vec![
        create_test_artist(Some("a1"), "Daft Punk"),
        create_test_artist(None, "  "),
        create_test_artist(None, "Pharrell Williams"),
    ];
    assert_eq!(join_artist_names(&artists), "Daft Punk, Pharrell Williams");
    assert_eq!(join_artist_names(&[]), "");
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("a longer title", 6), "a lon…");
    // Counts characters, not bytes
    assert_eq!(truncate("Björk Guðmundsdóttir", 6), "Björk…");
}
