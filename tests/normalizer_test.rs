use spopify::enrichment::{GenreNormalizer, GenreTaxonomy, TagMatch};

#[test]
fn test_aliases_map_to_main_genres() {
    let normalizer = GenreNormalizer::default();

    assert_eq!(normalizer.normalize("Synthpop"), Some("pop".to_string()));
    assert_eq!(normalizer.normalize("  GRUNGE "), Some("rock".to_string()));
    assert_eq!(normalizer.normalize("trap"), Some("rap".to_string()));
    assert_eq!(
        normalizer.resolve("techno"),
        Some(("electronic".to_string(), TagMatch::Alias))
    );
}

#[test]
fn test_substring_match_follows_main_genre_order() {
    let normalizer = GenreNormalizer::default();

    // "pop" comes before "k-pop" in the main list
    assert_eq!(normalizer.normalize("k-pop"), Some("pop".to_string()));
    assert_eq!(
        normalizer.resolve("indietronica"),
        Some(("indie".to_string(), TagMatch::Substring))
    );
    assert_eq!(normalizer.normalize("Swedish Jazz"), Some("jazz".to_string()));
}

#[test]
fn test_unknown_tags_pass_through() {
    let normalizer = GenreNormalizer::default();

    assert_eq!(
        normalizer.resolve(" Sea Shanty "),
        Some(("Sea Shanty".to_string(), TagMatch::PassThrough))
    );
    assert_eq!(normalizer.normalize(""), None);
    assert_eq!(normalizer.normalize("   "), None);
}

#[test]
fn test_normalize_tags_collects_genres_and_unmapped() {
    let normalizer = GenreNormalizer::default();

    let tags = ["indie pop", "grunge", "Indie Pop", "seen live", "", "seen live"];
    let normalized = normalizer.normalize_tags(tags);

    assert_eq!(
        normalized.genres.as_slice(),
        &["pop".to_string(), "rock".to_string(), "seen live".to_string()]
    );
    assert_eq!(normalized.unmapped, vec!["seen live".to_string()]);
}

#[test]
fn test_custom_taxonomy() {
    let taxonomy = GenreTaxonomy::new([("Nu Gaze", "Shoegaze")], ["Shoegaze", "ambient", " "]);
    let normalizer = GenreNormalizer::new(taxonomy);

    assert_eq!(normalizer.taxonomy().main_genres(), &["shoegaze", "ambient"]);
    assert!(normalizer.taxonomy().is_main_genre(" AMBIENT"));
    assert_eq!(normalizer.normalize("nu gaze"), Some("shoegaze".to_string()));
    assert_eq!(normalizer.normalize("dark ambient"), Some("ambient".to_string()));
    // Default aliases are not part of a custom taxonomy
    assert_eq!(normalizer.normalize("synthpop"), Some("synthpop".to_string()));
}
