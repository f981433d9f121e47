use std::collections::HashMap;

use super::GenreSet;

/// The closed list of top-level genres used for primary filtering.
///
/// Order matters: substring matching picks the first entry contained in a
/// tag, so `"k-pop"` resolves to `"pop"`.
pub const MAIN_GENRES: &[&str] = &[
    "pop",
    "rock",
    "hip hop",
    "r&b",
    "soul",
    "jazz",
    "blues",
    "country",
    "folk",
    "electronic",
    "dance",
    "indie",
    "alternative",
    "metal",
    "punk",
    "reggae",
    "classical",
    "funk",
    "disco",
    "rap",
    "latin",
    "k-pop",
    "world",
];

/// Sub-genre tags that map onto a main genre by exact (lowercase) match.
pub const GENRE_ALIASES: &[(&str, &str)] = &[
    ("indie pop", "pop"),
    ("pop rock", "pop"),
    ("electropop", "pop"),
    ("synthpop", "pop"),
    ("art pop", "pop"),
    ("folk pop", "pop"),
    ("dream pop", "pop"),
    ("bedroom pop", "pop"),
    ("hyperpop", "pop"),
    ("indie rock", "rock"),
    ("alternative rock", "rock"),
    ("psychedelic rock", "rock"),
    ("post-punk", "rock"),
    ("grunge", "rock"),
    ("shoegaze", "rock"),
    ("underground hip hop", "hip hop"),
    ("lo-fi hip hop", "hip hop"),
    ("alternative hip hop", "hip hop"),
    ("chillhop", "hip hop"),
    ("cloud rap", "rap"),
    ("gangsta rap", "rap"),
    ("trap", "rap"),
    ("boom bap", "rap"),
    ("mumble rap", "rap"),
    ("drill", "rap"),
    ("neo soul", "soul"),
    ("indie r&b", "r&b"),
    ("alt r&b", "r&b"),
    ("chill r&b", "r&b"),
    ("contemporary r&b", "r&b"),
    ("smooth jazz", "jazz"),
    ("fusion jazz", "jazz"),
    ("bluegrass", "country"),
    ("alt-country", "country"),
    ("indie folk", "folk"),
    ("folk rock", "folk"),
    ("techno", "electronic"),
    ("house", "electronic"),
    ("trance", "electronic"),
    ("dubstep", "electronic"),
    ("drum and bass", "electronic"),
    ("ambient", "electronic"),
    ("edm", "electronic"),
    ("future bass", "electronic"),
    ("synthwave", "electronic"),
    ("vaporwave", "electronic"),
    ("chillout", "electronic"),
    ("downtempo", "electronic"),
    ("trip hop", "electronic"),
    ("dance pop", "dance"),
    ("disco house", "dance"),
    ("garage", "dance"),
    ("ska", "punk"),
    ("emo", "punk"),
    ("hardcore punk", "punk"),
    ("death metal", "metal"),
    ("thrash metal", "metal"),
    ("black metal", "metal"),
    ("doom metal", "metal"),
    ("neo-psychedelia", "alternative"),
    ("experimental pop", "alternative"),
    ("lo-fi", "electronic"),
    ("latin pop", "latin"),
    ("reggaeton", "latin"),
    ("salsa", "latin"),
    ("bachata", "latin"),
    ("cumbia", "latin"),
    ("tropical", "latin"),
    ("korean pop", "k-pop"),
    ("j-pop", "world"),
    ("afrobeats", "world"),
    ("bollywood", "world"),
    ("bhangra", "world"),
    ("flamenco", "world"),
    ("samba", "world"),
    ("afrobeat", "world"),
];

/// Alias table and main-genre list a [`GenreNormalizer`] works against.
#[derive(Debug, Clone)]
pub struct GenreTaxonomy {
    aliases: HashMap<String, String>,
    main_genres: Vec<String>,
}

impl GenreTaxonomy {
    pub fn new<A, M, S>(aliases: A, main_genres: M) -> Self
    where
        A: IntoIterator<Item = (S, S)>,
        M: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(tag, genre)| {
                    (
                        tag.as_ref().trim().to_lowercase(),
                        genre.as_ref().trim().to_lowercase(),
                    )
                })
                .collect(),
            main_genres: main_genres
                .into_iter()
                .map(|g| g.as_ref().trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    pub fn main_genres(&self) -> &[String] {
        &self.main_genres
    }

    pub fn is_main_genre(&self, genre: &str) -> bool {
        let genre = genre.trim().to_lowercase();
        self.main_genres.iter().any(|g| *g == genre)
    }
}

impl Default for GenreTaxonomy {
    fn default() -> Self {
        Self::new(GENRE_ALIASES.iter().copied(), MAIN_GENRES.iter().copied())
    }
}

/// How a raw tag was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagMatch {
    Alias,
    Substring,
    PassThrough,
}

/// Result of normalizing a list of raw tags.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTags {
    pub genres: GenreSet,
    /// Raw tags that matched neither the alias table nor a main genre.
    pub unmapped: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GenreNormalizer {
    taxonomy: GenreTaxonomy,
}

impl GenreNormalizer {
    pub fn new(taxonomy: GenreTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &GenreTaxonomy {
        &self.taxonomy
    }

    /// Maps a raw tag onto the taxonomy. Unknown tags come back unchanged;
    /// only blank input yields `None`.
    pub fn normalize(&self, raw_tag: &str) -> Option<String> {
        self.resolve(raw_tag).map(|(genre, _)| genre)
    }

    pub fn resolve(&self, raw_tag: &str) -> Option<(String, TagMatch)> {
        let raw_tag = raw_tag.trim();
        if raw_tag.is_empty() {
            return None;
        }

        let lower = raw_tag.to_lowercase();
        if let Some(genre) = self.taxonomy.aliases.get(&lower) {
            return Some((genre.clone(), TagMatch::Alias));
        }

        if let Some(genre) = self
            .taxonomy
            .main_genres
            .iter()
            .find(|genre| lower.contains(genre.as_str()))
        {
            return Some((genre.clone(), TagMatch::Substring));
        }

        Some((raw_tag.to_string(), TagMatch::PassThrough))
    }

    pub fn normalize_tags<I, S>(&self, raw_tags: I) -> NormalizedTags
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = NormalizedTags::default();
        for raw in raw_tags {
            if let Some((genre, kind)) = self.resolve(raw.as_ref()) {
                if kind == TagMatch::PassThrough && !normalized.unmapped.contains(&genre) {
                    normalized.unmapped.push(genre.clone());
                }
                normalized.genres.insert(genre);
            }
        }
        normalized
    }
}
