use serde::{Deserialize, Serialize};

/// An insertion-ordered set of genre labels compared case-insensitively.
///
/// The first spelling inserted wins: adding `"Rock"` to a set that already
/// holds `"rock"` is a no-op and the stored value stays `"rock"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct GenreSet(Vec<String>);

impl GenreSet {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(genre: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.insert(genre);
        set
    }

    /// Inserts a genre unless an equal one (ignoring case) is present.
    /// Blank values are ignored. Returns whether the set grew.
    pub fn insert(&mut self, genre: impl Into<String>) -> bool {
        let genre = genre.into();
        let genre = genre.trim();
        if genre.is_empty() || self.contains(genre) {
            return false;
        }
        self.0.push(genre.to_string());
        true
    }

    pub fn union_with(&mut self, other: &GenreSet) {
        for genre in &other.0 {
            self.insert(genre.as_str());
        }
    }

    pub fn contains(&self, genre: &str) -> bool {
        let needle = genre.trim().to_lowercase();
        self.0.iter().any(|g| g.to_lowercase() == needle)
    }

    pub fn is_superset_of(&self, other: &GenreSet) -> bool {
        other.iter().all(|g| self.contains(g))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for GenreSet {
    fn from(genres: Vec<String>) -> Self {
        genres.into_iter().collect()
    }
}

impl From<GenreSet> for Vec<String> {
    fn from(set: GenreSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for GenreSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = GenreSet::new();
        for genre in iter {
            set.insert(genre);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for GenreSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for genre in iter {
            self.insert(genre);
        }
    }
}

impl<'a> IntoIterator for &'a GenreSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
