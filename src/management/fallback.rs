use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    config,
    enrichment::FallbackGenreStore,
    error::{SourceError, StoreError},
    types::FallbackGenreRecord,
};

/// Curated artist genres kept in `fallback-genres.json`:
///
/// ```json
/// [{ "name": "Some Artist", "genres": ["indie", "folk"] }]
/// ```
pub struct FallbackGenreManager {
    path: PathBuf,
    records: Vec<FallbackGenreRecord>,
}

impl FallbackGenreManager {
    pub fn new(records: Vec<FallbackGenreRecord>) -> Self {
        Self {
            path: Self::default_path(),
            records,
        }
    }

    /// Loads the default file. A missing file yields an empty store.
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(Self::default_path()).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let records = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };
        Ok(Self { path, records })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.records)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Adds or replaces the record for an artist name (matched ignoring case).
    pub fn upsert(&mut self, name: &str, genres: Vec<String>) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("artist name is blank".to_string()));
        }

        let key = name.to_lowercase();
        match self
            .records
            .iter_mut()
            .find(|r| r.name.trim().to_lowercase() == key)
        {
            Some(record) => record.genres = genres,
            None => self.records.push(FallbackGenreRecord {
                name: name.to_string(),
                genres,
            }),
        }
        Ok(())
    }

    pub fn find(&self, names: &[String]) -> Vec<FallbackGenreRecord> {
        let wanted: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
        self.records
            .iter()
            .filter(|r| wanted.contains(&r.name.trim().to_lowercase()))
            .cloned()
            .collect()
    }

    pub fn records(&self) -> &[FallbackGenreRecord] {
        &self.records
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    fn default_path() -> PathBuf {
        config::data_dir().join("fallback-genres.json")
    }
}

#[async_trait]
impl FallbackGenreStore for FallbackGenreManager {
    async fn find_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<FallbackGenreRecord>, SourceError> {
        Ok(self.find(names))
    }
}
