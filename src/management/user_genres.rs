use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    config,
    enrichment::{GenreSet, UNKNOWN_GENRE},
    error::StoreError,
    types::EnrichedTrack,
};

type UserTags = BTreeMap<String, BTreeMap<String, Vec<String>>>;

/// Custom genre tags users attach to individual tracks.
#[async_trait]
pub trait UserGenreStore: Send + Sync {
    async fn get(&self, user_id: &str, track_id: &str) -> Result<Vec<String>, StoreError>;

    /// Adds a tag unless the track already has it (ignoring case).
    /// Returns the track's tags afterwards.
    async fn add(&self, user_id: &str, track_id: &str, genre: &str)
    -> Result<Vec<String>, StoreError>;

    /// Removes a tag (ignoring case). Removing a missing tag is a no-op.
    /// Returns the track's tags afterwards.
    async fn remove(
        &self,
        user_id: &str,
        track_id: &str,
        genre: &str,
    ) -> Result<Vec<String>, StoreError>;
}

/// [`UserGenreStore`] persisted to `user-genres.json` after every change.
pub struct UserGenreManager {
    path: PathBuf,
    tags: Mutex<UserTags>,
}

impl UserGenreManager {
    pub async fn load() -> Result<Self, StoreError> {
        Self::load_from(config::data_dir().join("user-genres.json")).await
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let tags = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => UserTags::new(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            tags: Mutex::new(tags),
        })
    }

    async fn persist(&self, tags: &UserTags) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(tags)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

/// Tags compare the way [`GenreSet`] does, by Unicode lowercase.
fn same_genre(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn require(value: &str, what: &str) -> Result<String, StoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(StoreError::Invalid(format!("{} is blank", what)));
    }
    Ok(value.to_string())
}

#[async_trait]
impl UserGenreStore for UserGenreManager {
    async fn get(&self, user_id: &str, track_id: &str) -> Result<Vec<String>, StoreError> {
        let user_id = require(user_id, "user id")?;
        let track_id = require(track_id, "track id")?;

        let tags = self.tags.lock().await;
        Ok(tags
            .get(&user_id)
            .and_then(|tracks| tracks.get(&track_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn add(
        &self,
        user_id: &str,
        track_id: &str,
        genre: &str,
    ) -> Result<Vec<String>, StoreError> {
        let user_id = require(user_id, "user id")?;
        let track_id = require(track_id, "track id")?;
        let genre = require(genre, "genre")?;

        let mut tags = self.tags.lock().await;
        let current = tags
            .get(&user_id)
            .and_then(|tracks| tracks.get(&track_id))
            .cloned()
            .unwrap_or_default();
        if current.iter().any(|g| same_genre(g, &genre)) {
            return Ok(current);
        }

        // memory only changes once the file write went through
        let mut updated: UserTags = tags.clone();
        let track_tags = updated
            .entry(user_id)
            .or_default()
            .entry(track_id)
            .or_default();
        track_tags.push(genre);
        let result = track_tags.clone();

        self.persist(&updated).await?;
        *tags = updated;
        Ok(result)
    }

    async fn remove(
        &self,
        user_id: &str,
        track_id: &str,
        genre: &str,
    ) -> Result<Vec<String>, StoreError> {
        let user_id = require(user_id, "user id")?;
        let track_id = require(track_id, "track id")?;
        let genre = require(genre, "genre")?;

        let mut tags = self.tags.lock().await;
        let Some(current) = tags.get(&user_id).and_then(|tracks| tracks.get(&track_id)) else {
            return Ok(Vec::new());
        };
        if !current.iter().any(|g| same_genre(g, &genre)) {
            return Ok(current.clone());
        }

        let mut updated: UserTags = tags.clone();
        let mut result = Vec::new();
        if let Some(tracks) = updated.get_mut(&user_id) {
            if let Some(track_tags) = tracks.get_mut(&track_id) {
                track_tags.retain(|g| !same_genre(g, &genre));
                result = track_tags.clone();
            }
            if result.is_empty() {
                tracks.remove(&track_id);
            }
            if tracks.is_empty() {
                updated.remove(&user_id);
            }
        }

        self.persist(&updated).await?;
        *tags = updated;
        Ok(result)
    }
}

/// Adds the user's own tags to enriched tracks. A track that only had the
/// placeholder genre gets the user's tags instead of it.
pub async fn apply_user_genres<S: UserGenreStore + ?Sized>(
    store: &S,
    user_id: &str,
    tracks: &mut [EnrichedTrack],
) -> Result<(), StoreError> {
    for enriched in tracks.iter_mut() {
        let Some(track_id) = enriched.track.id() else {
            continue;
        };

        let custom = store.get(user_id, track_id).await?;
        if custom.is_empty() {
            continue;
        }

        let custom: GenreSet = custom.into();
        if enriched.genres.len() == 1 && enriched.genres.contains(UNKNOWN_GENRE) {
            enriched.genres = custom;
        } else {
            enriched.genres.union_with(&custom);
        }
    }
    Ok(())
}
