#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use spopify::{
    enrichment::{PrimaryMetadataSource, SecondaryTagSource},
    error::SourceError,
    playlist::PlaylistProvider,
    types::{
        ArtistRef, CreatePlaylistResponse, Playlist, RemovalSelection, TrackEntry, UserProfile,
    },
};

// Helper function to create a playlist entry crediting the given artists
pub fn track(id: Option<&str>, position: usize, artists: &[(&str, &str)]) -> TrackEntry {
    TrackEntry {
        track_id: id.map(str::to_string),
        track_name: id.map(|i| format!("Song {}", i)).unwrap_or_default(),
        artists: artists
            .iter()
            .map(|(id, name)| ArtistRef::new(id, name))
            .collect(),
        position,
        uri: None,
    }
}

// Helper function to create a track list from ids, positions 0..n
pub fn tracks_from_ids(ids: &[Option<&str>]) -> Vec<TrackEntry> {
    ids.iter()
        .enumerate()
        .map(|(position, id)| track(*id, position, &[("a1", "Artist")]))
        .collect()
}

/// Primary source answering from a fixed table, recording each request.
#[derive(Default)]
pub struct MockPrimary {
    pub genres: HashMap<String, Vec<String>>,
    pub error: Option<SourceError>,
    pub requests: Mutex<Vec<Vec<String>>>,
}

impl MockPrimary {
    pub fn with(entries: &[(&str, &[&str])]) -> Self {
        Self {
            genres: entries
                .iter()
                .map(|(id, tags)| (id.to_string(), tags.iter().map(|t| t.to_string()).collect()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing(error: SourceError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PrimaryMetadataSource for MockPrimary {
    async fn genres_by_artist_ids(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<String>>, SourceError> {
        self.requests.lock().unwrap().push(ids.to_vec());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.genres.get(id).map(|g| (id.clone(), g.clone())))
            .collect())
    }
}

/// Secondary source answering by artist name.
#[derive(Default)]
pub struct MockSecondary {
    pub tags: HashMap<String, Vec<String>>,
    pub error: Option<SourceError>,
    pub requests: Mutex<Vec<String>>,
}

impl MockSecondary {
    pub fn with(entries: &[(&str, &[&str])]) -> Self {
        Self {
            tags: entries
                .iter()
                .map(|(name, tags)| {
                    (name.to_string(), tags.iter().map(|t| t.to_string()).collect())
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecondaryTagSource for MockSecondary {
    async fn top_tags(&self, artist_name: &str) -> Result<Vec<String>, SourceError> {
        self.requests.lock().unwrap().push(artist_name.to_string());
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.tags
            .get(artist_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(artist_name.to_string()))
    }
}

/// Playlist kept in memory. Removals really remove and renumber entries,
/// so stale positions show up as wrong results.
#[derive(Default)]
pub struct MemoryPlaylist {
    pub tracks: Mutex<Vec<TrackEntry>>,
    pub created: Mutex<Vec<(String, String, Vec<String>)>>,
    pub remove_calls: AtomicUsize,
    /// Remove requests beyond this many fail with `Unavailable`.
    pub fail_after: Option<usize>,
}

impl MemoryPlaylist {
    pub fn new(tracks: Vec<TrackEntry>) -> Self {
        Self {
            tracks: Mutex::new(tracks),
            ..Default::default()
        }
    }

    pub fn ids(&self) -> Vec<Option<String>> {
        self.tracks
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.track_id.clone())
            .collect()
    }
}

#[async_trait]
impl PlaylistProvider for MemoryPlaylist {
    async fn current_user(&self) -> Result<UserProfile, SourceError> {
        Ok(UserProfile {
            id: "user-1".to_string(),
            display_name: Some("Test User".to_string()),
        })
    }

    async fn user_playlists(&self) -> Result<Vec<Playlist>, SourceError> {
        Ok(Vec::new())
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackEntry>, SourceError> {
        if playlist_id == "missing" {
            return Err(SourceError::NotFound(playlist_id.to_string()));
        }
        Ok(self.tracks.lock().unwrap().clone())
    }

    async fn create_playlist(
        &self,
        _user_id: &str,
        name: &str,
        _description: &str,
    ) -> Result<CreatePlaylistResponse, SourceError> {
        let id = format!("new-{}", self.created.lock().unwrap().len());
        self.created
            .lock()
            .unwrap()
            .push((id.clone(), name.to_string(), Vec::new()));
        Ok(CreatePlaylistResponse {
            id,
            name: name.to_string(),
            external_urls: None,
        })
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SourceError> {
        let mut created = self.created.lock().unwrap();
        let Some(entry) = created.iter_mut().find(|(id, _, _)| id == playlist_id) else {
            return Err(SourceError::NotFound(playlist_id.to_string()));
        };
        entry.2.extend(uris.iter().cloned());
        Ok(())
    }

    async fn remove_positions(
        &self,
        _playlist_id: &str,
        selections: &[RemovalSelection],
    ) -> Result<(), SourceError> {
        let call = self.remove_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| call >= limit) {
            return Err(SourceError::Unavailable("remove failed".to_string()));
        }

        let mut tracks = self.tracks.lock().unwrap();
        let mut selections = selections.to_vec();
        selections.sort_by(|a, b| b.position.cmp(&a.position));
        for selection in selections {
            let matches = tracks
                .get(selection.position)
                .is_some_and(|t| t.uri().as_deref() == Some(selection.uri.as_str()));
            if !matches {
                return Err(SourceError::Malformed(format!(
                    "{} is not at position {}",
                    selection.uri, selection.position
                )));
            }
            tracks.remove(selection.position);
        }
        for (position, track) in tracks.iter_mut().enumerate() {
            track.position = position;
        }
        Ok(())
    }
}
