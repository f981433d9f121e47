use async_trait::async_trait;
use reqwest::Method;

use super::SpotifyClient;
use crate::{
    error::SourceError,
    playlist::{MAX_TRACKS_PER_REQUEST, PlaylistProvider},
    types::{
        AddTrackToPlaylistRequest, ArtistRef, CreatePlaylistRequest, CreatePlaylistResponse,
        Page, Playlist, PlaylistItem, RemovalSelection, RemoveTrackItem, RemoveTracksRequest,
        SnapshotResponse, TrackEntry, UserProfile,
    },
};

const PLAYLIST_PAGE_LIMIT: u32 = 50;
const TRACK_PAGE_LIMIT: u32 = 100;

impl SpotifyClient {
    /// Follows `next` links until the last page and returns every item.
    async fn collect_pages<T>(&self, first_url: String) -> Result<Vec<T>, SourceError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: Page<T> = self.get_json(&url).await?;
            items.extend(page.items);
            next = page.next;
        }

        Ok(items)
    }
}

fn to_track_entry(position: usize, item: PlaylistItem) -> TrackEntry {
    match item.track {
        Some(track) => TrackEntry {
            track_id: track.id,
            track_name: track.name,
            artists: track
                .artists
                .into_iter()
                .map(|a| ArtistRef {
                    artist_id: a.id,
                    artist_name: a.name.unwrap_or_default(),
                })
                .collect(),
            position,
            uri: track.uri,
        },
        None => TrackEntry {
            track_id: None,
            track_name: String::new(),
            artists: Vec::new(),
            position,
            uri: None,
        },
    }
}

/// Groups selections by uri the way `DELETE /playlists/{id}/tracks` expects,
/// keeping the first appearance order of each uri.
fn removal_request(
    selections: &[RemovalSelection],
    snapshot_id: Option<String>,
) -> RemoveTracksRequest {
    let mut tracks: Vec<RemoveTrackItem> = Vec::new();
    for selection in selections {
        match tracks.iter_mut().find(|t| t.uri == selection.uri) {
            Some(item) => item.positions.push(selection.position),
            None => tracks.push(RemoveTrackItem {
                uri: selection.uri.clone(),
                positions: vec![selection.position],
            }),
        }
    }

    RemoveTracksRequest {
        tracks,
        snapshot_id,
    }
}

#[async_trait]
impl PlaylistProvider for SpotifyClient {
    async fn current_user(&self) -> Result<UserProfile, SourceError> {
        self.get_json(&self.url("/me")).await
    }

    async fn user_playlists(&self) -> Result<Vec<Playlist>, SourceError> {
        self.collect_pages(self.url(&format!("/me/playlists?limit={}", PLAYLIST_PAGE_LIMIT)))
            .await
    }

    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackEntry>, SourceError> {
        let url = self.url(&format!(
            "/playlists/{}/tracks?limit={}",
            playlist_id, TRACK_PAGE_LIMIT
        ));
        let items: Vec<PlaylistItem> = self.collect_pages(url).await?;

        Ok(items
            .into_iter()
            .enumerate()
            .map(|(position, item)| to_track_entry(position, item))
            .collect())
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, SourceError> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: false,
            collaborative: false,
        };
        let url = self.url(&format!("/users/{}/playlists", user_id));
        self.send_json(Method::POST, &url, &body).await
    }

    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SourceError> {
        if uris.is_empty() {
            return Ok(());
        }
        if uris.len() > MAX_TRACKS_PER_REQUEST {
            return Err(SourceError::Malformed(format!(
                "{} tracks in one request, at most {} allowed",
                uris.len(),
                MAX_TRACKS_PER_REQUEST
            )));
        }

        let body = AddTrackToPlaylistRequest {
            uris: uris.to_vec(),
        };
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let _: SnapshotResponse = self.send_json(Method::POST, &url, &body).await?;
        Ok(())
    }

    async fn remove_positions(
        &self,
        playlist_id: &str,
        selections: &[RemovalSelection],
    ) -> Result<(), SourceError> {
        if selections.is_empty() {
            return Ok(());
        }
        if selections.len() > MAX_TRACKS_PER_REQUEST {
            return Err(SourceError::Malformed(format!(
                "{} removals in one request, at most {} allowed",
                selections.len(),
                MAX_TRACKS_PER_REQUEST
            )));
        }

        // positions are only meaningful against the version they were read from
        let current: SnapshotResponse = self
            .get_json(&self.url(&format!("/playlists/{}?fields=snapshot_id", playlist_id)))
            .await?;

        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let body = removal_request(selections, Some(current.snapshot_id));
        let _: SnapshotResponse = self.send_json(Method::DELETE, &url, &body).await?;
        Ok(())
    }
}
