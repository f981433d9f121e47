use async_trait::async_trait;

use crate::{
    error::{PlaylistError, SourceError},
    types::{
        CreatePlaylistResponse, EnrichedTrack, Playlist, RemovalSelection, TrackEntry,
        UserProfile,
    },
};

/// Most uris the provider accepts in one add or remove request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// Read and write access to the user's playlists on the streaming provider.
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    async fn current_user(&self) -> Result<UserProfile, SourceError>;

    async fn user_playlists(&self) -> Result<Vec<Playlist>, SourceError>;

    /// All entries of a playlist in order, positions numbered from 0.
    async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<TrackEntry>, SourceError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
    ) -> Result<CreatePlaylistResponse, SourceError>;

    /// Appends up to [`MAX_TRACKS_PER_REQUEST`] uris.
    async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> Result<(), SourceError>;

    /// Removes up to [`MAX_TRACKS_PER_REQUEST`] entries by position, applied
    /// in the order given.
    async fn remove_positions(
        &self,
        playlist_id: &str,
        selections: &[RemovalSelection],
    ) -> Result<(), SourceError>;
}

pub fn default_playlist_name(custom_name: Option<&str>, selected_genres: &[String]) -> String {
    if let Some(name) = custom_name.map(str::trim).filter(|n| !n.is_empty()) {
        return name.to_string();
    }

    if selected_genres.is_empty() {
        "My Filtered Playlist".to_string()
    } else {
        format!("My {} Playlist", selected_genres.join(", "))
    }
}

/// Creates a playlist holding the given tracks and returns it.
pub async fn create_from_tracks<P: PlaylistProvider + ?Sized>(
    provider: &P,
    user_id: &str,
    tracks: &[&EnrichedTrack],
    selected_genres: &[String],
    custom_name: Option<&str>,
) -> Result<CreatePlaylistResponse, PlaylistError> {
    let uris: Vec<String> = tracks.iter().filter_map(|t| t.track.uri()).collect();
    if uris.is_empty() {
        return Err(PlaylistError::MalformedInput(
            "No songs selected for the playlist.".to_string(),
        ));
    }

    let name = default_playlist_name(custom_name, selected_genres);
    let description = format!("{} tracks picked by genre with spopify", uris.len());

    let created = provider
        .create_playlist(user_id, &name, &description)
        .await
        .map_err(PlaylistError::from_source)?;

    for chunk in uris.chunks(MAX_TRACKS_PER_REQUEST) {
        provider
            .add_tracks(&created.id, chunk)
            .await
            .map_err(PlaylistError::from_source)?;
    }

    Ok(created)
}
