use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::enrichment::GenreSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRef {
    #[serde(default)]
    pub artist_id: Option<String>,
    #[serde(default)]
    pub artist_name: String,
}

impl ArtistRef {
    pub fn new(artist_id: &str, artist_name: &str) -> Self {
        Self {
            artist_id: Some(artist_id.to_string()),
            artist_name: artist_name.to_string(),
        }
    }

    /// The artist id, if present and non-blank.
    pub fn id(&self) -> Option<&str> {
        self.artist_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// One entry of a playlist as fetched from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEntry {
    #[serde(default)]
    pub track_id: Option<String>,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub position: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl TrackEntry {
    /// The dedup key. Blank ids count as missing.
    pub fn id(&self) -> Option<&str> {
        self.track_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Provider uri of the entry, derived from the track id when the
    /// provider did not send one.
    pub fn uri(&self) -> Option<String> {
        self.uri
            .clone()
            .or_else(|| self.id().map(|id| format!("spotify:track:{}", id)))
    }

    /// Distinct artist ids credited on this entry, in credit order.
    pub fn artist_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.artists.iter().filter_map(ArtistRef::id) {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| {
                if a.artist_name.is_empty() {
                    "Unknown Artist"
                } else {
                    a.artist_name.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTrack {
    #[serde(flatten)]
    pub track: TrackEntry,
    pub genres: GenreSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateEntry {
    pub track_id: String,
    pub position: usize,
    pub name: String,
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub track_id: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalSelection {
    pub uri: String,
    pub position: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DedupPlan {
    pub keep_uris: Vec<String>,
    pub remove_list: Vec<RemovalSelection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackGenreRecord {
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtistsResponse {
    pub artists: Vec<Option<SpotifyArtist>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    pub snapshot_id: String,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<SpotifyTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uri: Option<String>,
    #[serde(default)]
    pub artists: Vec<SpotifyTrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrackArtist {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<RemoveTrackItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTrackItem {
    pub uri: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTagsResponse {
    #[serde(default)]
    pub toptags: Option<TopTags>,
    #[serde(default)]
    pub error: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopTags {
    #[serde(default)]
    pub tag: Vec<LastFmTag>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastFmTag {
    pub name: String,
    #[serde(default)]
    pub count: Option<u64>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: String,
    pub id: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub position: usize,
    pub name: String,
    pub artists: String,
    pub genres: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub tracks: usize,
}

#[derive(Tabled)]
pub struct DuplicateTableRow {
    pub position: usize,
    pub name: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct FallbackTableRow {
    pub artist: String,
    pub genres: String,
}
