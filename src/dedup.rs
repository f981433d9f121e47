//! Duplicate detection and removal for playlist entries.
//!
//! Entries are grouped by track id. The entry with the lowest position in a
//! group is kept, every later one is a removal candidate. Entries without a
//! track id (local files, unavailable tracks) take no part in any of this.
//!
//! Removals are applied in descending position order so that positions of
//! the remaining candidates stay valid while the remote list shrinks.

use std::collections::{HashMap, HashSet};

use crate::{
    error::PlaylistError,
    playlist::{MAX_TRACKS_PER_REQUEST, PlaylistProvider},
    types::{DedupPlan, DuplicateEntry, DuplicateGroup, RemovalSelection, TrackEntry},
    warning,
};

/// Entries that carry a track id, ordered by position.
fn keyed_entries(tracks: &[TrackEntry]) -> Vec<(&str, &TrackEntry)> {
    let mut entries: Vec<(&str, &TrackEntry)> = tracks
        .iter()
        .filter_map(|t| t.id().map(|id| (id, t)))
        .collect();
    entries.sort_by_key(|(_, t)| t.position);
    entries
}

fn grouped(tracks: &[TrackEntry]) -> Vec<(&str, Vec<&TrackEntry>)> {
    let mut groups: Vec<(&str, Vec<&TrackEntry>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (id, track) in keyed_entries(tracks) {
        match index.get(id) {
            Some(&i) => groups[i].1.push(track),
            None => {
                index.insert(id, groups.len());
                groups.push((id, vec![track]));
            }
        }
    }

    groups
}

/// Track ids that occur more than once, with all their positions.
pub fn duplicate_groups(tracks: &[TrackEntry]) -> Vec<DuplicateGroup> {
    grouped(tracks)
        .into_iter()
        .filter(|(_, entries)| entries.len() > 1)
        .map(|(id, entries)| DuplicateGroup {
            track_id: id.to_string(),
            positions: entries.iter().map(|t| t.position).collect(),
        })
        .collect()
}

/// Every entry after the first occurrence of its track id, group by group
/// in first-seen order, ascending position within a group.
pub fn find_duplicates(tracks: &[TrackEntry]) -> Vec<DuplicateEntry> {
    grouped(tracks)
        .into_iter()
        .flat_map(|(id, entries)| {
            entries.into_iter().skip(1).map(move |t| DuplicateEntry {
                track_id: id.to_string(),
                position: t.position,
                name: t.track_name.clone(),
                artists: t.artists.clone(),
            })
        })
        .collect()
}

/// Splits the keyed entries into uris to keep and positions to remove.
/// The removal list is sorted by descending position.
pub fn deduplicate(tracks: &[TrackEntry]) -> DedupPlan {
    let mut plan = DedupPlan::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (id, track) in keyed_entries(tracks) {
        let uri = track
            .uri()
            .unwrap_or_else(|| format!("spotify:track:{}", id));
        if seen.insert(id) {
            plan.keep_uris.push(uri);
        } else {
            plan.remove_list.push(RemovalSelection {
                uri,
                position: track.position,
            });
        }
    }

    plan.remove_list.sort_by(|a, b| b.position.cmp(&a.position));
    plan
}

/// Rejects track lists in which two entries claim the same position.
pub fn validate_positions(tracks: &[TrackEntry]) -> Result<(), PlaylistError> {
    let mut seen: HashSet<usize> = HashSet::new();
    for track in tracks {
        if !seen.insert(track.position) {
            return Err(PlaylistError::MalformedInput(format!(
                "position {} occurs more than once",
                track.position
            )));
        }
    }
    Ok(())
}

/// Checks each selection against the track list and orders the result by
/// descending position. Repeated selections collapse into one.
pub fn plan_removal(
    tracks: &[TrackEntry],
    selections: &[RemovalSelection],
) -> Result<Vec<RemovalSelection>, PlaylistError> {
    validate_positions(tracks)?;
    let by_position: HashMap<usize, &TrackEntry> =
        tracks.iter().map(|t| (t.position, t)).collect();

    let mut planned: Vec<RemovalSelection> = Vec::with_capacity(selections.len());
    for selection in selections {
        let Some(track) = by_position.get(&selection.position) else {
            return Err(PlaylistError::MalformedInput(format!(
                "no entry at position {}",
                selection.position
            )));
        };
        if track.uri().as_deref() != Some(selection.uri.as_str()) {
            return Err(PlaylistError::MalformedInput(format!(
                "entry at position {} is not {}",
                selection.position, selection.uri
            )));
        }
        if !planned.contains(selection) {
            planned.push(selection.clone());
        }
    }

    planned.sort_by(|a, b| b.position.cmp(&a.position));
    Ok(planned)
}

/// Removes exactly the selected entries from the remote playlist and
/// returns how many were removed.
///
/// If a request fails after earlier ones went through, the outcome is a
/// single [`PlaylistError::RemovalFailed`]; the caller should query the
/// playlist again.
pub async fn remove_selected<P: PlaylistProvider + ?Sized>(
    provider: &P,
    playlist_id: &str,
    tracks: &[TrackEntry],
    selections: &[RemovalSelection],
) -> Result<usize, PlaylistError> {
    let planned = plan_removal(tracks, selections)?;
    let attempted = planned.len();
    let mut confirmed = 0;

    for chunk in planned.chunks(MAX_TRACKS_PER_REQUEST) {
        if let Err(e) = provider.remove_positions(playlist_id, chunk).await {
            warning!("Removing tracks from playlist {} failed: {}", playlist_id, e);
            if confirmed == 0 {
                return Err(match PlaylistError::from_source(e) {
                    PlaylistError::Source(_) => PlaylistError::RemovalFailed {
                        attempted,
                        confirmed,
                    },
                    other => other,
                });
            }
            return Err(PlaylistError::RemovalFailed {
                attempted,
                confirmed,
            });
        }
        confirmed += chunk.len();
    }

    Ok(confirmed)
}

/// Fetches the playlist and removes every repeated entry.
pub async fn deduplicate_playlist<P: PlaylistProvider + ?Sized>(
    provider: &P,
    playlist_id: &str,
) -> Result<usize, PlaylistError> {
    let tracks = provider
        .playlist_tracks(playlist_id)
        .await
        .map_err(PlaylistError::from_source)?;

    deduplicate_tracks(provider, playlist_id, &tracks).await
}

/// Removes every repeated entry of an already fetched track list.
pub async fn deduplicate_tracks<P: PlaylistProvider + ?Sized>(
    provider: &P,
    playlist_id: &str,
    tracks: &[TrackEntry],
) -> Result<usize, PlaylistError> {
    validate_positions(tracks)?;
    let plan = deduplicate(tracks);
    if plan.remove_list.is_empty() {
        return Ok(0);
    }

    remove_selected(provider, playlist_id, tracks, &plan.remove_list).await
}
