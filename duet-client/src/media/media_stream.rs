use crate::media::media_track::{MediaKind, MediaTrack};
use std::sync::{Arc, RwLock};

/// A set of tracks. Clones are read handles onto the same set.
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Arc<RwLock<Vec<MediaTrack>>>,
}

impl MediaStream {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tracks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> Vec<MediaTrack> {
        self.tracks.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn tracks_of(&self, kind: MediaKind) -> Vec<MediaTrack> {
        self.tracks()
            .into_iter()
            .filter(|t| t.kind() == kind)
            .collect()
    }

    /// Adds `track` unless a track with the same id is already present.
    pub fn add_track(&self, track: MediaTrack) -> bool {
        let mut tracks = self.tracks.write().unwrap_or_else(|e| e.into_inner());
        if tracks.iter().any(|t| t.id() == track.id()) {
            return false;
        }
        tracks.push(track);
        true
    }

    /// Stops every track. Safe to call more than once.
    pub fn stop_all(&self) {
        for track in self.tracks() {
            track.stop();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.read().unwrap_or_else(|e| e.into_inner()).is_empty()
    }

    /// True when both handles point at the same stream.
    pub fn same_as(&self, other: &MediaStream) -> bool {
        Arc::ptr_eq(&self.tracks, &other.tracks)
    }
}
