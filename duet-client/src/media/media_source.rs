use crate::error::MediaAccessError;
use crate::media::media_constraints::MediaConstraints;
use crate::media::media_devices::MediaDevices;
use crate::media::media_stream::MediaStream;
use crate::media::media_track::MediaKind;
use std::sync::Arc;
use tracing::info;

/// Owns the local camera+microphone stream for one session.
pub struct MediaSource {
    devices: Arc<dyn MediaDevices>,
    constraints: MediaConstraints,
    stream: Option<MediaStream>,
}

impl MediaSource {
    pub fn new(devices: Arc<dyn MediaDevices>, constraints: MediaConstraints) -> Self {
        Self {
            devices,
            constraints,
            stream: None,
        }
    }

    /// Returns the current stream, opening the devices only when there is
    /// none. Failures are returned as-is and never retried here.
    pub async fn acquire(&mut self) -> Result<MediaStream, MediaAccessError> {
        if let Some(stream) = &self.stream {
            return Ok(stream.clone());
        }

        let stream = self.devices.open(&self.constraints).await?;
        info!("Local media acquired ({} tracks)", stream.tracks().len());
        self.stream = Some(stream.clone());
        Ok(stream)
    }

    /// Stops every local track and forgets the stream.
    pub fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all();
            info!("Local media released");
        }
    }

    pub fn set_audio_enabled(&self, enabled: bool) {
        self.set_enabled(MediaKind::Audio, enabled);
    }

    pub fn set_video_enabled(&self, enabled: bool) {
        self.set_enabled(MediaKind::Video, enabled);
    }

    fn set_enabled(&self, kind: MediaKind, enabled: bool) {
        if let Some(stream) = &self.stream {
            for track in stream.tracks_of(kind) {
                track.set_enabled(enabled);
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    pub fn stream(&self) -> Option<&MediaStream> {
        self.stream.as_ref()
    }
}
