use crate::error::MediaAccessError;
use crate::media::media_constraints::MediaConstraints;
use crate::media::media_stream::MediaStream;
use crate::media::media_track::{MediaKind, MediaTrack};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Access to local capture devices.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn open(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaAccessError>;
}

/// Devices backed by webrtc-rs sample tracks (Opus audio, VP8 video).
///
/// Frames come from an external capture pipeline through
/// [`MediaTrack::write_sample`].
#[derive(Debug, Clone)]
pub struct SampleTrackDevices {
    audio: bool,
    video: bool,
}

impl Default for SampleTrackDevices {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

impl SampleTrackDevices {
    pub fn without_audio(mut self) -> Self {
        self.audio = false;
        self
    }

    pub fn without_video(mut self) -> Self {
        self.video = false;
        self
    }

    fn sample_track(kind: MediaKind, stream_id: &str) -> MediaTrack {
        let capability = match kind {
            MediaKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                ..Default::default()
            },
            MediaKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        };

        let track = TrackLocalStaticSample::new(
            capability,
            format!("{}-{}", kind, Uuid::new_v4()),
            stream_id.to_owned(),
        );
        MediaTrack::local(kind, Arc::new(track))
    }
}

#[async_trait]
impl MediaDevices for SampleTrackDevices {
    async fn open(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaAccessError> {
        if constraints.audio.is_some() && !self.audio {
            return Err(MediaAccessError::NoDevice(MediaKind::Audio));
        }
        if constraints.video.is_some() && !self.video {
            return Err(MediaAccessError::NoDevice(MediaKind::Video));
        }

        let stream = MediaStream::new(format!("local-{}", Uuid::new_v4()));
        if constraints.audio.is_some() {
            stream.add_track(Self::sample_track(MediaKind::Audio, stream.id()));
        }
        if constraints.video.is_some() {
            stream.add_track(Self::sample_track(MediaKind::Video, stream.id()));
        }

        debug!("Opened local stream {} with {} tracks", stream.id(), stream.tracks().len());
        Ok(stream)
    }
}
