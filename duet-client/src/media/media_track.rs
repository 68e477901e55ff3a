use crate::error::MediaAccessError;
use crate::peer::SendCaps;
use bytes::Bytes;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }

    pub(crate) fn from_codec_type(kind: RTPCodecType) -> Option<Self> {
        match kind {
            RTPCodecType::Audio => Some(MediaKind::Audio),
            RTPCodecType::Video => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub enum TrackSource {
    /// Outbound track fed by the local capture pipeline.
    Local(Arc<TrackLocalStaticSample>),
    /// Inbound track received from the other participant.
    Remote(Arc<TrackRemote>),
}

struct TrackInner {
    id: String,
    kind: MediaKind,
    source: TrackSource,
    enabled: AtomicBool,
    stopped: AtomicBool,
    send_caps: Mutex<Option<SendCaps>>,
}

/// One audio or video track. Clones share the same underlying track.
#[derive(Clone)]
pub struct MediaTrack {
    inner: Arc<TrackInner>,
}

impl MediaTrack {
    pub fn local(kind: MediaKind, track: Arc<TrackLocalStaticSample>) -> Self {
        use webrtc::track::track_local::TrackLocal;
        Self::with_source(track.id().to_owned(), kind, TrackSource::Local(track))
    }

    pub fn remote(kind: MediaKind, track: Arc<TrackRemote>) -> Self {
        Self::with_source(track.id(), kind, TrackSource::Remote(track))
    }

    fn with_source(id: String, kind: MediaKind, source: TrackSource) -> Self {
        Self {
            inner: Arc::new(TrackInner {
                id,
                kind,
                source,
                enabled: AtomicBool::new(true),
                stopped: AtomicBool::new(false),
                send_caps: Mutex::new(None),
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> MediaKind {
        self.inner.kind
    }

    pub fn source(&self) -> &TrackSource {
        &self.inner.source
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Returns `false` when the track was already stopped.
    pub fn stop(&self) -> bool {
        !self.inner.stopped.swap(true, Ordering::SeqCst)
    }

    /// Sender limits the peer connection asked the encoder to respect.
    pub fn send_caps(&self) -> Option<SendCaps> {
        *self
            .inner
            .send_caps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn set_send_caps(&self, caps: SendCaps) {
        *self
            .inner
            .send_caps
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(caps);
    }

    /// Feed one encoded frame into an outbound track.
    ///
    /// Returns `Ok(false)` when the sample was dropped because the track is
    /// disabled, stopped or inbound.
    pub async fn write_sample(&self, data: Bytes, duration: Duration) -> Result<bool, MediaAccessError> {
        let TrackSource::Local(track) = &self.inner.source else {
            return Ok(false);
        };
        if !self.is_enabled() || self.is_stopped() {
            return Ok(false);
        }

        track
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await
            .map_err(|e| MediaAccessError::Device(e.to_string()))?;
        Ok(true)
    }
}

impl fmt::Debug for MediaTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.inner.source {
            TrackSource::Local(_) => "local",
            TrackSource::Remote(_) => "remote",
        };
        f.debug_struct("MediaTrack")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .field("direction", &direction)
            .field("enabled", &self.is_enabled())
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
