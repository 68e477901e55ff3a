use crate::media::MediaKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationPreference {
    MaintainFramerate,
    MaintainResolution,
    Balanced,
}

/// Encoder limits applied to an outbound track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendCaps {
    pub max_bitrate_bps: u32,
    pub max_framerate: Option<u32>,
    pub degradation: Option<DegradationPreference>,
}

impl SendCaps {
    pub const VIDEO: SendCaps = SendCaps {
        max_bitrate_bps: 400_000,
        max_framerate: Some(20),
        degradation: Some(DegradationPreference::MaintainFramerate),
    };

    pub const AUDIO: SendCaps = SendCaps {
        max_bitrate_bps: 32_000,
        max_framerate: None,
        degradation: None,
    };

    pub fn for_kind(kind: MediaKind) -> SendCaps {
        match kind {
            MediaKind::Audio => Self::AUDIO,
            MediaKind::Video => Self::VIDEO,
        }
    }
}
