/// `ideal`/`max` pair for one capture dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound {
    pub ideal: u32,
    pub max: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConstraints {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoConstraints {
    pub width: Bound,
    pub height: Bound,
    pub frame_rate: Bound,
}

/// What local capture is asked for. `None` means the kind is not requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: Option<AudioConstraints>,
    pub video: Option<VideoConstraints>,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: Some(AudioConstraints {
                echo_cancellation: true,
                noise_suppression: true,
            }),
            video: Some(VideoConstraints {
                width: Bound { ideal: 640, max: 854 },
                height: Bound { ideal: 360, max: 480 },
                frame_rate: Bound { ideal: 15, max: 20 },
            }),
        }
    }
}
