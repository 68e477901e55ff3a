use crate::media::MediaStream;
use crate::peer::ConnectionState;
use duet_core::CallStatus;

/// Read-only snapshot of a call for the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct CallView {
    pub local_stream: Option<MediaStream>,
    pub remote_stream: Option<MediaStream>,
    pub media_ready: bool,
    pub in_call: bool,
    pub connection_state: ConnectionState,
    pub muted: bool,
    pub camera_off: bool,
    pub last_error: Option<String>,
    pub participant_count: usize,
    pub call_status: CallStatus,
    pub room_full: bool,
    /// An incoming-call prompt should be shown.
    pub incoming_call: bool,
    pub is_caller: bool,
    pub can_call: bool,
    pub can_end: bool,
}

impl CallView {
    pub fn connection_label(&self) -> &'static str {
        self.connection_state.label()
    }

    pub fn call_status_label(&self) -> &'static str {
        self.call_status.label()
    }
}
