use crate::error::CallError;
use tokio::sync::oneshot;

pub type CallReply = oneshot::Sender<Result<(), CallError>>;

/// User intents, processed in order by the session actor.
#[derive(Debug)]
pub enum CallCommand {
    Call { reply: CallReply },
    Accept { reply: CallReply },
    Decline { reply: CallReply },
    End { reply: CallReply },
    ToggleMute { reply: CallReply },
    ToggleCamera { reply: CallReply },
    NetworkOnline { reply: CallReply },
}
