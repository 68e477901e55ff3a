use crate::error::CallError;
use crate::session::call_command::{CallCommand, CallReply};
use crate::session::call_view::CallView;
use duet_core::ClientId;
use tokio::sync::{mpsc, oneshot, watch};

/// Cloneable front of a running [`CallSession`](crate::session::CallSession).
#[derive(Clone)]
pub struct CallHandle {
    local_id: ClientId,
    commands: mpsc::Sender<CallCommand>,
    view: watch::Receiver<CallView>,
}

impl CallHandle {
    pub(crate) fn new(
        local_id: ClientId,
        commands: mpsc::Sender<CallCommand>,
        view: watch::Receiver<CallView>,
    ) -> Self {
        Self {
            local_id,
            commands,
            view,
        }
    }

    pub fn local_id(&self) -> ClientId {
        self.local_id
    }

    pub async fn call(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::Call { reply }).await
    }

    pub async fn accept(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::Accept { reply }).await
    }

    pub async fn decline(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::Decline { reply }).await
    }

    pub async fn end(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::End { reply }).await
    }

    pub async fn toggle_mute(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::ToggleMute { reply }).await
    }

    pub async fn toggle_camera(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::ToggleCamera { reply }).await
    }

    /// Tell the session the host network came back.
    pub async fn network_online(&self) -> Result<(), CallError> {
        self.request(|reply| CallCommand::NetworkOnline { reply }).await
    }

    /// Latest snapshot.
    pub fn view(&self) -> CallView {
        self.view.borrow().clone()
    }

    /// Receiver that is notified on every change.
    pub fn subscribe(&self) -> watch::Receiver<CallView> {
        self.view.clone()
    }

    async fn request<F>(&self, build: F) -> Result<(), CallError>
    where
        F: FnOnce(CallReply) -> CallCommand,
    {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| CallError::SessionClosed)?;
        rx.await.map_err(|_| CallError::SessionClosed)?
    }
}
