use duet_core::{CallStatus, ClientId, SignalEnvelope};

/// Commands delivered to a room actor by the socket layer.
#[derive(Debug)]
pub enum RoomCommand {
    /// A socket for `client_id` opened and wants membership.
    Join { client_id: ClientId },

    /// The client left or its socket closed.
    Leave { client_id: ClientId },

    /// Negotiation message for the other member.
    Signal {
        client_id: ClientId,
        envelope: SignalEnvelope,
        durable: bool,
    },

    /// Drop every backlogged signal.
    PurgeBacklog { client_id: ClientId },

    /// Overwrite the room's call status.
    SetCallStatus {
        client_id: ClientId,
        status: CallStatus,
    },
}
