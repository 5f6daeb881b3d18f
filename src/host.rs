use thiserror::Error;

/// Transport-level identifier the host assigns to a connected client.
pub type ClientId = u64;

/// Errors the host may report when asked to force-disconnect a client.
#[derive(Debug, Error)]
pub enum DisconnectError {
    #[error("client {0} is not connected")]
    UnknownClient(ClientId),
    #[error("transport rejected the disconnect: {0}")]
    Transport(String),
}

/// Contract the embedding host process provides to the admission controller.
///
/// Query methods must be cheap and non-blocking; they are called from inside
/// the controller's lock and from the host's per-frame tick. Action methods
/// are best-effort: the controller logs failures and never retries.
pub trait GameHost: Send + Sync {
    /// Whether the matchmaking channel currently accepts joins.
    fn lobby_open(&self) -> bool;

    /// Whether the session is in its pre-match lobby phase (ship in orbit).
    fn in_lobby_phase(&self) -> bool;

    /// Whether a match has already been started this session. Late joins
    /// are still admitted while the lobby is open; this only affects logging.
    fn match_started(&self) -> bool;

    /// Whether this process is the server authority for the session.
    fn is_server(&self) -> bool;

    /// Whether the secondary transport (platform overlay networking) is
    /// active. Without it the identity-sync confirmation never arrives and
    /// is dropped from the required set.
    fn secondary_transport_enabled(&self) -> bool;

    /// Forcibly drop a client mid-handshake.
    fn force_disconnect(&self, client_id: ClientId) -> Result<(), DisconnectError>;

    /// Cancel an in-progress start-of-match sequence.
    fn cancel_start(&self);

    /// Surface a message to the session operator (HUD tip, console line).
    fn display_operator_message(&self, title: &str, body: &str);
}
