// Failures reported by the game server collaborator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RconError {
    #[error("rcon transport error: {0}")]
    Transport(String),
    #[error("rcon upstream error {status}")]
    Upstream { status: u16 },
    #[error("rcon command {command} rejected ({status}): {message}")]
    Rejected {
        command: &'static str,
        status: u16,
        message: String,
    },
    #[error("rcon response decode error: {0}")]
    Decode(String),
}
