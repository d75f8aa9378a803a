use async_trait::async_trait;

use crate::domain::errors::RconError;
use crate::domain::session::{PlayerObservation, SessionSnapshot};

// Port for the remote game server; the worker depends on this, not on the transport.
#[async_trait]
pub trait GameServer: Send + Sync {
    async fn fetch_session(&self) -> Result<SessionSnapshot, RconError>;
    async fn fetch_players(&self) -> Result<Vec<PlayerObservation>, RconError>;
    async fn send_warning(&self, player_name: &str, message: &str) -> Result<(), RconError>;
    async fn punish(&self, player_id: &str, reason: &str) -> Result<(), RconError>;
}
