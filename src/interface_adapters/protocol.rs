// Wire protocol DTOs for the HTTP RCON gateway and conversions into domain types.

use crate::domain::{PlayerObservation, RconError, SessionSnapshot, WorldPosition};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const GET_SERVER_INFORMATION: &str = "GetServerInformation";
pub const MESSAGE_PLAYER: &str = "MessagePlayer";
pub const PUNISH_PLAYER: &str = "PunishPlayer";

/// Request envelope posted to the gateway for every command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest<'a, T> {
    pub name: &'a str,
    pub content_body: T,
}

/// Response envelope; `status_code` mirrors HTTP semantics (200 = accepted).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub status_code: u16,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub content_body: serde_json::Value,
}

impl CommandResponse {
    /// Fails unless the gateway accepted the command.
    pub fn accepted(self, command: &'static str) -> Result<Self, RconError> {
        if self.status_code == 200 {
            return Ok(self);
        }
        Err(RconError::Rejected {
            command,
            status: self.status_code,
            message: self.status_message,
        })
    }

    /// Decodes the content body; some gateways wrap it as a JSON string.
    pub fn body<T: DeserializeOwned>(self) -> Result<T, RconError> {
        let decoded = match self.content_body {
            serde_json::Value::String(raw) => serde_json::from_str(&raw),
            value => serde_json::from_value(value),
        };
        decoded.map_err(|e| RconError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePlayerBody<'a> {
    pub player_name: &'a str,
    pub message: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunishPlayerBody<'a> {
    pub player_id: &'a str,
    pub reason: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub map_name: String,
    #[serde(default)]
    pub game_mode: String,
    #[serde(default)]
    pub player_count: u32,
}

impl From<SessionDto> for SessionSnapshot {
    fn from(dto: SessionDto) -> Self {
        Self {
            map_name: dto.map_name,
            game_mode: dto.game_mode,
            player_count: dto.player_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayersDto {
    #[serde(default)]
    pub players: Vec<PlayerDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    // Empty while the player has not picked a side.
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub world_position: PositionDto,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PositionDto {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<PlayerDto> for PlayerObservation {
    fn from(dto: PlayerDto) -> Self {
        let position = WorldPosition::new(
            dto.world_position.x,
            dto.world_position.y,
            dto.world_position.z,
        );
        Self {
            id: dto.id,
            name: dto.name,
            team: dto.team,
            spawned: position.is_spawned(),
            position,
        }
    }
}
