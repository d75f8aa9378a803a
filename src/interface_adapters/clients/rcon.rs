use crate::domain::{GameServer, PlayerObservation, RconError, SessionSnapshot};
use crate::interface_adapters::protocol::{
    CommandRequest, CommandResponse, GET_SERVER_INFORMATION, MESSAGE_PLAYER, MessagePlayerBody,
    PUNISH_PLAYER, PlayersDto, PunishPlayerBody, SessionDto,
};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

// Thin reqwest client for one game server's HTTP RCON gateway.
#[derive(Clone)]
pub struct RconClient {
    http: reqwest::Client,
    base_url: String,
    password: String,
}

impl RconClient {
    pub fn new(
        base_url: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            password: password.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute<T: Serialize + Sync>(
        &self,
        command: &'static str,
        content_body: T,
    ) -> Result<CommandResponse, RconError> {
        let url = format!("{}/rcon", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.password)
            .json(&CommandRequest {
                name: command,
                content_body,
            })
            .send()
            .await
            .map_err(|e| RconError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RconError::Upstream {
                status: status.as_u16(),
            });
        }

        response
            .json::<CommandResponse>()
            .await
            .map_err(|e| RconError::Decode(e.to_string()))?
            .accepted(command)
    }
}

#[async_trait]
impl GameServer for RconClient {
    async fn fetch_session(&self) -> Result<SessionSnapshot, RconError> {
        let session: SessionDto = self
            .execute(GET_SERVER_INFORMATION, "session")
            .await?
            .body()?;
        Ok(session.into())
    }

    async fn fetch_players(&self) -> Result<Vec<PlayerObservation>, RconError> {
        let players: PlayersDto = self
            .execute(GET_SERVER_INFORMATION, "players")
            .await?
            .body()?;
        Ok(players.players.into_iter().map(Into::into).collect())
    }

    async fn send_warning(&self, player_name: &str, message: &str) -> Result<(), RconError> {
        self.execute(
            MESSAGE_PLAYER,
            MessagePlayerBody {
                player_name,
                message,
            },
        )
        .await
        .map(|_| ())
    }

    async fn punish(&self, player_id: &str, reason: &str) -> Result<(), RconError> {
        self.execute(PUNISH_PLAYER, PunishPlayerBody { player_id, reason })
            .await
            .map(|_| ())
    }
}
