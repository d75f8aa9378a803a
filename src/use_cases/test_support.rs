use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{GameServer, PlayerObservation, RconError, SessionSnapshot, WorldPosition};

pub(crate) fn session(map: &str) -> SessionSnapshot {
    SessionSnapshot {
        map_name: map.to_string(),
        game_mode: "Warfare".to_string(),
        player_count: 50,
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub session: bool,
    pub players: bool,
    pub warning: bool,
    pub punish: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct CallCounts {
    pub session: usize,
    pub players: usize,
    pub warning: usize,
    pub punish: usize,
}

#[derive(Default)]
struct Recorded {
    session: SessionSnapshot,
    players: Vec<PlayerObservation>,
    failures: FailureFlags,
    counts: CallCounts,
    warnings: Vec<(String, String)>,
    punished: Vec<(String, String)>,
}

// Scripted game server; a successful punishment kills the player like the game does.
#[derive(Clone)]
pub(crate) struct RecordingServer {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingServer {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Recorded {
                session: session("FOY"),
                ..Recorded::default()
            })),
        }
    }

    pub(crate) fn with_failures(self, failures: FailureFlags) -> Self {
        self.set_failures(failures);
        self
    }

    pub(crate) fn with_session(self, session: SessionSnapshot) -> Self {
        self.lock().session = session;
        self
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        self.lock().failures = failures;
    }

    pub(crate) fn set_player(&self, id: &str, name: &str, team: &str, position: WorldPosition) {
        let player = PlayerObservation {
            id: id.to_string(),
            name: name.to_string(),
            team: team.to_string(),
            position,
            spawned: position.is_spawned(),
        };
        let mut guard = self.lock();
        match guard.players.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = player,
            None => guard.players.push(player),
        }
    }

    pub(crate) fn counts(&self) -> CallCounts {
        self.lock().counts
    }

    pub(crate) fn warnings(&self) -> Vec<(String, String)> {
        self.lock().warnings.clone()
    }

    pub(crate) fn punished(&self) -> Vec<(String, String)> {
        self.lock().punished.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.inner.lock().expect("recording server mutex poisoned")
    }
}

#[async_trait]
impl GameServer for RecordingServer {
    async fn fetch_session(&self) -> Result<SessionSnapshot, RconError> {
        let mut guard = self.lock();
        guard.counts.session += 1;
        if guard.failures.session {
            return Err(RconError::Transport("session fetch failed".to_string()));
        }
        Ok(guard.session.clone())
    }

    async fn fetch_players(&self) -> Result<Vec<PlayerObservation>, RconError> {
        let mut guard = self.lock();
        guard.counts.players += 1;
        if guard.failures.players {
            return Err(RconError::Transport("player fetch failed".to_string()));
        }
        Ok(guard.players.clone())
    }

    async fn send_warning(&self, player_name: &str, message: &str) -> Result<(), RconError> {
        let mut guard = self.lock();
        guard.counts.warning += 1;
        if guard.failures.warning {
            return Err(RconError::Transport("warning failed".to_string()));
        }
        guard
            .warnings
            .push((player_name.to_string(), message.to_string()));
        Ok(())
    }

    async fn punish(&self, player_id: &str, reason: &str) -> Result<(), RconError> {
        let mut guard = self.lock();
        guard.counts.punish += 1;
        if guard.failures.punish {
            return Err(RconError::Transport("punish failed".to_string()));
        }
        guard
            .punished
            .push((player_id.to_string(), reason.to_string()));
        if let Some(player) = guard.players.iter_mut().find(|p| p.id == player_id) {
            player.position = WorldPosition::default();
            player.spawned = false;
        }
        Ok(())
    }
}
