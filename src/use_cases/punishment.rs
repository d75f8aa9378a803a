// Punishment of players that stayed outside past the grace period.

use crate::domain::GameServer;
use crate::use_cases::store::KeyedStore;
use crate::use_cases::tracking::{Tracker, ViolationRecord};
use crate::use_cases::worker::cancelled;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Whether a violation of the given age may be punished.
///
/// The window closes `cooldown` after it opens: a punished record is evicted
/// by then, and a record whose punishment kept failing is given up.
pub fn is_due(elapsed: Duration, grace: Duration, cooldown: Duration) -> bool {
    elapsed > grace && elapsed < grace.saturating_add(cooldown)
}

/// Hands out per-player punishment claims so at most one is in flight per player.
#[derive(Debug, Clone, Default)]
pub struct PunishmentScheduler {
    in_flight: Arc<KeyedStore<String, ()>>,
}

/// A violation selected for punishment; the claim is released on drop.
#[derive(Debug)]
pub struct Due {
    pub player_id: String,
    pub record: ViolationRecord,
    _claim: Claim,
}

#[derive(Debug)]
struct Claim {
    player_id: String,
    in_flight: Arc<KeyedStore<String, ()>>,
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.in_flight.remove(&self.player_id);
    }
}

impl PunishmentScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims every violation inside its punishment window that is not already being handled.
    pub fn due(
        &self,
        tracker: &Tracker,
        grace: Duration,
        cooldown: Duration,
        now: Instant,
    ) -> Vec<Due> {
        tracker
            .violations()
            .into_iter()
            .filter(|(_, record)| {
                is_due(
                    now.saturating_duration_since(record.first_outside),
                    grace,
                    cooldown,
                )
            })
            .filter_map(|(player_id, record)| {
                let claim = self.claim(&player_id)?;
                Some(Due {
                    player_id,
                    record,
                    _claim: claim,
                })
            })
            .collect()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn claim(&self, player_id: &str) -> Option<Claim> {
        self.in_flight
            .insert_if_absent(player_id.to_string(), ())
            .then(|| Claim {
                player_id: player_id.to_string(),
                in_flight: Arc::clone(&self.in_flight),
            })
    }
}

/// Punishes one player, then evicts the violation after `cooldown`.
///
/// Eviction waits so the player cannot re-enter the window while the punishment
/// is still taking effect in game. On failure the record stays for a retry.
pub async fn punish_player<G>(
    server: &G,
    tracker: &Tracker,
    due: Due,
    reason: &str,
    cooldown: Duration,
    mut shutdown: watch::Receiver<bool>,
) where
    G: GameServer + ?Sized,
{
    let record = &due.record;
    if let Err(error) = server.punish(&due.player_id, reason).await {
        error!(
            player = %record.name,
            player_id = %due.player_id,
            grid = %record.last_grid,
            %error,
            "punish player failed"
        );
        return;
    }
    info!(
        player = %record.name,
        player_id = %due.player_id,
        grid = %record.last_grid,
        "punished player outside fence"
    );

    tokio::select! {
        _ = tokio::time::sleep(cooldown) => {}
        _ = cancelled(&mut shutdown) => return,
    }

    tracker.resolve_punished(&due.player_id, record.first_outside);
    debug!(player_id = %due.player_id, "violation closed after punishment");
}
