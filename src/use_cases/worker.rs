// Geofence worker: one per monitored server, three independently ticking loops.

use crate::domain::{GameServer, PlayerObservation, RconError, SessionSnapshot};
use crate::use_cases::enforcement::Enforcement;
use crate::use_cases::fences::SessionView;
use crate::use_cases::punishment::{PunishmentScheduler, punish_player};
use crate::use_cases::tracking::{Outcome, Tracker};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};
use tracing::{debug, error, info, trace, warn};

/// Loop cadence and punishment cool-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub session_interval: Duration,
    pub player_interval: Duration,
    pub punish_interval: Duration,
    /// Width of the punishment window and delay before a punished record is evicted.
    pub punish_cooldown: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            session_interval: Duration::from_secs(1),
            player_interval: Duration::from_millis(1500),
            punish_interval: Duration::from_secs(1),
            punish_cooldown: Duration::from_secs(5),
        }
    }
}

impl WorkerSettings {
    pub fn validate(&self) -> Result<(), WorkerError> {
        let intervals = [
            ("session", self.session_interval),
            ("player", self.player_interval),
            ("punish", self.punish_interval),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, period)| period.is_zero()) {
            return Err(WorkerError::InvalidSettings(format!(
                "{name} interval must be greater than zero"
            )));
        }
        // A window narrower than the scan period could be skipped entirely.
        if self.punish_cooldown <= self.punish_interval {
            return Err(WorkerError::InvalidSettings(format!(
                "punish cooldown ({:?}) must exceed the punish interval ({:?})",
                self.punish_cooldown, self.punish_interval
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("initial session fetch failed: {0}")]
    InitialSession(#[source] RconError),
    #[error("invalid worker settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Initializing,
    Running,
    Stopped,
}

/// Resolves once shutdown was requested or the signal's sender is gone.
pub(crate) async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Cheaply cloneable handle; clones share all state.
pub struct Worker<G> {
    shared: Arc<Shared<G>>,
}

struct Shared<G> {
    server: G,
    enforcement: Enforcement,
    settings: WorkerSettings,
    tracker: Tracker,
    scheduler: PunishmentScheduler,
    // Current session plus active fences; swapped as a whole on refresh.
    view: watch::Sender<Arc<SessionView>>,
    state: watch::Sender<WorkerState>,
}

impl<G> Clone for Worker<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G> Worker<G>
where
    G: GameServer + 'static,
{
    pub fn new(server: G, enforcement: Enforcement, settings: WorkerSettings) -> Self {
        let (view, _) = watch::channel(Arc::new(SessionView::default()));
        let (state, _) = watch::channel(WorkerState::Initializing);
        Self {
            shared: Arc::new(Shared {
                server,
                enforcement,
                settings,
                tracker: Tracker::new(),
                scheduler: PunishmentScheduler::new(),
                view,
                state,
            }),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.shared.tracker
    }

    pub fn state(&self) -> watch::Receiver<WorkerState> {
        self.shared.state.subscribe()
    }

    pub fn view(&self) -> Arc<SessionView> {
        Arc::clone(&self.shared.view.borrow())
    }

    /// Runs until `shutdown` flips to true.
    ///
    /// Fails fast when the server cannot be reached at startup; after that,
    /// remote failures are logged and retried on the next tick.
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        let result = self.run_until_stopped(shutdown).await;
        self.shared.state.send_replace(WorkerState::Stopped);
        result
    }

    async fn run_until_stopped(&self, shutdown: watch::Receiver<bool>) -> Result<(), WorkerError> {
        self.shared.settings.validate()?;

        let session = self.shared.server.fetch_session().await.map_err(|error| {
            error!(%error, "initial session fetch failed");
            WorkerError::InitialSession(error)
        })?;
        info!(
            map = %session.map_name,
            mode = %session.game_mode,
            players = session.player_count,
            "worker started"
        );
        self.publish(session);
        self.shared.state.send_replace(WorkerState::Running);

        tokio::join!(
            self.session_loop(shutdown.clone()),
            self.player_loop(shutdown.clone()),
            self.punish_loop(shutdown),
        );

        info!("worker stopped");
        Ok(())
    }

    async fn session_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let period = self.shared.settings.session_interval;
        // The initial fetch already happened, so the first refresh is one period out.
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                result = self.shared.server.fetch_session() => result,
            };
            match result {
                Ok(session) => self.refresh(session),
                Err(error) => warn!(%error, "session refresh failed"),
            }
        }
    }

    async fn player_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval(self.shared.settings.player_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut checks = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }
            reap(&mut checks, "player check");

            let view = self.view();
            // Catches records a check wrote while a refresh was being published.
            self.shared.tracker.drop_unfenced(&view.fences);
            if view.fences.is_empty() {
                continue;
            }

            let result = tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                result = self.shared.server.fetch_players() => result,
            };
            let players = match result {
                Ok(players) => players,
                Err(error) => {
                    warn!(%error, "player poll failed");
                    continue;
                }
            };

            let roster: HashSet<String> = players.iter().map(|p| p.id.clone()).collect();
            self.shared.tracker.retain_roster(&roster);

            for player in players {
                let worker = self.clone();
                checks.spawn(async move { worker.check_player(player).await });
            }
        }

        checks.shutdown().await;
    }

    async fn punish_loop(&self, mut shutdown: watch::Receiver<bool>) {
        let settings = self.shared.settings;
        let mut ticker = interval(settings.punish_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut dispatches = JoinSet::new();

        loop {
            tokio::select! {
                _ = cancelled(&mut shutdown) => break,
                _ = ticker.tick() => {}
            }
            reap(&mut dispatches, "punishment");

            let due = self.shared.scheduler.due(
                &self.shared.tracker,
                self.shared.enforcement.grace_period,
                settings.punish_cooldown,
                Instant::now(),
            );
            for due in due {
                let worker = self.clone();
                let shutdown = shutdown.clone();
                dispatches.spawn(async move {
                    let shared = &worker.shared;
                    let reason = shared.enforcement.punish_message();
                    punish_player(
                        &shared.server,
                        &shared.tracker,
                        due,
                        &reason,
                        shared.settings.punish_cooldown,
                        shutdown,
                    )
                    .await;
                });
            }
        }

        dispatches.shutdown().await;
    }

    async fn check_player(&self, player: PlayerObservation) {
        // Classify against the latest view; a refresh may have landed since the poll.
        let view = self.view();
        let outcome = self.shared.tracker.observe(&player, &view, Instant::now());
        let Outcome::NewViolation(grid) = outcome else {
            trace!(player = %player.name, ?outcome, "player checked");
            return;
        };

        info!(player = %player.name, %grid, "player outside fence");
        let message = self.shared.enforcement.warning_message();
        if let Err(error) = self.shared.server.send_warning(&player.name, &message).await {
            error!(player = %player.name, %grid, %error, "warning player outside fence failed");
        }
    }

    fn refresh(&self, session: SessionSnapshot) {
        let previous_map = self.shared.view.borrow().session.map_name.clone();
        if previous_map != session.map_name {
            info!(
                from = %previous_map,
                to = %session.map_name,
                "map changed, clearing player state"
            );
            self.shared.tracker.reset();
        }
        self.publish(session);
    }

    fn publish(&self, session: SessionSnapshot) {
        let view = SessionView::new(&self.shared.enforcement, session);
        debug!(
            allies = view.fences.allies.len(),
            axis = view.fences.axis.len(),
            "active fences selected"
        );
        let dropped = self.shared.tracker.drop_unfenced(&view.fences);
        if dropped > 0 {
            info!(dropped, "fences deactivated, dropping violations");
        }
        self.shared.view.send_replace(Arc::new(view));
    }
}

// Collects finished child tasks without waiting; panics stay contained to their task.
fn reap(tasks: &mut JoinSet<()>, kind: &str) {
    while let Some(result) = tasks.try_join_next() {
        if let Err(error) = result {
            error!(%error, task = kind, "task failed");
        }
    }
}
