// Per-player tracking: spawn debounce and out-of-bounds violations.

use crate::domain::{Faction, Grid, PlayerObservation, WorldPosition, faction_of};
use crate::use_cases::fences::{ActiveFences, SessionView};
use crate::use_cases::store::KeyedStore;
use std::collections::HashSet;
use tokio::time::Instant;

/// Where a player stands in the spawn debounce.
///
/// The server reports a random HQ position for players that just joined or sit
/// on the deploy screen, so nothing is classified until the player has moved
/// away from the first position seen after spawning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebounceState {
    Unseen,
    Baseline(WorldPosition),
    Tracking,
}

/// A player currently outside their fences.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationRecord {
    pub name: String,
    pub faction: Faction,
    pub last_grid: Grid,
    /// First observation of the current uninterrupted stretch outside.
    pub first_outside: Instant,
}

/// Result of classifying one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Unspawned,
    /// First spawned sighting; position stored as baseline.
    Baselined,
    /// Still on the baseline position.
    OnSpawnPoint,
    UnknownFaction,
    NoActiveFence,
    Inside(Grid),
    StillOutside(Grid),
    /// Freshly outside; the caller owes the player a warning.
    NewViolation(Grid),
}

#[derive(Debug, Default)]
pub struct Tracker {
    violations: KeyedStore<String, ViolationRecord>,
    debounce: KeyedStore<String, DebounceState>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one observation through the debounce and classifies it against the view's fences.
    pub fn observe(&self, player: &PlayerObservation, view: &SessionView, now: Instant) -> Outcome {
        if !player.spawned {
            self.forget(&player.id);
            return Outcome::Unspawned;
        }
        if let Some(outcome) = self.debounce(player) {
            return outcome;
        }

        let faction = faction_of(&player.team);
        if faction == Faction::Unknown {
            return Outcome::UnknownFaction;
        }

        let fences = view.fences.for_faction(faction);
        if fences.is_empty() {
            // No rule applies to this faction right now, so nobody on it can be outside.
            self.violations.remove(&player.id);
            return Outcome::NoActiveFence;
        }

        let grid = view.session.grid(&player.position);
        if fences.iter().any(|fence| fence.includes(&grid)) {
            self.violations.remove(&player.id);
            return Outcome::Inside(grid);
        }

        self.violations
            .compute(player.id.clone(), |current| match current {
                Some(record) => (
                    Some(ViolationRecord {
                        name: player.name.clone(),
                        faction,
                        last_grid: grid,
                        first_outside: record.first_outside,
                    }),
                    Outcome::StillOutside(grid),
                ),
                None => (
                    Some(ViolationRecord {
                        name: player.name.clone(),
                        faction,
                        last_grid: grid,
                        first_outside: now,
                    }),
                    Outcome::NewViolation(grid),
                ),
            })
    }

    // Returns an outcome when the observation must not be classified yet.
    fn debounce(&self, player: &PlayerObservation) -> Option<Outcome> {
        let position = player.position;
        self.debounce.compute(player.id.clone(), |current| {
            match current.copied().unwrap_or(DebounceState::Unseen) {
                DebounceState::Unseen => (
                    Some(DebounceState::Baseline(position)),
                    Some(Outcome::Baselined),
                ),
                DebounceState::Baseline(baseline) if baseline == position => (
                    Some(DebounceState::Baseline(baseline)),
                    Some(Outcome::OnSpawnPoint),
                ),
                DebounceState::Baseline(_) | DebounceState::Tracking => {
                    (Some(DebounceState::Tracking), None)
                }
            }
        })
    }

    pub fn debounce_state(&self, player_id: &str) -> DebounceState {
        self.debounce
            .get(&player_id.to_string())
            .unwrap_or(DebounceState::Unseen)
    }

    pub fn violation(&self, player_id: &str) -> Option<ViolationRecord> {
        self.violations.get(&player_id.to_string())
    }

    pub fn violations(&self) -> Vec<(String, ViolationRecord)> {
        self.violations.snapshot()
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn debounce_count(&self) -> usize {
        self.debounce.len()
    }

    /// Drops every record of one player.
    pub fn forget(&self, player_id: &str) {
        let key = player_id.to_string();
        self.debounce.remove(&key);
        self.violations.remove(&key);
    }

    /// Drops records of players missing from the latest roster.
    pub fn retain_roster(&self, roster: &HashSet<String>) {
        self.debounce.retain(|id, _| roster.contains(id));
        self.violations.retain(|id, _| roster.contains(id));
    }

    /// Drops violations of factions that no longer have an active fence; returns how many.
    pub fn drop_unfenced(&self, fences: &ActiveFences) -> usize {
        let before = self.violations.len();
        self.violations
            .retain(|_, record| !fences.for_faction(record.faction).is_empty());
        before.saturating_sub(self.violations.len())
    }

    /// Clears all state; grids computed on the previous map mean nothing on the next one.
    pub fn reset(&self) {
        self.violations.clear();
        self.debounce.clear();
    }

    /// Closes out a punished violation unless the player has since started a new one.
    pub fn resolve_punished(&self, player_id: &str, first_outside: Instant) {
        let key = player_id.to_string();
        let removed = self
            .violations
            .remove_if(&key, |record| record.first_outside == first_outside);
        if removed.is_some() {
            self.debounce.remove(&key);
        }
    }
}
