// Live session state and per-player observations fetched from the game server.

use crate::domain::grid::{Grid, GridLayout, WorldPosition};

/// Map/mode/population of the monitored game, replaced wholesale on every refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub map_name: String,
    pub game_mode: String,
    pub player_count: u32,
}

impl SessionSnapshot {
    /// Grid square of a position on this session's map.
    pub fn grid(&self, position: &WorldPosition) -> Grid {
        GridLayout::for_map(&self.map_name).grid(position)
    }
}

/// One roster entry as seen on a single poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerObservation {
    pub id: String,
    pub name: String,
    pub team: String,
    pub position: WorldPosition,
    pub spawned: bool,
}

/// The two playable alliances; every fence list belongs to one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Allied,
    Axis,
    Unknown,
}

const ALLIED_TEAMS: &[&str] = &["US", "GB", "RUS", "B8A"];
// DAK is the Afrika Korps, an axis team.
const AXIS_TEAMS: &[&str] = &["GER", "DAK"];

/// Maps a team tag reported by the server to its faction.
pub fn faction_of(team: &str) -> Faction {
    let team = team.trim();
    if ALLIED_TEAMS.iter().any(|t| t.eq_ignore_ascii_case(team)) {
        Faction::Allied
    } else if AXIS_TEAMS.iter().any(|t| t.eq_ignore_ascii_case(team)) {
        Faction::Axis
    } else {
        Faction::Unknown
    }
}
