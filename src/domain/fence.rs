// Geofence rules and the session conditions that switch them on.

use crate::domain::grid::Grid;
use crate::domain::session::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Inclusion rule over grid squares.
///
/// Every dimension left out matches unconditionally, so an empty fence covers
/// the whole map and `x = "G"` alone covers the entire G column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub numpads: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl Fence {
    /// Returns true if the grid square lies inside this fence.
    pub fn includes(&self, grid: &Grid) -> bool {
        if self.x.is_some_and(|x| !x.eq_ignore_ascii_case(&grid.x)) {
            return false;
        }
        if self.y.is_some_and(|y| y != grid.y) {
            return false;
        }
        self.numpads.is_empty() || self.numpads.contains(&grid.numpad)
    }

    /// Returns true if the fence is active for the given session.
    pub fn matches(&self, session: &SessionSnapshot) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition.matches(session))
    }
}

/// Activation condition; all listed constraints must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Condition {
    #[serde(default)]
    pub equals: Equals,
    #[serde(default)]
    pub less_than: Threshold,
    #[serde(default)]
    pub greater_than: Threshold,
}

/// Accepted values per session attribute (any one of them satisfies the key).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Equals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_name: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<Vec<String>>,
}

/// Numeric bounds; comparisons are strict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Threshold {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u32>,
}

impl Condition {
    pub fn matches(&self, session: &SessionSnapshot) -> bool {
        accepts(self.equals.map_name.as_deref(), &session.map_name)
            && accepts(self.equals.game_mode.as_deref(), &session.game_mode)
            && self
                .less_than
                .player_count
                .is_none_or(|bound| session.player_count < bound)
            && self
                .greater_than
                .player_count
                .is_none_or(|bound| session.player_count > bound)
    }
}

fn accepts(accepted: Option<&[String]>, value: &str) -> bool {
    accepted.is_none_or(|values| values.iter().any(|v| v == value))
}
