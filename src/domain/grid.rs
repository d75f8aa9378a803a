// World positions and the map grid players see in game (e.g. "G4 numpad 5").

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw player position as reported by the game server, in centimetres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The server reports the origin for players sitting on the deploy screen or dead.
    pub fn is_spawned(&self) -> bool {
        self.x != 0.0 || self.y != 0.0 || self.z != 0.0
    }
}

/// Discrete map coordinate: column letter, line number and numpad sub-cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    pub x: char,
    pub y: u8,
    pub numpad: u8,
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} numpad {}", self.x, self.y, self.numpad)
    }
}

/// Square grid laid over a map, centred on the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Edge length of one lettered square, in world units.
    pub square_size: f64,
    /// Number of columns and lines.
    pub squares: u8,
}

impl GridLayout {
    /// 10x10 squares of 200m each.
    pub const STANDARD: GridLayout = GridLayout {
        square_size: 20_000.0,
        squares: 10,
    };

    /// Returns the layout used by the named map.
    pub fn for_map(_map_name: &str) -> GridLayout {
        // Every map in the current rotation ships with the same 2km playfield.
        Self::STANDARD
    }

    /// Converts a world position into its grid square; out-of-bounds positions clamp to the edge.
    pub fn grid(&self, position: &WorldPosition) -> Grid {
        let half = self.square_size * f64::from(self.squares) / 2.0;
        let (column, column_frac) = self.axis(position.x + half);
        let (line, line_frac) = self.axis(position.y + half);

        // Keypad layout: 7 8 9 on the top row, 1 2 3 on the bottom one.
        let sub_x = third(column_frac);
        let sub_y = third(line_frac);
        let numpad = 7 - 3 * sub_y + sub_x;

        Grid {
            x: char::from(b'A' + column),
            y: line + 1,
            numpad,
        }
    }

    // Index of the square along one axis plus the offset inside it.
    fn axis(&self, offset: f64) -> (u8, f64) {
        let scaled = (offset / self.square_size).max(0.0);
        let index = scaled.floor().min(f64::from(self.squares.saturating_sub(1)));
        (index as u8, scaled - index)
    }
}

fn third(fraction: f64) -> u8 {
    ((fraction * 3.0).floor() as u8).min(2)
}
