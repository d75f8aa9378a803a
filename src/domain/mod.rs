// Domain layer: fence rules, grid geometry, session types and the game server port.

pub mod errors;
pub mod fence;
pub mod grid;
pub mod ports;
pub mod session;

pub use errors::RconError;
pub use fence::{Condition, Equals, Fence, Threshold};
pub use grid::{Grid, GridLayout, WorldPosition};
pub use ports::GameServer;
pub use session::{Faction, PlayerObservation, SessionSnapshot, faction_of};
