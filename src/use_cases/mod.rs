// Use cases layer: fence selection, player tracking, punishment and the worker loops.

pub mod enforcement;
pub mod fences;
pub mod punishment;
pub mod store;
pub mod tracking;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use enforcement::{
    DEFAULT_GRACE_PERIOD, DEFAULT_PUNISH_MESSAGE, DEFAULT_WARNING_MESSAGE, Enforcement,
    format_grace,
};
pub use fences::{ActiveFences, SessionView};
pub use punishment::{Due, PunishmentScheduler, is_due, punish_player};
pub use store::KeyedStore;
pub use tracking::{DebounceState, Outcome, Tracker, ViolationRecord};
pub use worker::{Worker, WorkerError, WorkerSettings, WorkerState};
