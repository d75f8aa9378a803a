// Per-server enforcement rules handed to a worker.

use crate::domain::Fence;
use std::time::Duration;

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);
pub const DEFAULT_WARNING_MESSAGE: &str = "You are outside of the designated playarea! Please go back to the battlefield immediately.\n\nYou will be punished in {grace}";
pub const DEFAULT_PUNISH_MESSAGE: &str = "{grace} outside the playarea";

/// Placeholder substituted with the formatted grace period.
const GRACE_SLOT: &str = "{grace}";

/// What a worker enforces on its server.
#[derive(Debug, Clone)]
pub struct Enforcement {
    /// How long a player may stay outside before punishment becomes eligible.
    pub grace_period: Duration,
    pub warning_template: String,
    pub punish_template: String,
    pub allies_fences: Vec<Fence>,
    pub axis_fences: Vec<Fence>,
}

impl Default for Enforcement {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            warning_template: DEFAULT_WARNING_MESSAGE.to_string(),
            punish_template: DEFAULT_PUNISH_MESSAGE.to_string(),
            allies_fences: Vec::new(),
            axis_fences: Vec::new(),
        }
    }
}

impl Enforcement {
    pub fn warning_message(&self) -> String {
        self.render(&self.warning_template)
    }

    pub fn punish_message(&self) -> String {
        self.render(&self.punish_template)
    }

    fn render(&self, template: &str) -> String {
        template.replacen(GRACE_SLOT, &format_grace(self.grace_period), 1)
    }
}

/// Formats whole seconds the way players read them in chat, e.g. `10s` or `1m30s`.
pub fn format_grace(grace: Duration) -> String {
    let secs = grace.as_secs();
    match (secs / 60, secs % 60) {
        (0, s) => format!("{s}s"),
        (m, 0) => format!("{m}m"),
        (m, s) => format!("{m}m{s}s"),
    }
}
