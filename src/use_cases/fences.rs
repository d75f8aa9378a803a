// Fence selection for the current session.

use crate::domain::{Faction, Fence, SessionSnapshot};
use crate::use_cases::enforcement::Enforcement;

/// Fences active for one session snapshot, split by faction.
#[derive(Debug, Clone, Default)]
pub struct ActiveFences {
    pub allies: Vec<Fence>,
    pub axis: Vec<Fence>,
}

impl ActiveFences {
    pub fn select(enforcement: &Enforcement, session: &SessionSnapshot) -> Self {
        Self {
            allies: applicable(&enforcement.allies_fences, session),
            axis: applicable(&enforcement.axis_fences, session),
        }
    }

    /// Nothing to enforce for either faction.
    pub fn is_empty(&self) -> bool {
        self.allies.is_empty() && self.axis.is_empty()
    }

    pub fn for_faction(&self, faction: Faction) -> &[Fence] {
        match faction {
            Faction::Allied => &self.allies,
            Faction::Axis => &self.axis,
            Faction::Unknown => &[],
        }
    }
}

fn applicable(fences: &[Fence], session: &SessionSnapshot) -> Vec<Fence> {
    fences
        .iter()
        .filter(|fence| fence.matches(session))
        .cloned()
        .collect()
}

/// Session snapshot plus the fences derived from it; replaced as a unit on refresh.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub session: SessionSnapshot,
    pub fences: ActiveFences,
}

impl SessionView {
    pub fn new(enforcement: &Enforcement, session: SessionSnapshot) -> Self {
        let fences = ActiveFences::select(enforcement, &session);
        Self { session, fences }
    }
}
