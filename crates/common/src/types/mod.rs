use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Outcome of an idempotent set-operation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SetOutcome {
    Changed,
    Unchanged,
}

impl SetOutcome {
    pub fn from_changed(changed: bool) -> Self {
        if changed { SetOutcome::Changed } else { SetOutcome::Unchanged }
    }
}
