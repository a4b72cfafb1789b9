//! Task Lifecycle State Machine
//!
//! ```text
//! idle -> submitting -> pending <-> processing -> completed | failed
//!   ^          |                                      |
//!   |          +-> failed (rejected submission)       |
//!   +------------------- reset -----------------------+
//! ```
//!
//! Reset is allowed from every state. A fresh submit from a terminal state
//! discards the old task and starts again at `submitting`.

use std::fmt;

use serde::Serialize;

use crate::domain::value_objects::TaskStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Idle,
    Submitting,
    Pending,
    Processing,
    Completed,
    Failed,
}

impl LifecycleState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::Submitting => "submitting",
            LifecycleState::Pending => "pending",
            LifecycleState::Processing => "processing",
            LifecycleState::Completed => "completed",
            LifecycleState::Failed => "failed",
        }
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Completed | LifecycleState::Failed)
    }

    /// A task exists and has not reached a terminal state
    pub const fn is_busy(&self) -> bool {
        matches!(
            self,
            LifecycleState::Submitting | LifecycleState::Pending | LifecycleState::Processing
        )
    }

    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        match (self, next) {
            (_, Idle) => true,
            (Idle | Completed | Failed, Submitting) => true,
            (Submitting, Pending | Failed) => true,
            (Pending | Processing, Pending | Processing | Completed | Failed) => true,
            _ => false,
        }
    }
}

impl From<TaskStatus> for LifecycleState {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => LifecycleState::Pending,
            TaskStatus::Processing => LifecycleState::Processing,
            TaskStatus::Completed => LifecycleState::Completed,
            TaskStatus::Failed => LifecycleState::Failed,
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    const ALL: [LifecycleState; 6] = [Idle, Submitting, Pending, Processing, Completed, Failed];

    #[test]
    fn test_terminal_and_busy_are_disjoint() {
        for state in ALL {
            assert!(!(state.is_terminal() && state.is_busy()), "{state}");
        }
        assert!(!Idle.is_terminal() && !Idle.is_busy());
    }

    #[test]
    fn test_reset_allowed_everywhere() {
        for state in ALL {
            assert!(state.can_transition_to(Idle));
        }
    }

    #[test]
    fn test_terminal_states_only_leave_via_reset_or_submit() {
        for terminal in [Completed, Failed] {
            for next in ALL {
                let allowed = terminal.can_transition_to(next);
                assert_eq!(allowed, matches!(next, Idle | Submitting), "{terminal} -> {next}");
            }
        }
    }

    #[test]
    fn test_happy_path() {
        assert!(Idle.can_transition_to(Submitting));
        assert!(Submitting.can_transition_to(Pending));
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Completed));
        assert!(!Submitting.can_transition_to(Submitting));
        assert!(!Idle.can_transition_to(Pending));
    }
}
