//! Goal lifecycle tokens.
//!
//! A goal tracks one speech request from submission to exactly one terminal
//! outcome. Terminal assignment is first-writer-wins: completion, explicit
//! cancellation, and preemption may race, and whichever finalizes first
//! decides the outcome. The write-once cell makes a second assignment
//! structurally impossible rather than merely forbidden.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use talkd_core::GoalOutcome;

/// Lifecycle states of a [`Goal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalState {
    /// Submitted, speaking not yet started.
    Pending,
    /// Speaking started; the goal is bound to the active utterance.
    Active,
    /// Terminal: the estimated duration elapsed.
    Succeeded,
    /// Terminal: explicitly canceled.
    Canceled,
    /// Terminal: preempted, or speaking never started.
    Aborted,
}

/// A request lifecycle token with a single terminal outcome.
pub struct Goal {
    id: u64,
    text: String,
    activated: AtomicBool,
    outcome: OnceLock<GoalOutcome>,
}

impl Goal {
    pub(crate) fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            activated: AtomicBool::new(false),
            outcome: OnceLock::new(),
        }
    }

    /// Identifier, unique per orchestrator.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// The sentence this goal asked to have spoken.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mark the goal Active (speaking started).
    pub(crate) fn activate(&self) {
        self.activated.store(true, Ordering::Release);
    }

    /// Assign the terminal outcome. Returns `true` only for the first caller;
    /// later attempts leave the original outcome untouched.
    pub(crate) fn finalize(&self, outcome: GoalOutcome) -> bool {
        self.outcome.set(outcome).is_ok()
    }

    /// The terminal outcome, if one has been assigned.
    #[must_use]
    pub fn outcome(&self) -> Option<GoalOutcome> {
        self.outcome.get().copied()
    }

    /// Whether a terminal outcome has been assigned.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.get().is_some()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> GoalState {
        match self.outcome() {
            Some(GoalOutcome::Succeeded) => GoalState::Succeeded,
            Some(GoalOutcome::Canceled) => GoalState::Canceled,
            Some(GoalOutcome::Aborted) => GoalState::Aborted,
            None if self.activated.load(Ordering::Acquire) => GoalState::Active,
            None => GoalState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_reaches_each_state() {
        let goal = Goal::new(1, "hello");
        assert_eq!(goal.state(), GoalState::Pending);
        assert_eq!(goal.text(), "hello");

        goal.activate();
        assert_eq!(goal.state(), GoalState::Active);
        assert!(!goal.is_terminal());

        assert!(goal.finalize(GoalOutcome::Succeeded));
        assert_eq!(goal.state(), GoalState::Succeeded);
        assert!(goal.is_terminal());
    }

    #[test]
    fn first_finalize_wins() {
        let goal = Goal::new(2, "race");
        goal.activate();

        assert!(goal.finalize(GoalOutcome::Canceled));
        assert!(!goal.finalize(GoalOutcome::Succeeded));
        assert!(!goal.finalize(GoalOutcome::Aborted));
        assert_eq!(goal.outcome(), Some(GoalOutcome::Canceled));
        assert_eq!(goal.state(), GoalState::Canceled);
    }

    #[test]
    fn abort_without_activation() {
        let goal = Goal::new(3, "never started");
        assert!(goal.finalize(GoalOutcome::Aborted));
        assert_eq!(goal.state(), GoalState::Aborted);
    }
}
