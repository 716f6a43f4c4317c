//! State machine trait for status enums.
//!
//! Status fields in this domain move in one direction only; the trait keeps
//! the transition table next to the enum and makes every status change go
//! through a validated method instead of an open setter.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define the valid transitions; `transition_to` rejects
/// anything else, which is where monotonicity is actually enforced.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "status",
                format!("cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Open,
        Settling,
        Settled,
    }

    impl StateMachine for TestStatus {
        fn can_transition_to(&self, target: &Self) -> bool {
            use TestStatus::*;
            matches!((self, target), (Open, Settling) | (Settling, Settled))
        }

        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Open => vec![Settling],
                Settling => vec![Settled],
                Settled => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestStatus::Open.transition_to(TestStatus::Settling),
            Ok(TestStatus::Settling)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        assert!(TestStatus::Open.transition_to(TestStatus::Settled).is_err());
        assert!(TestStatus::Settled.transition_to(TestStatus::Open).is_err());
    }

    #[test]
    fn is_terminal_matches_transition_table() {
        assert!(!TestStatus::Open.is_terminal());
        assert!(TestStatus::Settled.is_terminal());
    }
}
