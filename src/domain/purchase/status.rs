//! Purchase status state machine.
//!
//! A purchase moves through the payment lifecycle in one direction only.
//! `Failed` and `Refunded` are terminal; `Completed` can only move to
//! `Refunded` (out-of-band), never backward.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    /// Placeholder reserving the (user, material) pair before the gateway
    /// transaction exists. Only ever observable inside initiation.
    Pending,

    /// Gateway transaction created; the client holds the secret and has not
    /// finished paying.
    Created,

    /// Payment submitted and being processed by the gateway.
    Processing,

    /// Payment succeeded. This is the state that grants ownership.
    Completed,

    /// Payment failed or the gateway transaction was abandoned. Does not
    /// block a fresh purchase attempt.
    Failed,

    /// A completed purchase refunded out of band.
    Refunded,
}

impl PurchaseStatus {
    /// Returns true for statuses that count against the one-active-purchase
    /// rule: anything that is not a terminal failure.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            PurchaseStatus::Pending
                | PurchaseStatus::Created
                | PurchaseStatus::Processing
                | PurchaseStatus::Completed
        )
    }

    /// Returns true iff this status grants ownership of the material.
    pub fn grants_ownership(&self) -> bool {
        matches!(self, PurchaseStatus::Completed)
    }

    /// Wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Created => "created",
            PurchaseStatus::Processing => "processing",
            PurchaseStatus::Completed => "completed",
            PurchaseStatus::Failed => "failed",
            PurchaseStatus::Refunded => "refunded",
        }
    }

    /// Parses the wire/database representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PurchaseStatus::Pending),
            "created" => Some(PurchaseStatus::Created),
            "processing" => Some(PurchaseStatus::Processing),
            "completed" => Some(PurchaseStatus::Completed),
            "failed" => Some(PurchaseStatus::Failed),
            "refunded" => Some(PurchaseStatus::Refunded),
            _ => None,
        }
    }
}

impl StateMachine for PurchaseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, target),
            // From PENDING: gateway transaction attached, or gateway call failed
            (Pending, Created)
                | (Pending, Failed)
            // From CREATED: first poll may already see any outcome
                | (Created, Processing)
                | (Created, Completed)
                | (Created, Failed)
            // From PROCESSING: repeated polls may observe no change
                | (Processing, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
            // From COMPLETED: refund only
                | (Completed, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PurchaseStatus::*;
        match self {
            Pending => vec![Created, Failed],
            Created => vec![Processing, Completed, Failed],
            Processing => vec![Processing, Completed, Failed],
            Completed => vec![Refunded],
            Failed => vec![],
            Refunded => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PurchaseStatus; 6] = [
        PurchaseStatus::Pending,
        PurchaseStatus::Created,
        PurchaseStatus::Processing,
        PurchaseStatus::Completed,
        PurchaseStatus::Failed,
        PurchaseStatus::Refunded,
    ];

    #[test]
    fn pending_moves_to_created_or_failed_only() {
        assert_eq!(
            PurchaseStatus::Pending.valid_transitions(),
            vec![PurchaseStatus::Created, PurchaseStatus::Failed]
        );
        assert!(!PurchaseStatus::Pending.can_transition_to(&PurchaseStatus::Completed));
    }

    #[test]
    fn created_can_complete_directly() {
        // First poll after the client pays may already see the final outcome.
        assert!(PurchaseStatus::Created.can_transition_to(&PurchaseStatus::Completed));
        assert!(PurchaseStatus::Created.can_transition_to(&PurchaseStatus::Failed));
    }

    #[test]
    fn processing_allows_repeat_polls() {
        assert!(PurchaseStatus::Processing.can_transition_to(&PurchaseStatus::Processing));
    }

    #[test]
    fn completed_never_regresses() {
        for target in [
            PurchaseStatus::Pending,
            PurchaseStatus::Created,
            PurchaseStatus::Processing,
            PurchaseStatus::Failed,
        ] {
            assert!(
                !PurchaseStatus::Completed.can_transition_to(&target),
                "completed must not regress to {:?}",
                target
            );
        }
        assert!(PurchaseStatus::Completed.can_transition_to(&PurchaseStatus::Refunded));
    }

    #[test]
    fn failed_and_refunded_are_terminal() {
        assert!(PurchaseStatus::Failed.is_terminal());
        assert!(PurchaseStatus::Refunded.is_terminal());
        assert!(!PurchaseStatus::Completed.is_terminal());
    }

    #[test]
    fn active_statuses_exclude_terminal_failures() {
        assert!(PurchaseStatus::Pending.is_active());
        assert!(PurchaseStatus::Created.is_active());
        assert!(PurchaseStatus::Processing.is_active());
        assert!(PurchaseStatus::Completed.is_active());
        assert!(!PurchaseStatus::Failed.is_active());
        assert!(!PurchaseStatus::Refunded.is_active());
    }

    #[test]
    fn only_completed_grants_ownership() {
        for status in ALL {
            assert_eq!(
                status.grants_ownership(),
                status == PurchaseStatus::Completed
            );
        }
    }

    #[test]
    fn wire_representation_round_trips() {
        for status in ALL {
            assert_eq!(PurchaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PurchaseStatus::parse("unknown"), None);
    }

    #[test]
    fn valid_transitions_are_consistent_with_can_transition_to() {
        for status in ALL {
            for target in status.valid_transitions() {
                assert!(
                    status.can_transition_to(&target),
                    "can_transition_to should return true for {:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }
}
