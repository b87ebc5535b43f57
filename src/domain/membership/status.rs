//! Membership status state machine.
//!
//! A user is either a VIP or not. There is no terminal state: a membership can
//! be revoked and re-activated any number of times.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// VIP flag of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// Known user without the benefit (first contact, or revoked).
    Inactive,

    /// Paid and within the current period.
    Active,
}

impl MembershipStatus {
    /// Maps the persisted `is_active` column onto the status.
    pub fn from_flag(is_active: bool) -> Self {
        if is_active {
            MembershipStatus::Active
        } else {
            MembershipStatus::Inactive
        }
    }

    /// Returns the persisted `is_active` flag.
    pub fn is_active(&self) -> bool {
        matches!(self, MembershipStatus::Active)
    }
}

impl StateMachine for MembershipStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use MembershipStatus::*;
        matches!(
            (self, target),
            (Inactive, Active)
                | (Active, Active) // Renewal
                | (Active, Inactive)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use MembershipStatus::*;
        match self {
            Inactive => vec![Active],
            Active => vec![Active, Inactive],
        }
    }
}
