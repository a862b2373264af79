//! Borrowing state machine.
//!
//! ```text
//! PENDING --approve--> ACTIVE --return--> RETURNED
//!    \
//!     `---reject-----> REJECTED
//! ```
//!
//! Any transition into or out of `ACTIVE` carries an asset effect: the asset's
//! Available/Borrowed flag is a cached projection of "an ACTIVE borrowing
//! exists", so both rows are written in the same unit of work.

use std::str::FromStr;

use crate::error::CoreError;
use crate::status::{AssetStatus, BorrowingStatus};

/// Admin decision on a pending borrowing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowingAction {
    Approve,
    Reject,
}

impl BorrowingAction {
    /// Status a pending borrowing moves to under this action.
    pub fn target_status(self) -> BorrowingStatus {
        match self {
            BorrowingAction::Approve => BorrowingStatus::Active,
            BorrowingAction::Reject => BorrowingStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BorrowingAction::Approve => "APPROVE",
            BorrowingAction::Reject => "REJECT",
        }
    }
}

impl FromStr for BorrowingAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVE" => Ok(BorrowingAction::Approve),
            "REJECT" => Ok(BorrowingAction::Reject),
            _ => Err(CoreError::BadInput(format!(
                "Invalid borrowing action '{s}'. Must be one of: APPROVE, REJECT"
            ))),
        }
    }
}

/// Which timestamp column a transition refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorrowingStamp {
    /// `borrowed_at` (request time on create, approval time on activation).
    BorrowedAt,
    /// `returned_at`.
    ReturnedAt,
    None,
}

/// Coupled write to the referenced asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetEffect {
    /// Required current asset status, re-checked under lock. `None` skips the check.
    pub expect: Option<AssetStatus>,
    /// Asset status written alongside the borrowing.
    pub set: AssetStatus,
}

/// Fully derived description of a legal borrowing transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: BorrowingStatus,
    pub to: BorrowingStatus,
    pub stamp: BorrowingStamp,
    pub asset_effect: Option<AssetEffect>,
}

impl BorrowingStatus {
    /// Statuses reachable in one step.
    pub fn valid_transitions(self) -> &'static [BorrowingStatus] {
        match self {
            BorrowingStatus::Pending => &[BorrowingStatus::Active, BorrowingStatus::Rejected],
            BorrowingStatus::Active => &[BorrowingStatus::Returned],
            BorrowingStatus::Rejected | BorrowingStatus::Returned => &[],
        }
    }

    pub fn is_terminal(self) -> bool {
        self.valid_transitions().is_empty()
    }
}

/// Derive the plan for `from -> to`, or `Conflict` if the move is not allowed.
pub fn plan(from: BorrowingStatus, to: BorrowingStatus) -> Result<TransitionPlan, CoreError> {
    if !from.valid_transitions().contains(&to) {
        return Err(CoreError::Conflict(format!(
            "Cannot transition borrowing from {from} to {to}"
        )));
    }

    let (stamp, asset_effect) = match to {
        BorrowingStatus::Active => (
            BorrowingStamp::BorrowedAt,
            Some(AssetEffect {
                expect: Some(AssetStatus::Available),
                set: AssetStatus::Borrowed,
            }),
        ),
        BorrowingStatus::Returned => (
            BorrowingStamp::ReturnedAt,
            Some(AssetEffect {
                expect: None,
                set: AssetStatus::Available,
            }),
        ),
        _ => (BorrowingStamp::None, None),
    };

    Ok(TransitionPlan {
        from,
        to,
        stamp,
        asset_effect,
    })
}

/// Plan for an admin decision on a borrowing that is currently `current`.
pub fn plan_action(
    current: BorrowingStatus,
    action: BorrowingAction,
) -> Result<TransitionPlan, CoreError> {
    if current != BorrowingStatus::Pending {
        return Err(CoreError::Conflict(format!(
            "Only PENDING borrow requests can be processed (current status: {current})"
        )));
    }
    plan(current, action.target_status())
}

/// Plan for returning a borrowing that is currently `current`.
pub fn plan_return(current: BorrowingStatus) -> Result<TransitionPlan, CoreError> {
    if current != BorrowingStatus::Active {
        return Err(CoreError::Conflict(format!(
            "Asset can only be returned when borrowing is ACTIVE (current status: {current})"
        )));
    }
    plan(current, BorrowingStatus::Returned)
}
