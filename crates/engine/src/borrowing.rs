//! Borrowing Workflow.
//!
//! Requests start PENDING and leave the asset untouched. Approval and return
//! move the borrowing and flip the asset's Available/Borrowed flag in one
//! store transition, so the flag always mirrors whether an ACTIVE borrowing
//! exists.

use ams_core::borrowing::{plan_action, plan_return, BorrowingAction, TransitionPlan};
use ams_core::error::CoreError;
use ams_core::status::{AssetStatus, BorrowingStatus};
use ams_core::types::DbId;
use ams_db::models::borrowing::AssetBorrowing;
use ams_db::store::{BorrowRequestOutcome, BorrowingTransition, TransitionOutcome};
use ams_db::EntityStore;
use chrono::Utc;

use crate::error::{conflict, EngineResult};

/// File a borrow request for `asset_id` on behalf of `employee_id`.
///
/// `borrowed_at` records the request time until the request is approved.
pub async fn request_borrow(
    store: &dyn EntityStore,
    employee_id: DbId,
    asset_id: DbId,
) -> EngineResult<AssetBorrowing> {
    if store.find_employee(employee_id).await?.is_none() {
        return Err(CoreError::not_found("Employee", employee_id).into());
    }
    let asset = store
        .find_asset(asset_id)
        .await?
        .ok_or(CoreError::not_found("Asset", asset_id))?;
    if asset.status()? == AssetStatus::Borrowed {
        tracing::warn!(employee_id, asset_id, "Borrow request refused: asset already borrowed");
        return conflict(format!("Asset {asset_id} is already Borrowed"));
    }

    match store
        .create_borrow_request(employee_id, asset_id, Utc::now())
        .await?
    {
        BorrowRequestOutcome::Created(borrowing) => {
            tracing::info!(
                borrowing_id = borrowing.id,
                employee_id,
                asset_id,
                "Borrow request filed",
            );
            Ok(borrowing)
        }
        BorrowRequestOutcome::AssetNotFound => Err(CoreError::not_found("Asset", asset_id).into()),
        BorrowRequestOutcome::AssetBorrowed => {
            tracing::warn!(employee_id, asset_id, "Borrow request refused: asset already borrowed");
            conflict(format!("Asset {asset_id} is already Borrowed"))
        }
        BorrowRequestOutcome::DuplicatePending => {
            tracing::warn!(employee_id, asset_id, "Borrow request refused: duplicate pending");
            conflict(format!(
                "Employee {employee_id} already has a PENDING request for asset {asset_id}"
            ))
        }
    }
}

/// Approve or reject a PENDING request.
///
/// Approval fails with `Conflict` if the asset became Borrowed after the
/// request was filed; the request then stays PENDING.
pub async fn process_borrowing_action(
    store: &dyn EntityStore,
    borrowing_id: DbId,
    action: BorrowingAction,
) -> EngineResult<AssetBorrowing> {
    let current = get_borrowing(store, borrowing_id).await?;
    let plan = plan_action(current.status()?, action)?;
    let borrowing = apply(store, borrowing_id, plan).await?;
    tracing::info!(
        borrowing_id,
        asset_id = borrowing.asset_id,
        action = action.as_str(),
        status = %plan.to,
        "Borrow request processed",
    );
    Ok(borrowing)
}

/// Return the asset of an ACTIVE borrowing.
pub async fn return_asset(store: &dyn EntityStore, borrowing_id: DbId) -> EngineResult<AssetBorrowing> {
    let current = get_borrowing(store, borrowing_id).await?;
    let plan = plan_return(current.status()?)?;
    let borrowing = apply(store, borrowing_id, plan).await?;
    tracing::info!(borrowing_id, asset_id = borrowing.asset_id, "Asset returned");
    Ok(borrowing)
}

async fn apply(
    store: &dyn EntityStore,
    borrowing_id: DbId,
    plan: TransitionPlan,
) -> EngineResult<AssetBorrowing> {
    let transition = BorrowingTransition {
        borrowing_id,
        plan,
        at: Utc::now(),
    };
    match store.transition_borrowing(&transition).await? {
        TransitionOutcome::Applied { borrowing, asset } => {
            if let Some(asset) = asset {
                let asset_status = asset.status()?;
                tracing::debug!(
                    borrowing_id,
                    asset_id = asset.id,
                    asset_status = %asset_status,
                    "Asset flag moved with borrowing",
                );
            }
            Ok(borrowing)
        }
        TransitionOutcome::NotFound => Err(CoreError::not_found("AssetBorrowing", borrowing_id).into()),
        TransitionOutcome::StatusMismatch(actual) => {
            tracing::warn!(
                borrowing_id,
                expected = %plan.from,
                actual = %actual,
                "Borrowing transition lost a race",
            );
            conflict(format!(
                "Borrowing {borrowing_id} is {actual}, expected {}",
                plan.from
            ))
        }
        TransitionOutcome::AssetMismatch(actual) => {
            tracing::warn!(
                borrowing_id,
                actual = %actual,
                "Borrowing transition refused: asset state changed",
            );
            conflict(format!(
                "Cannot move borrowing {borrowing_id} to {}: asset is {actual}",
                plan.to
            ))
        }
    }
}

pub async fn get_borrowing(store: &dyn EntityStore, id: DbId) -> EngineResult<AssetBorrowing> {
    Ok(store
        .find_borrowing(id)
        .await?
        .ok_or(CoreError::not_found("AssetBorrowing", id))?)
}

pub async fn borrowings_by_employee(
    store: &dyn EntityStore,
    employee_id: DbId,
) -> EngineResult<Vec<AssetBorrowing>> {
    Ok(store.list_borrowings_by_employee(employee_id).await?)
}

pub async fn borrowings_with_status(
    store: &dyn EntityStore,
    status: BorrowingStatus,
) -> EngineResult<Vec<AssetBorrowing>> {
    Ok(store.list_borrowings_by_status(status).await?)
}

pub async fn active_borrowings(store: &dyn EntityStore) -> EngineResult<Vec<AssetBorrowing>> {
    borrowings_with_status(store, BorrowingStatus::Active).await
}

pub async fn pending_borrowings(store: &dyn EntityStore) -> EngineResult<Vec<AssetBorrowing>> {
    borrowings_with_status(store, BorrowingStatus::Pending).await
}

pub async fn rejected_borrowings(store: &dyn EntityStore) -> EngineResult<Vec<AssetBorrowing>> {
    borrowings_with_status(store, BorrowingStatus::Rejected).await
}

pub async fn returned_borrowings(store: &dyn EntityStore) -> EngineResult<Vec<AssetBorrowing>> {
    borrowings_with_status(store, BorrowingStatus::Returned).await
}
