//! Repository for the `asset_borrowings` table.
//!
//! The two compound writes lock rows in a fixed order (borrowing, then asset)
//! so that concurrent approvals of different requests for the same asset
//! serialize on the asset row and the loser observes it Borrowed.

use ams_core::borrowing::BorrowingStamp;
use ams_core::status::{decode, AssetStatus, BorrowingStatus, StatusId};
use ams_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::{StoreError, StoreResult};
use crate::models::asset::Asset;
use crate::models::borrowing::AssetBorrowing;
use crate::repositories::asset_repo;
use crate::store::{BorrowRequestOutcome, BorrowingTransition, TransitionOutcome};

/// Column list for `asset_borrowings` queries.
const COLUMNS: &str = "\
    id, employee_id, asset_id, status_id, borrowed_at, returned_at, \
    created_at, updated_at";

pub struct BorrowingRepo;

impl BorrowingRepo {
    /// File a PENDING request, stamping `borrowed_at` with the request time.
    pub async fn create_request(
        pool: &PgPool,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> StoreResult<BorrowRequestOutcome> {
        let mut tx = pool.begin().await?;

        let asset: Option<(StatusId,)> =
            sqlx::query_as("SELECT status_id FROM assets WHERE id = $1 FOR UPDATE")
                .bind(asset_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((status_id,)) = asset else {
            return Ok(BorrowRequestOutcome::AssetNotFound);
        };
        if decode(status_id, AssetStatus::from_id, "asset")? == AssetStatus::Borrowed {
            return Ok(BorrowRequestOutcome::AssetBorrowed);
        }

        let (pending,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                 SELECT 1 FROM asset_borrowings \
                 WHERE employee_id = $1 AND asset_id = $2 AND status_id = $3 \
             )",
        )
        .bind(employee_id)
        .bind(asset_id)
        .bind(BorrowingStatus::Pending.id())
        .fetch_one(&mut *tx)
        .await?;
        if pending {
            return Ok(BorrowRequestOutcome::DuplicatePending);
        }

        let query = format!(
            "INSERT INTO asset_borrowings (employee_id, asset_id, status_id, borrowed_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(employee_id)
            .bind(asset_id)
            .bind(BorrowingStatus::Pending.id())
            .bind(at)
            .fetch_one(&mut *tx)
            .await
            .map_err(StoreError::from);

        match inserted {
            Ok(borrowing) => {
                tx.commit().await?;
                Ok(BorrowRequestOutcome::Created(borrowing))
            }
            Err(e) if e.is_unique_violation("uq_asset_borrowings_pending_pair") => {
                Ok(BorrowRequestOutcome::DuplicatePending)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply a planned transition and its coupled asset write in one transaction.
    pub async fn apply_transition(
        pool: &PgPool,
        transition: &BorrowingTransition,
    ) -> StoreResult<TransitionOutcome> {
        let plan = &transition.plan;
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM asset_borrowings WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(transition.borrowing_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(TransitionOutcome::NotFound);
        };
        let status = current.status()?;
        if status != plan.from {
            return Ok(TransitionOutcome::StatusMismatch(status));
        }

        let mut asset: Option<Asset> = None;
        if let Some(effect) = plan.asset_effect {
            let query = format!(
                "SELECT {} FROM assets WHERE id = $1 FOR UPDATE",
                asset_repo::COLUMNS
            );
            let locked = sqlx::query_as::<_, Asset>(&query)
                .bind(current.asset_id)
                .fetch_one(&mut *tx)
                .await?;
            let asset_status = locked.status()?;
            if let Some(expected) = effect.expect {
                if asset_status != expected {
                    return Ok(TransitionOutcome::AssetMismatch(asset_status));
                }
            }

            let query = format!(
                "UPDATE assets SET status_id = $2 WHERE id = $1 RETURNING {}",
                asset_repo::COLUMNS
            );
            asset = Some(
                sqlx::query_as::<_, Asset>(&query)
                    .bind(current.asset_id)
                    .bind(effect.set.id())
                    .fetch_one(&mut *tx)
                    .await?,
            );
        }

        let stamp_clause = match plan.stamp {
            BorrowingStamp::BorrowedAt => ", borrowed_at = $3",
            BorrowingStamp::ReturnedAt => ", returned_at = $3",
            BorrowingStamp::None => "",
        };
        let query = format!(
            "UPDATE asset_borrowings SET status_id = $2{stamp_clause} \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let mut update = sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(transition.borrowing_id)
            .bind(plan.to.id());
        if plan.stamp != BorrowingStamp::None {
            update = update.bind(transition.at);
        }
        let updated = update.fetch_one(&mut *tx).await.map_err(StoreError::from);

        match updated {
            Ok(borrowing) => {
                tx.commit().await?;
                Ok(TransitionOutcome::Applied { borrowing, asset })
            }
            Err(e) if e.is_unique_violation("uq_asset_borrowings_active_asset") => {
                Ok(TransitionOutcome::AssetMismatch(AssetStatus::Borrowed))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetBorrowing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_borrowings WHERE id = $1");
        sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<AssetBorrowing>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM asset_borrowings WHERE employee_id = $1 ORDER BY id");
        sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_status(
        pool: &PgPool,
        status: BorrowingStatus,
    ) -> Result<Vec<AssetBorrowing>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM asset_borrowings WHERE status_id = $1 ORDER BY id");
        sqlx::query_as::<_, AssetBorrowing>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }
}
