//! Repository for the `service_requests` table.

use ams_core::service_request::ServiceStatusPolicy;
use ams_core::status::{BorrowingStatus, ServiceRequestStatus};
use ams_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::service_request::{NewServiceRequest, ServiceRequest};
use crate::store::ServiceStatusOutcome;

const COLUMNS: &str = "\
    id, employee_id, asset_id, issue_type, description, status_id, \
    requested_at, created_at, updated_at";

pub struct ServiceRequestRepo;

impl ServiceRequestRepo {
    /// Insert a Pending request if the employee holds the asset right now.
    ///
    /// The ACTIVE borrowing is share-locked so a concurrent return waits for
    /// this insert to commit.
    pub async fn create_for_holder(
        pool: &PgPool,
        input: &NewServiceRequest,
        at: Timestamp,
    ) -> StoreResult<Option<ServiceRequest>> {
        let mut tx = pool.begin().await?;

        let holder: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM asset_borrowings \
             WHERE employee_id = $1 AND asset_id = $2 AND status_id = $3 \
             FOR SHARE",
        )
        .bind(input.employee_id)
        .bind(input.asset_id)
        .bind(BorrowingStatus::Active.id())
        .fetch_optional(&mut *tx)
        .await?;
        if holder.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO service_requests \
                (employee_id, asset_id, issue_type, description, status_id, requested_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(input.employee_id)
            .bind(input.asset_id)
            .bind(input.issue_type.as_str())
            .bind(&input.description)
            .bind(ServiceRequestStatus::Pending.id())
            .bind(at)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(created))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_requests WHERE id = $1");
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ServiceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_requests ORDER BY id");
        sqlx::query_as::<_, ServiceRequest>(&query).fetch_all(pool).await
    }

    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<ServiceRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM service_requests WHERE employee_id = $1 ORDER BY id");
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_status(
        pool: &PgPool,
        status: ServiceRequestStatus,
    ) -> Result<Vec<ServiceRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM service_requests WHERE status_id = $1 ORDER BY id");
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(status.id())
            .fetch_all(pool)
            .await
    }

    /// Overwrite the status if `policy` accepts the move from the locked current value.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        to: ServiceRequestStatus,
        policy: ServiceStatusPolicy,
    ) -> StoreResult<ServiceStatusOutcome> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM service_requests WHERE id = $1 FOR UPDATE");
        let Some(current) = sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(ServiceStatusOutcome::NotFound);
        };
        let from = current.status()?;
        if policy.check(from, to).is_err() {
            return Ok(ServiceStatusOutcome::Refused { current: from });
        }

        let query =
            format!("UPDATE service_requests SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let updated = sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(to.id())
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(ServiceStatusOutcome::Updated(updated))
    }
}
