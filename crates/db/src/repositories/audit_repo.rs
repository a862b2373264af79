//! Repository for the `asset_audits` table.

use ams_core::status::AuditStatus;
use ams_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::audit::AssetAudit;

const COLUMNS: &str = "id, employee_id, asset_id, status_id, requested_at, created_at, updated_at";

pub struct AuditRepo;

impl AuditRepo {
    /// Insert a PENDING audit. Existing PENDING audits for the pair do not block it.
    pub async fn create(
        pool: &PgPool,
        employee_id: DbId,
        asset_id: DbId,
        at: Timestamp,
    ) -> Result<AssetAudit, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_audits (employee_id, asset_id, status_id, requested_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetAudit>(&query)
            .bind(employee_id)
            .bind(asset_id)
            .bind(AuditStatus::Pending.id())
            .bind(at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetAudit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_audits WHERE id = $1");
        sqlx::query_as::<_, AssetAudit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<AssetAudit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_audits ORDER BY id");
        sqlx::query_as::<_, AssetAudit>(&query).fetch_all(pool).await
    }

    pub async fn list_by_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<AssetAudit>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM asset_audits WHERE employee_id = $1 ORDER BY id");
        sqlx::query_as::<_, AssetAudit>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Record a decision on a PENDING audit.
    ///
    /// The status predicate makes the write a compare-and-set: a second
    /// decision finds no PENDING row and returns `None`.
    pub async fn decide(
        pool: &PgPool,
        id: DbId,
        to: AuditStatus,
        at: Timestamp,
    ) -> Result<Option<AssetAudit>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_audits SET status_id = $2, updated_at = $3 \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetAudit>(&query)
            .bind(id)
            .bind(to.id())
            .bind(at)
            .bind(AuditStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }
}
