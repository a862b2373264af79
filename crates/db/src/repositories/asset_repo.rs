//! Repository for the `assets` table.

use ams_core::asset::AssetDeletePolicy;
use ams_core::status::{decode, AssetStatus, BorrowingStatus, StatusId};
use ams_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::asset::{Asset, AssetFields};
use crate::store::AssetDeleteOutcome;

/// Column list for `assets` queries.
pub(crate) const COLUMNS: &str = "\
    id, name, category_id, model, manufacturing_date, expiry_date, value, \
    status_id, description, image_path, created_at, updated_at";

pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset. New assets always start Available.
    pub async fn create(pool: &PgPool, fields: &AssetFields) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets \
                (name, category_id, model, manufacturing_date, expiry_date, value, \
                 status_id, description) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&fields.name)
            .bind(fields.category_id)
            .bind(&fields.model)
            .bind(fields.manufacturing_date)
            .bind(fields.expiry_date)
            .bind(fields.value)
            .bind(AssetStatus::Available.id())
            .bind(&fields.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY id");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE category_id = $1 ORDER BY id");
        sqlx::query_as::<_, Asset>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Assets whose name matches exactly.
    pub async fn list_by_name(pool: &PgPool, name: &str) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE name = $1 ORDER BY id");
        sqlx::query_as::<_, Asset>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// Assets currently held by an employee through an ACTIVE borrowing.
    pub async fn list_held_by(pool: &PgPool, employee_id: DbId) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets \
             WHERE id IN ( \
                 SELECT asset_id FROM asset_borrowings \
                 WHERE employee_id = $1 AND status_id = $2 \
             ) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(employee_id)
            .bind(BorrowingStatus::Active.id())
            .fetch_all(pool)
            .await
    }

    /// Replace the mutable columns. `status_id` and `image_path` are left alone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &AssetFields,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                name = $2, category_id = $3, model = $4, manufacturing_date = $5, \
                expiry_date = $6, value = $7, description = $8 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&fields.name)
            .bind(fields.category_id)
            .bind(&fields.model)
            .bind(fields.manufacturing_date)
            .bind(fields.expiry_date)
            .bind(fields.value)
            .bind(&fields.description)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset if `policy` allows it.
    ///
    /// Under [`AssetDeletePolicy::RejectWhenBorrowed`] the asset's closed
    /// borrowing history is removed in the same transaction. Audits and
    /// service requests cascade with the asset.
    pub async fn delete_guarded(
        pool: &PgPool,
        id: DbId,
        policy: AssetDeletePolicy,
    ) -> StoreResult<AssetDeleteOutcome> {
        let mut tx = pool.begin().await?;

        let row: Option<(StatusId,)> =
            sqlx::query_as("SELECT status_id FROM assets WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((status_id,)) = row else {
            return Ok(AssetDeleteOutcome::NotFound);
        };
        if decode(status_id, AssetStatus::from_id, "asset")? == AssetStatus::Borrowed {
            return Ok(AssetDeleteOutcome::Borrowed);
        }

        match policy {
            AssetDeletePolicy::RejectWithHistory => {
                let (history,): (i64,) =
                    sqlx::query_as("SELECT COUNT(*) FROM asset_borrowings WHERE asset_id = $1")
                        .bind(id)
                        .fetch_one(&mut *tx)
                        .await?;
                if history > 0 {
                    return Ok(AssetDeleteOutcome::HasHistory(history));
                }
            }
            AssetDeletePolicy::RejectWhenBorrowed => {
                sqlx::query("DELETE FROM asset_borrowings WHERE asset_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(AssetDeleteOutcome::Deleted)
    }
}
