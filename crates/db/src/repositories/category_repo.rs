//! Repository for the `asset_categories` table.

use ams_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::category::AssetCategory;
use crate::store::GuardedDelete;

const COLUMNS: &str = "id, name, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. Fails with `uq_asset_categories_name` on a duplicate.
    pub async fn create(pool: &PgPool, name: &str) -> Result<AssetCategory, sqlx::Error> {
        let query = format!("INSERT INTO asset_categories (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Return the named category, inserting it first if missing.
    ///
    /// Safe under concurrent callers: a lost insert race falls through to the
    /// select of the winner's row.
    pub async fn find_or_create(pool: &PgPool, name: &str) -> Result<AssetCategory, sqlx::Error> {
        let insert = format!(
            "INSERT INTO asset_categories (name) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_asset_categories_name DO NOTHING \
             RETURNING {COLUMNS}"
        );
        if let Some(created) = sqlx::query_as::<_, AssetCategory>(&insert)
            .bind(name)
            .fetch_optional(pool)
            .await?
        {
            return Ok(created);
        }
        let query = format!("SELECT {COLUMNS} FROM asset_categories WHERE name = $1");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories WHERE id = $1");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories WHERE name = $1");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories ORDER BY id");
        sqlx::query_as::<_, AssetCategory>(&query).fetch_all(pool).await
    }

    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query =
            format!("UPDATE asset_categories SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category that no asset references.
    ///
    /// The row lock conflicts with the key-share lock an asset insert takes on
    /// its category, so the count cannot go stale before the delete.
    pub async fn delete_if_unused(pool: &PgPool, id: DbId) -> StoreResult<GuardedDelete> {
        let mut tx = pool.begin().await?;

        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM asset_categories WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Ok(GuardedDelete::NotFound);
        }

        let (in_use,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM assets WHERE category_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if in_use > 0 {
            return Ok(GuardedDelete::InUse(in_use));
        }

        sqlx::query("DELETE FROM asset_categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(GuardedDelete::Deleted)
    }
}
