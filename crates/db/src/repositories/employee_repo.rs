//! Repository for the `employees` table.

use ams_core::types::DbId;
use sqlx::PgPool;

use crate::error::StoreResult;
use crate::models::employee::{Employee, EmployeeChanges, NewEmployee};
use crate::store::GuardedDelete;

/// Column list for `employees` queries.
const COLUMNS: &str = "\
    id, name, gender, contact_number, address, email, password_hash, \
    role_id, created_at, updated_at";

pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee. Fails with `uq_employees_email` on a duplicate email.
    pub async fn create(pool: &PgPool, input: &NewEmployee) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees \
                (name, gender, contact_number, address, email, password_hash, role_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let p = &input.profile;
        sqlx::query_as::<_, Employee>(&query)
            .bind(&p.name)
            .bind(p.gender.map(|g| g.as_str()))
            .bind(&p.contact_number)
            .bind(&p.address)
            .bind(&p.email)
            .bind(&input.password_hash)
            .bind(input.role.id())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE email = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees ORDER BY id");
        sqlx::query_as::<_, Employee>(&query).fetch_all(pool).await
    }

    /// Replace profile fields; the password hash is kept unless a new one is given.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET \
                name = $2, gender = $3, contact_number = $4, address = $5, email = $6, \
                password_hash = COALESCE($7, password_hash) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let p = &changes.profile;
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&p.name)
            .bind(p.gender.map(|g| g.as_str()))
            .bind(&p.contact_number)
            .bind(&p.address)
            .bind(&p.email)
            .bind(&changes.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Delete an employee unless any borrowing record references them.
    ///
    /// Audits and service requests cascade with the employee.
    pub async fn delete_if_unreferenced(pool: &PgPool, id: DbId) -> StoreResult<GuardedDelete> {
        let mut tx = pool.begin().await?;

        let found: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM employees WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if found.is_none() {
            return Ok(GuardedDelete::NotFound);
        }

        let (refs,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM asset_borrowings WHERE employee_id = $1")
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;
        if refs > 0 {
            return Ok(GuardedDelete::InUse(refs));
        }

        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(GuardedDelete::Deleted)
    }
}
