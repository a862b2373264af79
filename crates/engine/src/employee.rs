//! Employee Directory.
//!
//! Passwords arrive already hashed; hashing and verification belong to the
//! transport's auth layer.

use ams_core::error::CoreError;
use ams_core::roles::resolve_role;
use ams_core::types::DbId;
use ams_core::validation::validate_input;
use ams_db::models::employee::{Employee, EmployeeChanges, EmployeeProfile, NewEmployee};
use ams_db::store::GuardedDelete;
use ams_db::{EntityStore, StoreError};

use crate::error::{conflict, EngineError, EngineResult};

const EMAIL_CONSTRAINT: &str = "uq_employees_email";

fn email_taken(email: &str) -> EngineError {
    CoreError::AlreadyExists(format!("Employee with email '{email}' already exists")).into()
}

fn map_email_write(err: StoreError, email: &str) -> EngineError {
    if err.is_unique_violation(EMAIL_CONSTRAINT) {
        email_taken(email)
    } else {
        err.into()
    }
}

/// Register a new employee. Unknown or missing roles fall back to USER.
pub async fn register_employee(
    store: &dyn EntityStore,
    profile: EmployeeProfile,
    password_hash: String,
    requested_role: Option<&str>,
) -> EngineResult<Employee> {
    validate_input(&profile)?;
    if store.find_employee_by_email(&profile.email).await?.is_some() {
        return Err(email_taken(&profile.email));
    }

    let role = resolve_role(requested_role);
    let email = profile.email.clone();
    let employee = store
        .insert_employee(&NewEmployee {
            profile,
            password_hash,
            role,
        })
        .await
        .map_err(|e| map_email_write(e, &email))?;
    tracing::info!(employee_id = employee.id, role = %role, "Employee registered");
    Ok(employee)
}

pub async fn get_employee(store: &dyn EntityStore, id: DbId) -> EngineResult<Employee> {
    Ok(store
        .find_employee(id)
        .await?
        .ok_or(CoreError::not_found("Employee", id))?)
}

/// Lookup used by login; a miss is not an error here.
pub async fn find_by_email(store: &dyn EntityStore, email: &str) -> EngineResult<Option<Employee>> {
    Ok(store.find_employee_by_email(email.trim()).await?)
}

pub async fn list_employees(store: &dyn EntityStore) -> EngineResult<Vec<Employee>> {
    Ok(store.list_employees().await?)
}

/// Replace an employee's profile; the password changes only when a new hash is given.
pub async fn update_employee(
    store: &dyn EntityStore,
    id: DbId,
    changes: EmployeeChanges,
) -> EngineResult<Employee> {
    validate_input(&changes.profile)?;
    let email = changes.profile.email.clone();
    let employee = store
        .update_employee(id, &changes)
        .await
        .map_err(|e| map_email_write(e, &email))?
        .ok_or(CoreError::not_found("Employee", id))?;
    tracing::info!(employee_id = id, "Employee updated");
    Ok(employee)
}

/// Delete an employee with no borrowing records.
pub async fn delete_employee(store: &dyn EntityStore, id: DbId) -> EngineResult<()> {
    match store.delete_employee_if_unreferenced(id).await? {
        GuardedDelete::Deleted => {
            tracing::info!(employee_id = id, "Employee deleted");
            Ok(())
        }
        GuardedDelete::NotFound => Err(CoreError::not_found("Employee", id).into()),
        GuardedDelete::InUse(count) => {
            tracing::warn!(employee_id = id, count, "Employee delete refused: borrowing records");
            conflict(format!(
                "Cannot delete employee {id}: {count} borrowing record(s) reference them"
            ))
        }
    }
}
