//! Employee entity model and DTOs.

use ams_core::employee::{
    Gender, MAX_ADDRESS_LENGTH, MAX_CONTACT_NUMBER_LENGTH, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH,
};
use ams_core::error::CoreError;
use ams_core::roles::Role;
use ams_core::status::{decode, StatusId};
use ams_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full row from the `employees` table.
///
/// Contains the password hash -- never serialize this directly.
/// Use [`EmployeeResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    pub name: String,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub role_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Employee {
    pub fn role(&self) -> Result<Role, CoreError> {
        decode(self.role_id, Role::from_id, "role")
    }
}

/// Safe employee representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: DbId,
    pub name: String,
    pub gender: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub email: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl TryFrom<Employee> for EmployeeResponse {
    type Error = CoreError;

    fn try_from(e: Employee) -> Result<Self, Self::Error> {
        let role = e.role()?;
        Ok(Self {
            id: e.id,
            name: e.name,
            gender: e.gender,
            contact_number: e.contact_number,
            address: e.address,
            email: e.email,
            role,
            created_at: e.created_at,
        })
    }
}

/// Editable profile fields shared by registration and update.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeProfile {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH))]
    pub name: String,
    pub gender: Option<Gender>,
    #[validate(length(max = MAX_CONTACT_NUMBER_LENGTH))]
    pub contact_number: Option<String>,
    #[validate(length(max = MAX_ADDRESS_LENGTH))]
    pub address: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
}

/// Insert payload; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub profile: EmployeeProfile,
    pub password_hash: String,
    pub role: Role,
}

/// Update payload. `password_hash` is only written when present.
#[derive(Debug, Clone)]
pub struct EmployeeChanges {
    pub profile: EmployeeProfile,
    pub password_hash: Option<String>,
}
