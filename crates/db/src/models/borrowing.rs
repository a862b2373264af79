//! Borrowing record model.

use ams_core::error::CoreError;
use ams_core::status::{decode, BorrowingStatus, StatusId};
use ams_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `asset_borrowings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetBorrowing {
    pub id: DbId,
    pub employee_id: DbId,
    pub asset_id: DbId,
    pub status_id: StatusId,
    /// Request time while PENDING, approval time once ACTIVE.
    pub borrowed_at: Timestamp,
    pub returned_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssetBorrowing {
    pub fn status(&self) -> Result<BorrowingStatus, CoreError> {
        decode(self.status_id, BorrowingStatus::from_id, "borrowing")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BorrowingResponse {
    #[serde(flatten)]
    pub borrowing: AssetBorrowing,
    pub status: BorrowingStatus,
}

impl TryFrom<AssetBorrowing> for BorrowingResponse {
    type Error = CoreError;

    fn try_from(borrowing: AssetBorrowing) -> Result<Self, Self::Error> {
        let status = borrowing.status()?;
        Ok(Self { borrowing, status })
    }
}

/// DTO for filing a borrow request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBorrowRequest {
    pub asset_id: DbId,
}
