//! Asset entity model and DTOs.

use ams_core::asset::{
    MAX_ASSET_DESCRIPTION_LENGTH, MAX_ASSET_MODEL_LENGTH, MAX_ASSET_NAME_LENGTH,
    MAX_CATEGORY_NAME_LENGTH,
};
use ams_core::error::CoreError;
use ams_core::status::{decode, AssetStatus, StatusId};
use ams_core::types::{Date, DbId, Timestamp};
use ams_core::validation::{not_after, not_blank};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub name: String,
    pub category_id: DbId,
    pub model: Option<String>,
    pub manufacturing_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub value: f64,
    pub status_id: StatusId,
    pub description: Option<String>,
    /// Written only by the upload collaborator.
    pub image_path: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    pub fn status(&self) -> Result<AssetStatus, CoreError> {
        decode(self.status_id, AssetStatus::from_id, "asset")
    }
}

/// Asset row plus its resolved status label.
#[derive(Debug, Clone, Serialize)]
pub struct AssetResponse {
    #[serde(flatten)]
    pub asset: Asset,
    pub status: AssetStatus,
}

impl TryFrom<Asset> for AssetResponse {
    type Error = CoreError;

    fn try_from(asset: Asset) -> Result<Self, Self::Error> {
        let status = asset.status()?;
        Ok(Self { asset, status })
    }
}

/// Caller-supplied description of an asset, used for both create and update.
///
/// The category is named rather than referenced by id; a missing category is
/// created on the fly.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_asset_dates"))]
pub struct AssetSpec {
    #[validate(
        length(min = 1, max = MAX_ASSET_NAME_LENGTH),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = MAX_CATEGORY_NAME_LENGTH),
        custom(function = "not_blank")
    )]
    pub category: String,
    #[validate(length(max = MAX_ASSET_MODEL_LENGTH))]
    pub model: Option<String>,
    pub manufacturing_date: Option<Date>,
    pub expiry_date: Option<Date>,
    #[validate(range(exclusive_min = 0.0))]
    pub value: f64,
    /// Optional on update; must agree with the borrowing-derived status.
    pub status: Option<AssetStatus>,
    #[validate(length(max = MAX_ASSET_DESCRIPTION_LENGTH))]
    pub description: Option<String>,
}

fn validate_asset_dates(spec: &AssetSpec) -> Result<(), ValidationError> {
    let today = chrono::Utc::now().date_naive();
    if let Some(made) = &spec.manufacturing_date {
        not_after(made, today, "manufacturing_date_in_future")?;
    }
    if let (Some(made), Some(expires)) = (spec.manufacturing_date, spec.expiry_date) {
        if expires < made {
            let mut err = ValidationError::new("expiry_before_manufacturing");
            err.message = Some("expiry date precedes manufacturing date".into());
            return Err(err);
        }
    }
    Ok(())
}

/// Column values written on insert and on full update.
#[derive(Debug, Clone)]
pub struct AssetFields {
    pub name: String,
    pub category_id: DbId,
    pub model: Option<String>,
    pub manufacturing_date: Option<Date>,
    pub expiry_date: Option<Date>,
    pub value: f64,
    pub description: Option<String>,
}

impl AssetFields {
    pub fn from_spec(spec: &AssetSpec, category_id: DbId) -> Self {
        Self {
            name: spec.name.trim().to_string(),
            category_id,
            model: spec.model.clone(),
            manufacturing_date: spec.manufacturing_date,
            expiry_date: spec.expiry_date,
            value: spec.value,
            description: spec.description.clone(),
        }
    }
}
