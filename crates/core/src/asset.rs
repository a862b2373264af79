//! Asset catalog rules: field limits and the deletion policy.

use std::str::FromStr;

use crate::error::CoreError;

/// Maximum length of an asset name.
pub const MAX_ASSET_NAME_LENGTH: u64 = 60;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LENGTH: u64 = 50;

/// Maximum length of an asset model designation.
pub const MAX_ASSET_MODEL_LENGTH: u64 = 50;

/// Maximum length of an asset description.
pub const MAX_ASSET_DESCRIPTION_LENGTH: u64 = 2048;

/// Which borrowing records block deleting an asset.
///
/// - `RejectWithHistory`: any borrowing record, whatever its status.
/// - `RejectWhenBorrowed`: only the asset being currently Borrowed; the
///   asset's closed borrowing history is deleted together with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetDeletePolicy {
    #[default]
    RejectWithHistory,
    RejectWhenBorrowed,
}

impl AssetDeletePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetDeletePolicy::RejectWithHistory => "reject_with_history",
            AssetDeletePolicy::RejectWhenBorrowed => "reject_when_borrowed",
        }
    }
}

impl FromStr for AssetDeletePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject_with_history" => Ok(AssetDeletePolicy::RejectWithHistory),
            "reject_when_borrowed" => Ok(AssetDeletePolicy::RejectWhenBorrowed),
            other => Err(CoreError::BadInput(format!(
                "Invalid asset delete policy '{other}'. Must be one of: \
                 reject_with_history, reject_when_borrowed"
            ))),
        }
    }
}

/// Validate a category name outside of a derive context (path segments).
pub fn validate_category_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::BadInput("Category name must not be blank".into()));
    }
    if trimmed.chars().count() as u64 > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::BadInput(format!(
            "Category name must not exceed {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}
