//! Asset Catalog Manager: categories and assets with referential guards.

use ams_core::asset::{validate_category_name, AssetDeletePolicy};
use ams_core::error::CoreError;
use ams_core::types::DbId;
use ams_core::validation::validate_input;
use ams_db::models::asset::{Asset, AssetFields, AssetSpec};
use ams_db::models::category::{AssetCategory, CategoryInput};
use ams_db::store::{AssetDeleteOutcome, GuardedDelete};
use ams_db::{EntityStore, StoreError};

use crate::error::{conflict, EngineResult};

const CATEGORY_NAME_CONSTRAINT: &str = "uq_asset_categories_name";

fn duplicate_category(name: &str) -> CoreError {
    CoreError::AlreadyExists(format!("Category '{name}' already exists"))
}

fn map_category_write(err: StoreError, name: &str) -> crate::EngineError {
    if err.is_unique_violation(CATEGORY_NAME_CONSTRAINT) {
        duplicate_category(name).into()
    } else {
        err.into()
    }
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub async fn create_category(
    store: &dyn EntityStore,
    input: &CategoryInput,
) -> EngineResult<AssetCategory> {
    validate_input(input)?;
    let name = input.name.trim();
    validate_category_name(name)?;

    if store.find_category_by_name(name).await?.is_some() {
        return Err(duplicate_category(name).into());
    }
    let category = store
        .insert_category(name)
        .await
        .map_err(|e| map_category_write(e, name))?;
    tracing::info!(category_id = category.id, name, "Category created");
    Ok(category)
}

pub async fn update_category(
    store: &dyn EntityStore,
    id: DbId,
    input: &CategoryInput,
) -> EngineResult<AssetCategory> {
    validate_input(input)?;
    let name = input.name.trim();
    validate_category_name(name)?;

    let category = store
        .rename_category(id, name)
        .await
        .map_err(|e| map_category_write(e, name))?
        .ok_or(CoreError::not_found("AssetCategory", id))?;
    tracing::info!(category_id = id, name, "Category renamed");
    Ok(category)
}

/// Delete a category no asset references.
pub async fn delete_category(store: &dyn EntityStore, id: DbId) -> EngineResult<()> {
    match store.delete_category_if_unused(id).await? {
        GuardedDelete::Deleted => {
            tracing::info!(category_id = id, "Category deleted");
            Ok(())
        }
        GuardedDelete::NotFound => Err(CoreError::not_found("AssetCategory", id).into()),
        GuardedDelete::InUse(count) => {
            tracing::warn!(category_id = id, count, "Category delete refused: still in use");
            conflict(format!(
                "Cannot delete category {id}: {count} asset(s) still reference it"
            ))
        }
    }
}

pub async fn get_category(store: &dyn EntityStore, id: DbId) -> EngineResult<AssetCategory> {
    Ok(store
        .find_category(id)
        .await?
        .ok_or(CoreError::not_found("AssetCategory", id))?)
}

pub async fn get_category_by_name(
    store: &dyn EntityStore,
    name: &str,
) -> EngineResult<AssetCategory> {
    let name = name.trim();
    Ok(store
        .find_category_by_name(name)
        .await?
        .ok_or_else(|| CoreError::NotFoundByName {
            entity: "AssetCategory",
            name: name.to_string(),
        })?)
}

pub async fn list_categories(store: &dyn EntityStore) -> EngineResult<Vec<AssetCategory>> {
    Ok(store.list_categories().await?)
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// Create an asset, creating its named category first if it does not exist.
/// New assets start Available.
pub async fn create_asset(store: &dyn EntityStore, spec: &AssetSpec) -> EngineResult<Asset> {
    validate_input(spec)?;
    let category = store.find_or_create_category(spec.category.trim()).await?;
    let asset = store
        .insert_asset(&AssetFields::from_spec(spec, category.id))
        .await?;
    tracing::info!(
        asset_id = asset.id,
        category_id = category.id,
        name = %asset.name,
        "Asset created",
    );
    Ok(asset)
}

/// Replace an asset's mutable fields.
///
/// The status is owned by the borrowing workflow: a `status` in `spec` is
/// accepted only when it matches the current one. The image path is never
/// touched.
pub async fn update_asset(
    store: &dyn EntityStore,
    id: DbId,
    spec: &AssetSpec,
) -> EngineResult<Asset> {
    validate_input(spec)?;
    let current = get_asset(store, id).await?;
    let current_status = current.status()?;
    if let Some(requested) = spec.status {
        if requested != current_status {
            tracing::warn!(
                asset_id = id,
                current = %current_status,
                requested = %requested,
                "Asset update refused: status is driven by borrowings",
            );
            return conflict(format!(
                "Asset {id} status is {current_status}; it changes only through borrowing \
                 approval and return"
            ));
        }
    }

    let category = store.find_or_create_category(spec.category.trim()).await?;
    let asset = store
        .update_asset(id, &AssetFields::from_spec(spec, category.id))
        .await?
        .ok_or(CoreError::not_found("Asset", id))?;
    tracing::info!(asset_id = id, "Asset updated");
    Ok(asset)
}

/// Delete an asset if `policy` allows it.
pub async fn delete_asset(
    store: &dyn EntityStore,
    id: DbId,
    policy: AssetDeletePolicy,
) -> EngineResult<()> {
    match store.delete_asset_guarded(id, policy).await? {
        AssetDeleteOutcome::Deleted => {
            tracing::info!(asset_id = id, policy = policy.as_str(), "Asset deleted");
            Ok(())
        }
        AssetDeleteOutcome::NotFound => Err(CoreError::not_found("Asset", id).into()),
        AssetDeleteOutcome::Borrowed => {
            tracing::warn!(asset_id = id, "Asset delete refused: currently borrowed");
            conflict(format!("Cannot delete asset {id}: it is currently Borrowed"))
        }
        AssetDeleteOutcome::HasHistory(count) => {
            tracing::warn!(asset_id = id, count, "Asset delete refused: borrowing history");
            conflict(format!(
                "Cannot delete asset {id}: {count} borrowing record(s) reference it"
            ))
        }
    }
}

pub async fn get_asset(store: &dyn EntityStore, id: DbId) -> EngineResult<Asset> {
    Ok(store
        .find_asset(id)
        .await?
        .ok_or(CoreError::not_found("Asset", id))?)
}

pub async fn list_assets(store: &dyn EntityStore) -> EngineResult<Vec<Asset>> {
    Ok(store.list_assets().await?)
}

/// Assets in the named category. Fails `NotFoundByName` for an unknown category.
pub async fn assets_by_category(store: &dyn EntityStore, category: &str) -> EngineResult<Vec<Asset>> {
    let category = get_category_by_name(store, category).await?;
    Ok(store.list_assets_by_category(category.id).await?)
}

/// Assets with exactly this name. Fails `NotFoundByName` when there are none.
pub async fn assets_by_name(store: &dyn EntityStore, name: &str) -> EngineResult<Vec<Asset>> {
    let name = name.trim();
    let assets = store.list_assets_by_name(name).await?;
    if assets.is_empty() {
        return Err(CoreError::NotFoundByName {
            entity: "Asset",
            name: name.to_string(),
        }
        .into());
    }
    Ok(assets)
}

/// Assets the employee currently holds through an ACTIVE borrowing.
pub async fn assets_held_by(store: &dyn EntityStore, employee_id: DbId) -> EngineResult<Vec<Asset>> {
    if store.find_employee(employee_id).await?.is_none() {
        return Err(CoreError::not_found("Employee", employee_id).into());
    }
    Ok(store.list_assets_held_by(employee_id).await?)
}
