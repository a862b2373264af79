//! Shared fixtures for engine tests.

#![allow(dead_code)]

use ams_core::employee::Gender;
use ams_core::status::{AssetStatus, BorrowingStatus};
use ams_core::types::{Date, DbId};
use ams_db::models::asset::AssetSpec;
use ams_db::models::employee::EmployeeProfile;
use ams_db::{EntityStore, MemoryStore};
use ams_engine::{catalog, employee};

pub fn profile(email: &str) -> EmployeeProfile {
    EmployeeProfile {
        name: "Priya Nair".into(),
        gender: Some(Gender::Female),
        contact_number: Some("5550199".into()),
        address: Some("12 Harbour Rd".into()),
        email: email.into(),
    }
}

pub fn asset_spec(name: &str, category: &str) -> AssetSpec {
    AssetSpec {
        name: name.into(),
        category: category.into(),
        model: Some("2024".into()),
        manufacturing_date: Date::from_ymd_opt(2024, 1, 15),
        expiry_date: Date::from_ymd_opt(2029, 1, 15),
        value: 1450.0,
        status: None,
        description: Some("Issued with charger".into()),
    }
}

pub async fn employee(store: &dyn EntityStore, email: &str) -> DbId {
    employee::register_employee(store, profile(email), "$argon2id$test".into(), None)
        .await
        .unwrap()
        .id
}

pub async fn asset(store: &dyn EntityStore, name: &str) -> DbId {
    catalog::create_asset(store, &asset_spec(name, "Laptops"))
        .await
        .unwrap()
        .id
}

/// Store with one employee and one Available asset.
pub async fn seeded() -> (MemoryStore, DbId, DbId) {
    let store = MemoryStore::new();
    let e = employee(&store, "priya@example.com").await;
    let a = asset(&store, "MacBook Air").await;
    (store, e, a)
}

/// Every asset is Borrowed iff exactly one ACTIVE borrowing references it,
/// and no asset has more than one.
pub async fn assert_asset_flags_consistent(store: &dyn EntityStore) {
    let active = store
        .list_borrowings_by_status(BorrowingStatus::Active)
        .await
        .unwrap();
    for asset in store.list_assets().await.unwrap() {
        let holders = active.iter().filter(|b| b.asset_id == asset.id).count();
        let status = asset.status().unwrap();
        assert!(holders <= 1, "asset {} has {holders} ACTIVE borrowings", asset.id);
        assert_eq!(
            status == AssetStatus::Borrowed,
            holders == 1,
            "asset {} is {status} with {holders} ACTIVE borrowing(s)",
            asset.id
        );
    }
}
