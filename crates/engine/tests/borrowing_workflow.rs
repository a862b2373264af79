//! Borrowing, audit and service-request workflows end to end on `MemoryStore`.

mod common;

use std::sync::Arc;

use ams_core::borrowing::BorrowingAction;
use ams_core::error::CoreError;
use ams_core::service_request::{IssueType, ServiceStatusPolicy};
use ams_core::status::{AssetStatus, AuditStatus, BorrowingStatus, ServiceRequestStatus};
use ams_db::models::service_request::CreateServiceRequest;
use ams_db::{EntityStore, MemoryStore};
use ams_engine::{audit, borrowing, catalog, service_request, EngineError};
use assert_matches::assert_matches;

use common::{assert_asset_flags_consistent, seeded};

fn repair(asset_id: i64) -> CreateServiceRequest {
    CreateServiceRequest {
        asset_id,
        issue_type: IssueType::Hardware,
        description: "Keyboard keys sticking".into(),
    }
}

#[tokio::test]
async fn request_approve_service_return_scenario() {
    let (store, employee, asset) = seeded().await;

    let requested = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    assert_eq!(requested.status().unwrap(), BorrowingStatus::Pending);
    let requested_at = requested.borrowed_at;
    assert_eq!(
        catalog::get_asset(&store, asset).await.unwrap().status().unwrap(),
        AssetStatus::Available
    );
    assert_asset_flags_consistent(&store).await;

    let approved =
        borrowing::process_borrowing_action(&store, requested.id, BorrowingAction::Approve)
            .await
            .unwrap();
    assert_eq!(approved.status().unwrap(), BorrowingStatus::Active);
    assert!(approved.borrowed_at >= requested_at);
    assert_eq!(
        catalog::get_asset(&store, asset).await.unwrap().status().unwrap(),
        AssetStatus::Borrowed
    );
    assert_asset_flags_consistent(&store).await;

    let ticket = service_request::create_service_request(&store, employee, &repair(asset))
        .await
        .unwrap();
    assert_eq!(ticket.status().unwrap(), ServiceRequestStatus::Pending);

    let returned = borrowing::return_asset(&store, requested.id).await.unwrap();
    assert_eq!(returned.status().unwrap(), BorrowingStatus::Returned);
    assert!(returned.returned_at.is_some());
    assert_eq!(
        catalog::get_asset(&store, asset).await.unwrap().status().unwrap(),
        AssetStatus::Available
    );
    assert_asset_flags_consistent(&store).await;

    let again = borrowing::return_asset(&store, requested.id).await.unwrap_err();
    assert_matches!(again, EngineError::Core(CoreError::Conflict(_)));
}

#[tokio::test]
async fn second_pending_request_for_same_pair_conflicts() {
    let (store, employee, asset) = seeded().await;
    borrowing::request_borrow(&store, employee, asset).await.unwrap();

    let err = borrowing::request_borrow(&store, employee, asset).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
    assert_eq!(borrowing::pending_borrowings(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn request_for_unknown_employee_or_asset_is_not_found() {
    let (store, employee, asset) = seeded().await;
    assert_matches!(
        borrowing::request_borrow(&store, 404, asset).await,
        Err(EngineError::Core(CoreError::NotFound { entity: "Employee", .. }))
    );
    assert_matches!(
        borrowing::request_borrow(&store, employee, 404).await,
        Err(EngineError::Core(CoreError::NotFound { entity: "Asset", .. }))
    );
}

#[tokio::test]
async fn request_for_borrowed_asset_conflicts() {
    let (store, employee, asset) = seeded().await;
    let other = common::employee(&store, "omar@example.com").await;
    let b = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    borrowing::process_borrowing_action(&store, b.id, BorrowingAction::Approve)
        .await
        .unwrap();

    let err = borrowing::request_borrow(&store, other, asset).await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
}

#[tokio::test]
async fn approving_when_asset_already_borrowed_conflicts_and_keeps_pending() {
    let (store, employee, asset) = seeded().await;
    let other = common::employee(&store, "omar@example.com").await;
    let first = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    let second = borrowing::request_borrow(&store, other, asset).await.unwrap();

    borrowing::process_borrowing_action(&store, first.id, BorrowingAction::Approve)
        .await
        .unwrap();
    let err = borrowing::process_borrowing_action(&store, second.id, BorrowingAction::Approve)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));

    let second = borrowing::get_borrowing(&store, second.id).await.unwrap();
    assert_eq!(second.status().unwrap(), BorrowingStatus::Pending);
    assert_asset_flags_consistent(&store).await;

    // The loser can still be rejected.
    let rejected = borrowing::process_borrowing_action(&store, second.id, BorrowingAction::Reject)
        .await
        .unwrap();
    assert_eq!(rejected.status().unwrap(), BorrowingStatus::Rejected);
    assert_eq!(borrowing::rejected_borrowings(&store).await.unwrap().len(), 1);
}

#[tokio::test]
async fn reject_leaves_asset_available() {
    let (store, employee, asset) = seeded().await;
    let b = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    borrowing::process_borrowing_action(&store, b.id, BorrowingAction::Reject)
        .await
        .unwrap();

    assert_eq!(
        catalog::get_asset(&store, asset).await.unwrap().status().unwrap(),
        AssetStatus::Available
    );
    let err = borrowing::process_borrowing_action(&store, b.id, BorrowingAction::Approve)
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));
    assert_asset_flags_consistent(&store).await;
}

#[tokio::test]
async fn only_active_borrowings_can_be_returned() {
    let (store, employee, asset) = seeded().await;
    let other = common::employee(&store, "omar@example.com").await;

    let pending = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    assert_matches!(
        borrowing::return_asset(&store, pending.id).await,
        Err(EngineError::Core(CoreError::Conflict(_)))
    );

    let rejected = borrowing::request_borrow(&store, other, asset).await.unwrap();
    borrowing::process_borrowing_action(&store, rejected.id, BorrowingAction::Reject)
        .await
        .unwrap();
    assert_matches!(
        borrowing::return_asset(&store, rejected.id).await,
        Err(EngineError::Core(CoreError::Conflict(_)))
    );

    assert_matches!(
        borrowing::return_asset(&store, 9_999).await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn list_reads_return_empty_collections() {
    let store = MemoryStore::new();
    assert!(borrowing::active_borrowings(&store).await.unwrap().is_empty());
    assert!(borrowing::returned_borrowings(&store).await.unwrap().is_empty());
    assert!(borrowing::borrowings_by_employee(&store, 1).await.unwrap().is_empty());
    assert!(audit::all_audits(&store).await.unwrap().is_empty());
    assert!(service_request::all_service_requests(&store).await.unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_approvals_for_one_asset_have_single_winner() {
    let (store, _, asset) = seeded().await;
    let store = Arc::new(store);

    let mut requests = Vec::new();
    for i in 0..8 {
        let e = common::employee(store.as_ref(), &format!("racer{i}@example.com")).await;
        requests.push(
            borrowing::request_borrow(store.as_ref(), e, asset)
                .await
                .unwrap()
                .id,
        );
    }

    let tasks = requests.into_iter().map(|id| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            borrowing::process_borrowing_action(store.as_ref(), id, BorrowingAction::Approve).await
        })
    });
    let results: Vec<_> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert_matches!(r, Err(EngineError::Core(CoreError::Conflict(_))));
    }
    assert_eq!(borrowing::active_borrowings(store.as_ref()).await.unwrap().len(), 1);
    assert_asset_flags_consistent(store.as_ref()).await;
}

// ---------------------------------------------------------------------------
// Audits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn audit_decision_by_other_employee_is_unauthorized_whatever_the_action() {
    let (store, employee, asset) = seeded().await;
    let intruder = common::employee(&store, "intruder@example.com").await;
    let a = audit::send_audit(&store, employee, asset).await.unwrap();

    for action in ["VERIFY", "REJECT", "DANCE", ""] {
        let err = audit::decide_audit(&store, a.id, intruder, action).await.unwrap_err();
        assert_matches!(err, EngineError::Core(CoreError::Unauthorized(_)));
    }
    let unchanged = audit::get_audit(&store, a.id).await.unwrap();
    assert_eq!(unchanged.status().unwrap(), AuditStatus::Pending);
}

#[tokio::test]
async fn audit_decision_rules() {
    let (store, employee, asset) = seeded().await;
    let a = audit::send_audit(&store, employee, asset).await.unwrap();

    let err = audit::decide_audit(&store, a.id, employee, "APPROVE").await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::BadInput(_)));

    let verified = audit::decide_audit(&store, a.id, employee, "verify").await.unwrap();
    assert_eq!(verified.status().unwrap(), AuditStatus::Verified);
    assert!(verified.updated_at >= verified.requested_at);

    let err = audit::decide_audit(&store, a.id, employee, "REJECT").await.unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));

    assert_matches!(
        audit::decide_audit(&store, 9_999, employee, "VERIFY").await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn pending_audits_may_repeat_for_the_same_pair() {
    let (store, employee, asset) = seeded().await;
    audit::send_audit(&store, employee, asset).await.unwrap();
    audit::send_audit(&store, employee, asset).await.unwrap();
    assert_eq!(audit::audits_by_employee(&store, employee).await.unwrap().len(), 2);

    assert_matches!(
        audit::send_audit(&store, employee, 404).await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Service requests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn service_request_requires_active_borrowing() {
    let (store, employee, asset) = seeded().await;

    let err = service_request::create_service_request(&store, employee, &repair(asset))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));

    // A PENDING request is not custody.
    let b = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    assert_matches!(
        service_request::create_service_request(&store, employee, &repair(asset)).await,
        Err(EngineError::Core(CoreError::Conflict(_)))
    );

    borrowing::process_borrowing_action(&store, b.id, BorrowingAction::Approve)
        .await
        .unwrap();
    let created = service_request::create_service_request(&store, employee, &repair(asset))
        .await
        .unwrap();
    assert_eq!(created.issue_type, "HARDWARE");
    assert_eq!(
        service_request::service_requests_by_status(&store, ServiceRequestStatus::Pending)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn blank_service_description_is_bad_input() {
    let (store, employee, asset) = seeded().await;
    let mut input = repair(asset);
    input.description = "   ".into();
    assert_matches!(
        service_request::create_service_request(&store, employee, &input).await,
        Err(EngineError::Core(CoreError::BadInput(_)))
    );
}

#[tokio::test]
async fn status_policy_governs_service_updates() {
    let (store, employee, asset) = seeded().await;
    let b = borrowing::request_borrow(&store, employee, asset).await.unwrap();
    borrowing::process_borrowing_action(&store, b.id, BorrowingAction::Approve)
        .await
        .unwrap();
    let ticket = service_request::create_service_request(&store, employee, &repair(asset))
        .await
        .unwrap();

    let completed = service_request::update_service_request_status(
        &store,
        ServiceStatusPolicy::Unrestricted,
        ticket.id,
        ServiceRequestStatus::Completed,
    )
    .await
    .unwrap();
    assert_eq!(completed.status().unwrap(), ServiceRequestStatus::Completed);

    // Unrestricted lets an admin move backward.
    service_request::update_service_request_status(
        &store,
        ServiceStatusPolicy::Unrestricted,
        ticket.id,
        ServiceRequestStatus::Pending,
    )
    .await
    .unwrap();

    service_request::update_service_request_status(
        &store,
        ServiceStatusPolicy::ForwardOnly,
        ticket.id,
        ServiceRequestStatus::Transit,
    )
    .await
    .unwrap();
    let err = service_request::update_service_request_status(
        &store,
        ServiceStatusPolicy::ForwardOnly,
        ticket.id,
        ServiceRequestStatus::Pending,
    )
    .await
    .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Conflict(_)));

    assert_matches!(
        service_request::update_service_request_status(
            &store,
            ServiceStatusPolicy::Unrestricted,
            9_999,
            ServiceRequestStatus::Transit,
        )
        .await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
}

#[tokio::test]
async fn service_request_reads() {
    let (store, employee, _) = seeded().await;
    assert!(service_request::service_requests_by_employee(&store, employee)
        .await
        .unwrap()
        .is_empty());
    assert_matches!(
        service_request::get_service_request(&store, 1).await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
    assert!(store.ping().await.is_ok());
}
