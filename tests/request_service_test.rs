//! Approval workflow tests against a migrated SQLite database.

mod common;

use std::sync::Arc;

use dcim_api::domain::{DevicePatch, ProposedChange, RequestStatus};
use dcim_api::errors::AppError;
use dcim_api::infra::{MailQueue, Persistence};
use dcim_api::services::{
    AccountManager, AccountService, ApprovalWorkflow, CabinetManager, CabinetService,
    DeviceManager, DeviceService, RequestService,
};
use sea_orm::DatabaseConnection;

use common::{
    account, cabinet, count, device, persistence, seeded_database, RecordingMailQueue,
    ADMIN_EMAIL, ADMIN_ID, REQUESTER_EMAIL, REQUESTER_ID,
};

const BASE_URL: &str = "https://dcim.example.com";

fn workflow(
    db: &DatabaseConnection,
    mail: Arc<RecordingMailQueue>,
) -> ApprovalWorkflow<Persistence> {
    ApprovalWorkflow::new(persistence(db), mail as Arc<dyn MailQueue>, BASE_URL)
}

#[tokio::test]
async fn test_submit_mails_every_approver() {
    let db = seeded_database().await;
    AccountManager::new(persistence(&db))
        .create(account("admin2", "Super-Admin", Some("admin2@example.com")))
        .await
        .unwrap();
    let mail = RecordingMailQueue::new();
    let service = workflow(&db, mail.clone());

    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();

    assert_eq!(submitted.status, RequestStatus::Pending);
    let sent = mail.sent();
    let mut recipients: Vec<&str> = sent.iter().map(|job| job.to.as_str()).collect();
    recipients.sort();
    assert_eq!(recipients, vec!["admin2@example.com", ADMIN_EMAIL]);
    for job in &sent {
        assert_eq!(job.reply_to.as_deref(), Some(REQUESTER_EMAIL));
        assert!(job.body.contains(BASE_URL));
    }

    // Nothing is applied until a decision
    assert_eq!(count(&db, "cabinets").await, 0);
    let stored = service.get(submitted.request_id).await.unwrap();
    assert_eq!(stored.requested_by, REQUESTER_ID);
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_submit_requires_requester_email() {
    let db = seeded_database().await;
    AccountManager::new(persistence(&db))
        .create(account("nomail", "User", None))
        .await
        .unwrap();
    let mail = RecordingMailQueue::new();
    let service = workflow(&db, mail.clone());

    let result = service
        .submit("nomail", ProposedChange::AddCabinet(cabinet("A-01")))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(mail.sent().is_empty());
    assert_eq!(count(&db, "requests").await, 0);
}

#[tokio::test]
async fn test_submit_without_any_approver_email_is_refused() {
    let db = seeded_database().await;
    AccountManager::new(persistence(&db))
        .set_email(ADMIN_ID, None)
        .await
        .unwrap();
    let service = workflow(&db, RecordingMailQueue::new());

    let result = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(count(&db, "requests").await, 0);
}

#[tokio::test]
async fn test_submit_checks_delete_target_exists() {
    let db = seeded_database().await;
    let service = workflow(&db, RecordingMailQueue::new());

    let result = service
        .submit(REQUESTER_ID, ProposedChange::DeleteDevice { device_id: 77 })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_approval_applies_change_and_notifies_requester() {
    let db = seeded_database().await;
    let mail = RecordingMailQueue::new();
    let service = workflow(&db, mail.clone());

    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();
    let decided = service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await
        .unwrap();

    assert_eq!(decided.status, RequestStatus::Approved);
    assert_eq!(decided.decided_by.as_deref(), Some(ADMIN_ID));
    assert!(decided.decided_at.is_some());

    let cabinet = CabinetManager::new(persistence(&db))
        .get_by_location("A-01")
        .await
        .unwrap();
    assert_eq!(cabinet.data_center.as_deref(), Some("DC1"));

    let sent = mail.sent();
    let notice = sent.last().unwrap();
    assert_eq!(notice.to, REQUESTER_EMAIL);
}

#[tokio::test]
async fn test_rejection_changes_nothing() {
    let db = seeded_database().await;
    let uow = persistence(&db);
    CabinetManager::new(uow.clone())
        .create(cabinet("A-01"))
        .await
        .unwrap();
    let device_id = DeviceManager::new(uow)
        .create(device("sw1", "A-01"))
        .await
        .unwrap();
    let service = workflow(&db, RecordingMailQueue::new());

    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::DeleteDevice { device_id })
        .await
        .unwrap();
    let decided = service
        .decide(submitted.request_id, "Rejected", ADMIN_ID)
        .await
        .unwrap();

    assert_eq!(decided.status, RequestStatus::Rejected);
    assert_eq!(count(&db, "devices").await, 1);
}

#[tokio::test]
async fn test_decision_status_must_be_terminal() {
    let db = seeded_database().await;
    let service = workflow(&db, RecordingMailQueue::new());
    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();

    for status in ["Pending", "Maybe", ""] {
        let result = service.decide(submitted.request_id, status, ADMIN_ID).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{status}");
    }
}

#[tokio::test]
async fn test_second_decision_is_refused() {
    let db = seeded_database().await;
    let service = workflow(&db, RecordingMailQueue::new());
    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();

    service
        .decide(submitted.request_id, "Rejected", ADMIN_ID)
        .await
        .unwrap();
    let again = service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await;

    assert!(matches!(again, Err(AppError::InvalidState(_))));
    assert_eq!(count(&db, "cabinets").await, 0);
}

#[tokio::test]
async fn test_failed_apply_leaves_request_pending() {
    let db = seeded_database().await;
    let service = workflow(&db, RecordingMailQueue::new());
    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::AddDevice(device("sw1", "Z-99")))
        .await
        .unwrap();

    let result = service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let stored = service.get(submitted.request_id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Pending);
}

#[tokio::test]
async fn test_list_filters_by_status() {
    let db = seeded_database().await;
    let service = workflow(&db, RecordingMailQueue::new());
    let first = service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();
    service
        .submit(REQUESTER_ID, ProposedChange::AddCabinet(cabinet("A-02")))
        .await
        .unwrap();
    service
        .decide(first.request_id, "Approved", ADMIN_ID)
        .await
        .unwrap();

    let pending = service.list(Some(RequestStatus::Pending)).await.unwrap();
    let all = service.list(None).await.unwrap();

    assert_eq!(pending.len(), 1);
    assert_eq!(all.len(), 2);
}

async fn cabinet_with_device(db: &DatabaseConnection) -> (i32, i32) {
    let uow = persistence(db);
    let cabinet_id = CabinetManager::new(uow.clone())
        .create(cabinet("A-01"))
        .await
        .unwrap();
    let device_id = DeviceManager::new(uow)
        .create(device("sw1", "A-01"))
        .await
        .unwrap();
    (cabinet_id, device_id)
}

#[tokio::test]
async fn test_approved_bulk_import_adds_valid_rows() {
    let db = seeded_database().await;
    let (cabinet_id, _) = cabinet_with_device(&db).await;
    let service = workflow(&db, RecordingMailQueue::new());

    let mut unknown_owner = device("sw3", "A-01");
    unknown_owner.owner = "Facilities".to_string();
    let change = ProposedChange::BulkImportDevices {
        devices: vec![device("sw2", "A-01"), unknown_owner, device("sw4", "A-01")],
    };
    let submitted = service.submit(REQUESTER_ID, change).await.unwrap();
    assert_eq!(count(&db, "devices").await, 1);

    let decided = service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await
        .unwrap();

    assert_eq!(decided.status, RequestStatus::Approved);
    let mut labels: Vec<String> = DeviceManager::new(persistence(&db))
        .by_cabinet(cabinet_id)
        .await
        .unwrap()
        .into_iter()
        .map(|label| label.split(" - ").nth(1).unwrap().to_string())
        .collect();
    labels.sort();
    assert_eq!(labels, vec!["sw1", "sw2", "sw4"]);
}

#[tokio::test]
async fn test_approved_device_update_applies_stored_patch() {
    let db = seeded_database().await;
    let (_, device_id) = cabinet_with_device(&db).await;
    let service = workflow(&db, RecordingMailQueue::new());

    let patch = DevicePatch {
        label: Some("core-sw1".to_string()),
        position: Some(20),
        ..Default::default()
    };
    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::UpdateDevice { device_id, patch })
        .await
        .unwrap();
    let devices = DeviceManager::new(persistence(&db));
    assert_eq!(devices.get(device_id).await.unwrap().label, "sw1");

    service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await
        .unwrap();

    let detail = devices.get(device_id).await.unwrap();
    assert_eq!(detail.label, "core-sw1");
    assert_eq!(detail.position, 20);
    assert_eq!(detail.owner.as_deref(), Some("Network"));
}

#[tokio::test]
async fn test_approved_device_deletion_removes_device() {
    let db = seeded_database().await;
    let (_, device_id) = cabinet_with_device(&db).await;
    let service = workflow(&db, RecordingMailQueue::new());

    let submitted = service
        .submit(REQUESTER_ID, ProposedChange::DeleteDevice { device_id })
        .await
        .unwrap();
    assert_eq!(count(&db, "devices").await, 1);

    service
        .decide(submitted.request_id, "Approved", ADMIN_ID)
        .await
        .unwrap();

    assert_eq!(count(&db, "devices").await, 0);
    let devices = DeviceManager::new(persistence(&db));
    assert!(matches!(devices.get(device_id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_requester_markup_is_escaped_in_mail() {
    let db = seeded_database().await;
    let forged = r#"<a href="http://evil.example">APPROVE HERE</a>"#;
    AccountManager::new(persistence(&db))
        .rename(REQUESTER_ID, forged)
        .await
        .unwrap();
    let mail = RecordingMailQueue::new();
    let service = workflow(&db, mail.clone());

    service
        .submit(forged, ProposedChange::AddCabinet(cabinet("A-01")))
        .await
        .unwrap();

    let sent = mail.sent();
    assert!(!sent.is_empty());
    for job in &sent {
        assert!(!job.body.contains(forged), "{}", job.body);
        assert!(!job.body.contains("href=\"http://evil.example\""));
        assert!(job.body.contains("&lt;a href="));
    }
}
