//! Cabinet service tests against a migrated SQLite database.

mod common;

use chrono::NaiveDate;
use dcim_api::domain::{CabinetPatch, DateInput, MapRect};
use dcim_api::errors::AppError;
use dcim_api::infra::repositories::CabinetRecord;
use dcim_api::infra::UnitOfWork;
use dcim_api::services::{CabinetManager, CabinetService, DeviceManager, DeviceService};

use common::{cabinet, count, device, persistence, seeded_database};

#[tokio::test]
async fn test_create_inherits_zone_map_and_defaults() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));

    let mut new_cabinet = cabinet("A-01");
    new_cabinet.zone = Some("Hall A".to_string());
    new_cabinet.map_x2 = Some(150);
    new_cabinet.assigned_to = Some("Network".to_string());

    let id = service.create(new_cabinet).await.unwrap();
    let detail = service.get(id).await.unwrap();

    assert_eq!(detail.location, "A-01");
    assert_eq!(detail.location_sortable, "A-01");
    assert_eq!(detail.data_center.as_deref(), Some("DC1"));
    assert_eq!(detail.assigned_to.as_deref(), Some("Network"));
    assert_eq!(detail.zone.as_deref(), Some("Hall A"));
    assert_eq!(
        (detail.map_x1, detail.map_x2, detail.map_y1, detail.map_y2),
        (10, 150, 20, 220)
    );
    assert_eq!(detail.date_of_installation.to_string(), "1970-01-01");
}

#[tokio::test]
async fn test_create_rejects_unknown_data_center_without_writing() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));

    let result = service
        .create(dcim_api::domain::NewCabinet::new("A-01", "Nowhere"))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(count(&db, "cabinets").await, 0);
}

#[tokio::test]
async fn test_create_rejects_duplicate_location_in_same_data_center() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));

    service.create(cabinet("A-01")).await.unwrap();
    let result = service.create(cabinet("A-01")).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    // Same location in another data center is fine
    service
        .create(dcim_api::domain::NewCabinet::new("A-01", "DC2"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_partial_update_keeps_unsupplied_fields() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));

    let mut new_cabinet = cabinet("A-01");
    new_cabinet.model = Some("APC AR3100".to_string());
    new_cabinet.max_kw = Some(7.5);
    new_cabinet.date_of_installation = Some(DateInput::Text("2021-06-15".to_string()));
    let id = service.create(new_cabinet).await.unwrap();

    let patch = CabinetPatch {
        notes: Some("re-labelled".to_string()),
        ..Default::default()
    };
    let updated = service.update(id, patch).await.unwrap();

    assert_eq!(updated.notes, "re-labelled");
    assert_eq!(updated.model, "APC AR3100");
    assert_eq!(updated.max_kw, 7.5);
    assert_eq!(updated.location, "A-01");
    assert_eq!(updated.date_of_installation.to_string(), "2021-06-15");
}

#[tokio::test]
async fn test_update_with_no_fields_is_rejected() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));
    let id = service.create(cabinet("A-01")).await.unwrap();

    let result = service.update(id, CabinetPatch::default()).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_update_of_missing_cabinet_is_not_found() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));

    let patch = CabinetPatch {
        notes: Some("x".to_string()),
        ..Default::default()
    };
    let result = service.update(404, patch).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));
    let id = service.create(cabinet("A-01")).await.unwrap();

    service.delete(id).await.unwrap();
    let second = service.delete(id).await;

    assert!(matches!(second, Err(AppError::NotFound(_))));
    assert!(matches!(service.get(id).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_refuses_cabinet_with_devices() {
    let db = seeded_database().await;
    let uow = persistence(&db);
    let cabinets = CabinetManager::new(uow.clone());
    let devices = DeviceManager::new(uow);

    let id = cabinets.create(cabinet("A-01")).await.unwrap();
    devices.create(device("sw1", "A-01")).await.unwrap();

    let result = cabinets.delete(id).await;

    assert!(matches!(result, Err(AppError::InvalidState(_))));
    assert_eq!(count(&db, "cabinets").await, 1);
}

#[tokio::test]
async fn test_list_by_data_center_uses_id_dash_location() {
    let db = seeded_database().await;
    let service = CabinetManager::new(persistence(&db));
    let id = service.create(cabinet("A-01")).await.unwrap();

    let labels = service.list_by_data_center("DC1").await.unwrap();

    assert_eq!(labels, vec![format!("{} - A-01", id)]);
}

fn record(location: &str) -> CabinetRecord {
    CabinetRecord {
        location: location.to_string(),
        location_sortable: location.to_string(),
        data_center_id: 1,
        assigned_to: None,
        zone_id: None,
        cab_row_id: None,
        cabinet_height: 42,
        u1_position: String::new(),
        model: String::new(),
        key_lock: String::new(),
        max_kw: 0.0,
        max_weight: 0,
        installation_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
        notes: String::new(),
        map: MapRect::ZERO,
    }
}

#[tokio::test]
async fn test_unique_index_violation_is_a_conflict() {
    let db = seeded_database().await;
    let uow = persistence(&db);

    // Insert past the location pre-check, as a racing writer would
    let insert = |location: &'static str| {
        let uow = uow.clone();
        async move {
            uow.transaction(move |ctx| {
                Box::pin(async move { ctx.cabinets().insert(record(location)).await })
            })
            .await
        }
    };
    insert("A-01").await.unwrap();
    let second = insert("A-01").await;

    let err = second.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    assert_eq!(err.code(), "CONFLICT");
    assert_eq!(count(&db, "cabinets").await, 1);
}
