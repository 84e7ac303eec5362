//! Shared fixtures for the integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema
//! and a small set of reference rows.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use dcim_api::domain::{NewAccount, NewCabinet, NewDevice};
use dcim_api::errors::AppResult;
use dcim_api::infra::{MailQueue, Migrator, Persistence};
use dcim_api::jobs::EmailJob;
use dcim_api::services::{AccountManager, AccountService};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const REQUESTER_ID: &str = "tech";
pub const REQUESTER_EMAIL: &str = "tech@example.com";
pub const PASSWORD: &str = "correct-horse-battery";

const SEED: &[&str] = &[
    "INSERT INTO data_centers (name) VALUES ('DC1')",
    "INSERT INTO data_centers (name) VALUES ('DC2')",
    "INSERT INTO departments (name) VALUES ('Network')",
    "INSERT INTO departments (name) VALUES ('Storage')",
    "INSERT INTO cabinet_rows (name) VALUES ('Row 1')",
    "INSERT INTO zones (description, map_x1, map_x2, map_y1, map_y2) VALUES ('Hall A', 10, 110, 20, 220)",
    "INSERT INTO people (user_id, last_name) VALUES ('jdoe', 'Doe')",
    "INSERT INTO manufacturers (name) VALUES ('Cisco')",
    "INSERT INTO device_templates (manufacturer_id, model, height, weight, wattage, ps_count, num_ports, chassis_slots, rear_chassis_slots, snmp_version) VALUES (1, 'C9300', 1, 8, 350, 2, 48, 0, 0, 'authPriv')",
    "INSERT INTO tags (name) VALUES ('core')",
];

/// Open a fresh migrated database.
///
/// One connection only: every pooled connection to `sqlite::memory:`
/// would otherwise see its own empty database.
pub async fn database() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = SeaDatabase::connect(options)
        .await
        .expect("open sqlite database");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// Migrated database with reference rows and two accounts: a Super-Admin
/// and a plain user, both with notification emails.
pub async fn seeded_database() -> DatabaseConnection {
    let db = database().await;
    for statement in SEED {
        db.execute_unprepared(statement).await.expect("seed row");
    }

    let accounts = AccountManager::new(Arc::new(Persistence::new(db.clone())));
    accounts
        .create(account(ADMIN_ID, "Super-Admin", Some(ADMIN_EMAIL)))
        .await
        .expect("create admin");
    accounts
        .create(account(REQUESTER_ID, "User", Some(REQUESTER_EMAIL)))
        .await
        .expect("create requester");
    db
}

pub fn persistence(db: &DatabaseConnection) -> Arc<Persistence> {
    Arc::new(Persistence::new(db.clone()))
}

pub fn account(user_id: &str, role: &str, email: Option<&str>) -> NewAccount {
    NewAccount {
        user_id: user_id.to_string(),
        password: PASSWORD.to_string(),
        role: Some(role.to_string()),
        email: email.map(str::to_string),
    }
}

pub fn cabinet(location: &str) -> NewCabinet {
    NewCabinet::new(location, "DC1")
}

pub fn device(label: &str, cabinet: &str) -> NewDevice {
    NewDevice::new(label, "Network", "jdoe, Doe", "DC1", cabinet)
}

pub async fn count(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(sea_orm::Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {}", table),
        ))
        .await
        .expect("count query")
        .expect("count row");
    row.try_get::<i64>("", "n").expect("count column")
}

/// Mail queue that keeps every job in memory.
#[derive(Default)]
pub struct RecordingMailQueue {
    jobs: Mutex<Vec<EmailJob>>,
}

impl RecordingMailQueue {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<EmailJob> {
        self.jobs.lock().expect("mail lock").clone()
    }
}

#[async_trait]
impl MailQueue for RecordingMailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        self.jobs.lock().expect("mail lock").push(job);
        Ok(())
    }
}
