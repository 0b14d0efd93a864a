#![allow(dead_code)]

use chrono::NaiveDate;
use gym_membership_seaorm::entity::{customer, plan};
use gym_membership_seaorm::{DbConfig, GymStore, NewCustomer, NewPlan};
use sea_orm::prelude::{Date, Decimal};
use sea_orm::DatabaseConnection;

/// Create a fresh in-memory SQLite database with the schema applied.
///
/// A single pooled connection keeps every query on the same in-memory database.
pub async fn create_test_db() -> DatabaseConnection {
    let config = DbConfig {
        max_connections: 1,
        min_connections: 1,
        ..DbConfig::new("sqlite::memory:")
    };
    config
        .connect_and_migrate()
        .await
        .expect("Failed to set up test database")
}

pub async fn create_test_store() -> GymStore {
    GymStore::new(create_test_db().await)
}

pub fn date(y: i32, m: u32, d: u32) -> Date {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn monthly_plan(store: &GymStore) -> plan::Model {
    store
        .create_plan(NewPlan::new("Monthly", money(3000), 30))
        .await
        .expect("create plan")
}

pub async fn customer(store: &GymStore, name: &str, email: &str) -> customer::Model {
    store
        .create_customer(NewCustomer::new(name, email))
        .await
        .expect("create customer")
}
