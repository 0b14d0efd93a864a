//! # Gym membership records for Sea-ORM
//!
//! Customers, subscription plans, the memberships that link them over a date
//! window, and the payments customers make, stored through
//! [Sea-ORM](https://crates.io/crates/sea-orm).
//!
//! The database does the enforcing. The [`Migrator`](migration::Migrator)
//! creates the tables with their unique, check and foreign-key constraints, and
//! [`GymStore`] reports the database's rejections as [`Error`] values. The only
//! computed field is a membership's end date: when it is left empty, saving the
//! membership sets it to the start date plus the plan's `duration_days`.
//!
//! ## Features
//!
//! - `postgres` (default): PostgreSQL driver
//! - `sqlite`: SQLite driver
//! - `migration` (default): schema migrations and
//!   [`DbConfig::connect_and_migrate`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use sea_orm::prelude::Decimal;
//! use gym_membership_seaorm::{DbConfig, GymStore, NewCustomer, NewMembership, NewPlan};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads DATABASE_URL (and a .env file if present)
//! let db = DbConfig::from_env()?.connect_and_migrate().await?;
//! let store = GymStore::new(db);
//!
//! let monthly = store
//!     .create_plan(NewPlan::new("Monthly", Decimal::new(3000, 2), 30))
//!     .await?;
//! let ana = store.create_customer(NewCustomer::new("Ana", "a@x.com")).await?;
//!
//! let membership = store
//!     .create_membership(
//!         NewMembership::new(ana.id, monthly.id)
//!             .starting(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
//!     )
//!     .await?;
//! assert_eq!(membership.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
//! # Ok(())
//! # }
//! ```
//!
//! ## Admin listing
//!
//! Every record type has a change list with free-text search and filters:
//!
//! ```no_run
//! use gym_membership_seaorm::admin::{ListParams, PaymentFilter};
//! use gym_membership_seaorm::{GymStore, PaymentStatus};
//!
//! # async fn example(store: GymStore) -> gym_membership_seaorm::Result<()> {
//! let pending = store
//!     .list_payments(
//!         &ListParams::search("a@x.com"),
//!         PaymentFilter {
//!             status: Some(PaymentStatus::Pending),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! for row in pending.items {
//!     println!("{row}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod admin;
mod config;
pub mod entity;
mod error;
#[cfg(feature = "migration")]
pub mod migration;
mod store;

pub use config::DbConfig;
pub use entity::{PaymentMethod, PaymentStatus};
pub use error::{Error, Result};
pub use store::{
    CustomerChanges, GymStore, MembershipChanges, NewCustomer, NewMembership, NewPayment,
    NewPlan, PaymentChanges, PlanChanges,
};
