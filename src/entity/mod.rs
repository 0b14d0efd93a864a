//! Database entity models for gym-membership-seaorm.
//!
//! This module contains the Sea-ORM entity definitions for the gym schema.
//! The tables themselves, including the unique and check constraints the
//! entities rely on, are created by the [`Migrator`](crate::migration::Migrator).
//!
//! `customer` and `plan` are leaf records; `membership` references both and
//! `payment` references a customer and, optionally, a membership.

/// Login identity a customer may be linked to.
pub mod auth_user;

/// Registered gym members.
pub mod customer;

/// Customer-to-plan subscriptions over a date window.
pub mod membership;

/// Payments made by customers.
pub mod payment;

/// Subscription offers.
pub mod plan;

pub use payment::{PaymentMethod, PaymentStatus};
