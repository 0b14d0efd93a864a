//! Payment entity model for Sea-ORM database interaction.
//!
//! A payment always belongs to a customer and may be tied to one of the
//! customer's memberships. Payments go away with their customer but outlive
//! the membership they were made for.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How a payment was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "card")]
    Card,
}

/// Settlement state of a payment.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cash => "cash",
            Self::Card => "card",
        })
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        })
    }
}

/// Sea-ORM entity model representing a payment.
///
/// # Database Schema
///
/// | Column         | Type                         | Description                                  |
/// |----------------|------------------------------|----------------------------------------------|
/// | id             | INTEGER (Primary Key)        | Payment ID                                   |
/// | customer_id    | INTEGER                      | Paying customer (CASCADE on delete)          |
/// | membership_id  | INTEGER, NULL                | Membership paid for (SET NULL on delete)     |
/// | amount         | DECIMAL(10, 2), CHECK >= 0   | Amount paid                                  |
/// | paid_at        | TIMESTAMPTZ                  | When the payment was made                    |
/// | method         | VARCHAR(50)                  | `cash` or `card`                             |
/// | status         | VARCHAR(20)                  | `pending` or `paid`                          |
/// | transaction_id | VARCHAR(100), UNIQUE, NULL   | External reference from a bank or gateway    |
///
/// Indexed by `customer_id` and by `transaction_id`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub customer_id: i32,

    #[sea_orm(nullable)]
    pub membership_id: Option<i32>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount: Decimal,

    pub paid_at: DateTimeWithTimeZone,

    pub method: PaymentMethod,

    pub status: PaymentStatus,

    /// Identifier assigned outside the gym, for example by the bank or the
    /// payment gateway. Unique when present; several payments may have none.
    #[sea_orm(column_type = "String(StringLen::N(100))", unique, nullable)]
    pub transaction_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::membership::Entity",
        from = "Column::MembershipId",
        to = "super::membership::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Membership,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
