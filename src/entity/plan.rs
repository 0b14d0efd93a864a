//! Plan entity model for Sea-ORM database interaction.
//!
//! Plans are the subscription offers of the gym. A plan cannot be deleted while
//! any membership still references it.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity model representing a subscription plan.
///
/// # Database Schema
///
/// | Column        | Type                   | Description                           |
/// |---------------|------------------------|---------------------------------------|
/// | id            | INTEGER (Primary Key)  | Plan ID                               |
/// | name          | VARCHAR(100), UNIQUE   | Plan name                             |
/// | description   | TEXT, NULL             | Optional description                  |
/// | price         | DECIMAL(10, 2)         | Price of one period                   |
/// | duration_days | INTEGER, CHECK >= 0    | Length of one membership period       |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(100))", unique)]
    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,

    /// Number of days a membership on this plan lasts. Used to derive a
    /// membership's end date when none is given.
    pub duration_days: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::membership::Entity")]
    Membership,
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.price)
    }
}
