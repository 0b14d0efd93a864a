//! Customer entity model for Sea-ORM database interaction.
//!
//! A customer is a registered gym member. Customers are deactivated through the
//! `active` flag rather than deleted; deleting one cascades to its memberships
//! and payments.

use std::fmt;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity model representing a customer in the database.
///
/// # Database Schema
///
/// | Column        | Type                      | Description                               |
/// |---------------|---------------------------|-------------------------------------------|
/// | id            | INTEGER (Primary Key)     | Customer ID                               |
/// | name          | VARCHAR(100)              | Full name                                 |
/// | email         | VARCHAR(254), UNIQUE      | Contact email, unique across customers    |
/// | phone         | VARCHAR(20), NULL         | Optional phone number                     |
/// | registered_at | TIMESTAMPTZ               | Registration time                         |
/// | active        | BOOLEAN                   | Whether the customer is active            |
/// | user_id       | INTEGER, UNIQUE, NULL     | Linked login identity (SET NULL on delete)|
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,

    #[sea_orm(column_type = "String(StringLen::N(254))", unique)]
    pub email: String,

    #[sea_orm(column_type = "String(StringLen::N(20))", nullable)]
    pub phone: Option<String>,

    /// Defaults to the creation time when the record is inserted through
    /// [`GymStore`](crate::GymStore).
    pub registered_at: DateTimeWithTimeZone,

    pub active: bool,

    /// Optional one-to-one link to an [`auth_user`](super::auth_user).
    ///
    /// This is a weak reference: removing the identity clears the link and the
    /// customer record stays.
    #[sea_orm(unique, nullable)]
    pub user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auth_user::Entity",
        from = "Column::UserId",
        to = "super::auth_user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    AuthUser,
    #[sea_orm(has_many = "super::membership::Entity")]
    Membership,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::auth_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AuthUser.def()
    }
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
