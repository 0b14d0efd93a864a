//! Membership entity model for Sea-ORM database interaction.
//!
//! A membership links a [`customer`](super::customer) to a [`plan`](super::plan)
//! over a window of dates. The end date is derived from the plan when it is
//! left empty; see [`ActiveModel::before_save`](ActiveModelBehavior::before_save).

use chrono::{Days, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Sea-ORM entity model representing a membership.
///
/// # Database Schema
///
/// | Column      | Type                  | Description                                 |
/// |-------------|-----------------------|---------------------------------------------|
/// | id          | INTEGER (Primary Key) | Membership ID                               |
/// | customer_id | INTEGER               | Owning customer (CASCADE on delete)         |
/// | plan_id     | INTEGER               | Subscribed plan (RESTRICT on delete)        |
/// | start_date  | DATE                  | First day of the membership                 |
/// | end_date    | DATE, NULL            | Last day, CHECK `end_date >= start_date`    |
/// | active      | BOOLEAN               | Whether the membership is active            |
///
/// `(customer_id, plan_id, start_date)` is unique and `(customer_id, plan_id)`
/// is indexed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_id: i32,
    pub plan_id: i32,
    pub start_date: Date,
    #[sea_orm(nullable)]
    pub end_date: Option<Date>,
    pub active: bool,
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
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Plan,
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Fills in defaults before every insert and update.
    ///
    /// On insert a missing start date becomes today's date (UTC). Then, if the
    /// end date is empty and a plan is set, the end date is resolved to the start
    /// date plus the plan's `duration_days`. An explicit end date is kept as-is;
    /// the database rejects it if it falls before the start date.
    ///
    /// The computed end date is a snapshot: later changes to the plan's duration
    /// do not touch memberships that were already saved.
    async fn before_save<C>(mut self, db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.start_date.is_not_set() {
            self.start_date = Set(Utc::now().date_naive());
        }

        if !end_date_missing(&self.end_date, insert) {
            return Ok(self);
        }

        let (Some(start), Some(plan_id)) = (current(&self.start_date), current(&self.plan_id))
        else {
            return Ok(self);
        };

        // A dangling plan id is left for the foreign key to reject.
        if let Some(plan) = super::plan::Entity::find_by_id(plan_id).one(db).await? {
            self.end_date = Set(Some(resolve_end_date(start, plan.duration_days)?));
        }

        Ok(self)
    }
}

/// Returns `start + duration_days`.
///
/// Fails with [`DbErr::Custom`] if the duration is negative or the result does
/// not fit in a calendar date.
pub fn resolve_end_date(start: Date, duration_days: i32) -> Result<Date, DbErr> {
    let days = u64::try_from(duration_days)
        .map_err(|_| DbErr::Custom(format!("invalid plan duration: {duration_days} days")))?;

    start
        .checked_add_days(Days::new(days))
        .ok_or_else(|| DbErr::Custom(format!("end date out of range: {start} + {days} days")))
}

fn end_date_missing(end_date: &ActiveValue<Option<Date>>, insert: bool) -> bool {
    match end_date {
        ActiveValue::Set(value) | ActiveValue::Unchanged(value) => value.is_none(),
        // A partial update that does not touch the end date keeps the stored one.
        ActiveValue::NotSet => insert,
    }
}

fn current<V>(value: &ActiveValue<V>) -> Option<V>
where
    V: Into<Value> + Copy,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(*v),
        ActiveValue::NotSet => None,
    }
}
