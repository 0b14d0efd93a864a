//! Admin change lists: which columns each record type shows, which fields the
//! free-text search looks at, which categorical filters are offered, and the
//! queries that produce a page of results.

use std::fmt;

use sea_orm::prelude::{Date, DateTimeWithTimeZone, Decimal};
use sea_orm::sea_query::{Condition, Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, SelectorTrait,
};
use serde::{Deserialize, Serialize};

use crate::entity::{customer, membership, payment, plan};
use crate::entity::{PaymentMethod, PaymentStatus};
use crate::error::Result;
use crate::store::GymStore;

/// Page size used when none is requested.
pub const DEFAULT_PER_PAGE: u64 = 100;
const MAX_PER_PAGE: u64 = 1000;

/// Listing configuration of one record type.
///
/// Field names follow the record's column names; `customer__email` style
/// names reach through a relationship. An `ordering` entry prefixed with `-`
/// sorts descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelAdmin {
    pub model: &'static str,
    pub list_display: &'static [&'static str],
    pub search_fields: &'static [&'static str],
    pub list_filter: &'static [&'static str],
    pub ordering: &'static [&'static str],
}

pub const PLAN_ADMIN: ModelAdmin = ModelAdmin {
    model: "plan",
    list_display: &["name", "price", "duration_days"],
    search_fields: &["name"],
    list_filter: &[],
    ordering: &["name"],
};

pub const CUSTOMER_ADMIN: ModelAdmin = ModelAdmin {
    model: "customer",
    list_display: &["name", "email", "phone", "registered_at", "active"],
    search_fields: &["name", "email"],
    list_filter: &["active"],
    ordering: &["-registered_at"],
};

pub const MEMBERSHIP_ADMIN: ModelAdmin = ModelAdmin {
    model: "membership",
    list_display: &["customer", "plan", "start_date", "end_date", "active"],
    search_fields: &["customer__name", "customer__email"],
    list_filter: &["plan", "active"],
    ordering: &["-start_date"],
};

pub const PAYMENT_ADMIN: ModelAdmin = ModelAdmin {
    model: "payment",
    list_display: &[
        "transaction_id",
        "customer",
        "amount",
        "method",
        "status",
        "paid_at",
    ],
    search_fields: &["transaction_id", "customer__email"],
    list_filter: &["method", "status"],
    ordering: &["-paid_at"],
};

/// All registered record types, in menu order.
pub fn registry() -> [&'static ModelAdmin; 4] {
    [&PLAN_ADMIN, &CUSTOMER_ADMIN, &MEMBERSHIP_ADMIN, &PAYMENT_ADMIN]
}

pub fn model_admin(model: &str) -> Option<&'static ModelAdmin> {
    registry().into_iter().find(|admin| admin.model == model)
}

/// Search text and page selection for a change list. Pages are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListParams {
    #[serde(default, alias = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_per_page() -> u64 {
    DEFAULT_PER_PAGE
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            search: None,
            page: 0,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ListParams {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }
}

/// One page of a change list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeList<T> {
    pub items: Vec<T>,
    /// Number of records matching the search and filters, across all pages.
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerFilter {
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct MembershipFilter {
    #[serde(alias = "plan")]
    pub plan_id: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PaymentFilter {
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
}

/// A membership as shown in its change list, with the customer and plan
/// resolved to their names.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct MembershipRow {
    pub id: i32,
    pub customer_id: i32,
    pub customer: String,
    pub plan_id: i32,
    pub plan: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub active: bool,
}

impl fmt::Display for MembershipRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({} to ", self.customer, self.plan, self.start_date)?;
        match self.end_date {
            Some(end) => write!(f, "{end})"),
            None => f.write_str("open)"),
        }
    }
}

/// A payment as shown in its change list, with the customer resolved to its
/// name.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct PaymentRow {
    pub id: i32,
    pub transaction_id: Option<String>,
    pub customer_id: i32,
    pub customer: String,
    pub membership_id: Option<i32>,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub paid_at: DateTimeWithTimeZone,
}

impl fmt::Display for PaymentRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Payment {} - {} ({})",
            self.amount, self.customer, self.status
        )
    }
}

impl GymStore {
    /// Plans ordered by name, searched by name.
    pub async fn list_plans(&self, params: &ListParams) -> Result<ChangeList<plan::Model>> {
        let query = plan::Entity::find()
            .filter(search_condition(
                params.search.as_deref(),
                &[Expr::col((plan::Entity, plan::Column::Name)).into()],
            ))
            .order_by_asc(plan::Column::Name);

        change_list(&self.conn, query, params).await
    }

    /// Customers, newest registration first, searched by name and email.
    pub async fn list_customers(
        &self,
        params: &ListParams,
        filter: CustomerFilter,
    ) -> Result<ChangeList<customer::Model>> {
        let query = customer::Entity::find()
            .filter(search_condition(
                params.search.as_deref(),
                &[
                    Expr::col((customer::Entity, customer::Column::Name)).into(),
                    Expr::col((customer::Entity, customer::Column::Email)).into(),
                ],
            ))
            .apply_if(filter.active, |q, active| {
                q.filter(customer::Column::Active.eq(active))
            })
            .order_by_desc(customer::Column::RegisteredAt)
            .order_by_desc(customer::Column::Id);

        change_list(&self.conn, query, params).await
    }

    /// Memberships, newest start first, searched by the customer's name and
    /// email.
    pub async fn list_memberships(
        &self,
        params: &ListParams,
        filter: MembershipFilter,
    ) -> Result<ChangeList<MembershipRow>> {
        let query = membership::Entity::find()
            .select_only()
            .column(membership::Column::Id)
            .column(membership::Column::CustomerId)
            .column_as(customer::Column::Name, "customer")
            .column(membership::Column::PlanId)
            .column_as(plan::Column::Name, "plan")
            .column(membership::Column::StartDate)
            .column(membership::Column::EndDate)
            .column(membership::Column::Active)
            .join(JoinType::InnerJoin, membership::Relation::Customer.def())
            .join(JoinType::InnerJoin, membership::Relation::Plan.def())
            .filter(search_condition(
                params.search.as_deref(),
                &[
                    Expr::col((customer::Entity, customer::Column::Name)).into(),
                    Expr::col((customer::Entity, customer::Column::Email)).into(),
                ],
            ))
            .apply_if(filter.plan_id, |q, plan_id| {
                q.filter(membership::Column::PlanId.eq(plan_id))
            })
            .apply_if(filter.active, |q, active| {
                q.filter(membership::Column::Active.eq(active))
            })
            .order_by_desc(membership::Column::StartDate)
            .order_by_desc(membership::Column::Id)
            .into_model::<MembershipRow>();

        change_list(&self.conn, query, params).await
    }

    /// Payments, newest first, searched by transaction id and the customer's
    /// email.
    pub async fn list_payments(
        &self,
        params: &ListParams,
        filter: PaymentFilter,
    ) -> Result<ChangeList<PaymentRow>> {
        let query = payment::Entity::find()
            .select_only()
            .column(payment::Column::Id)
            .column(payment::Column::TransactionId)
            .column(payment::Column::CustomerId)
            .column_as(customer::Column::Name, "customer")
            .column(payment::Column::MembershipId)
            .column(payment::Column::Amount)
            .column(payment::Column::Method)
            .column(payment::Column::Status)
            .column(payment::Column::PaidAt)
            .join(JoinType::InnerJoin, payment::Relation::Customer.def())
            .filter(search_condition(
                params.search.as_deref(),
                &[
                    Expr::col((payment::Entity, payment::Column::TransactionId)).into(),
                    Expr::col((customer::Entity, customer::Column::Email)).into(),
                ],
            ))
            .apply_if(filter.method, |q, method| {
                q.filter(payment::Column::Method.eq(method))
            })
            .apply_if(filter.status, |q, status| {
                q.filter(payment::Column::Status.eq(status))
            })
            .order_by_desc(payment::Column::PaidAt)
            .order_by_desc(payment::Column::Id)
            .into_model::<PaymentRow>();

        change_list(&self.conn, query, params).await
    }
}

async fn change_list<'db, Q>(
    db: &'db DatabaseConnection,
    query: Q,
    params: &ListParams,
) -> Result<ChangeList<<Q::Selector as SelectorTrait>::Item>>
where
    Q: PaginatorTrait<'db, DatabaseConnection>,
{
    let per_page = params.per_page.clamp(1, MAX_PER_PAGE);
    let paginator = query.paginate(db, per_page);
    let total = paginator.num_items().await?;
    // Pages past the last record are empty, including ones whose offset
    // does not fit in a u64.
    let items = match params.page.checked_mul(per_page) {
        Some(offset) if offset < total => paginator.fetch_page(params.page).await?,
        _ => Vec::new(),
    };

    Ok(ChangeList {
        items,
        total,
        page: params.page,
        per_page,
    })
}

/// Builds the search filter: every term must match at least one field,
/// case-insensitively, as a substring.
fn search_condition(search: Option<&str>, fields: &[SimpleExpr]) -> Condition {
    let mut all = Condition::all();
    for term in search.map(search_terms).unwrap_or_default() {
        let pattern = like_pattern(&term);
        let any = fields.iter().fold(Condition::any(), |any, field| {
            any.add(
                Expr::expr(Func::lower(field.clone()))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        });
        all = all.add(any);
    }
    all
}

/// Splits search text into terms on whitespace, keeping double-quoted
/// phrases together.
fn search_terms(search: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in search.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                if !quoted && !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    terms.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        terms.push(current);
    }
    terms
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn splits_terms_and_phrases() {
        assert_eq!(search_terms("  ana   x.com "), vec!["ana", "x.com"]);
        assert_eq!(
            search_terms(r#"maria "de la cruz" gym"#),
            vec!["maria", "de la cruz", "gym"]
        );
        assert!(search_terms("   ").is_empty());
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Ana"), "%ana%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn registry_lookup() {
        assert_eq!(model_admin("payment"), Some(&PAYMENT_ADMIN));
        assert_eq!(model_admin("session"), None);
        assert_eq!(
            MEMBERSHIP_ADMIN.search_fields,
            &["customer__name", "customer__email"]
        );
        assert!(PLAN_ADMIN.list_filter.is_empty());
    }

    #[test]
    fn membership_row_display() {
        let row = MembershipRow {
            id: 1,
            customer_id: 1,
            customer: "Ana".into(),
            plan_id: 1,
            plan: "Monthly".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            active: true,
        };
        assert_eq!(row.to_string(), "Ana - Monthly (2024-01-01 to 2024-01-31)");

        let open = MembershipRow {
            end_date: None,
            ..row
        };
        assert_eq!(open.to_string(), "Ana - Monthly (2024-01-01 to open)");
    }
}
