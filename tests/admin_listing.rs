//! Change list queries: search, filters, ordering and paging.

mod common;

use chrono::{TimeZone, Utc};
use gym_membership_seaorm::admin::{
    CustomerFilter, ListParams, MembershipFilter, PaymentFilter, DEFAULT_PER_PAGE,
};
use gym_membership_seaorm::{
    CustomerChanges, GymStore, NewCustomer, NewMembership, NewPayment, NewPlan, PaymentMethod,
    PaymentStatus,
};
use sea_orm::prelude::DateTimeWithTimeZone;

use common::{create_test_store, customer, date, money, monthly_plan};

/// Two plans, three customers, three memberships and three payments.
async fn seeded_store() -> GymStore {
    let store = create_test_store().await;
    let monthly = monthly_plan(&store).await;
    let yearly = store
        .create_plan(NewPlan::new("Annual", money(30000), 365))
        .await
        .unwrap();

    let ana = customer(&store, "Ana Lopez", "ana@x.com").await;
    let bea = customer(&store, "Bea Ruiz", "bea@y.org").await;
    let carl = store
        .create_customer(NewCustomer::new("Carl Ruiz", "carl@x.com"))
        .await
        .unwrap();
    store
        .update_customer(
            carl.id,
            CustomerChanges {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let ana_monthly = store
        .create_membership(NewMembership::new(ana.id, monthly.id).starting(date(2024, 1, 1)))
        .await
        .unwrap();
    store
        .create_membership(NewMembership::new(bea.id, yearly.id).starting(date(2024, 3, 1)))
        .await
        .unwrap();
    store
        .create_membership(NewMembership {
            active: Some(false),
            ..NewMembership::new(carl.id, monthly.id).starting(date(2023, 6, 1))
        })
        .await
        .unwrap();

    let at = |d: u32| -> DateTimeWithTimeZone {
        Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap().into()
    };
    store
        .create_payment(NewPayment {
            paid_at: Some(at(1)),
            ..NewPayment::new(ana.id, money(3000), PaymentMethod::Card)
                .for_membership(ana_monthly.id)
                .transaction_id("GW-1001")
                .status(PaymentStatus::Paid)
        })
        .await
        .unwrap();
    store
        .create_payment(NewPayment {
            paid_at: Some(at(2)),
            ..NewPayment::new(bea.id, money(30000), PaymentMethod::Cash)
        })
        .await
        .unwrap();
    store
        .create_payment(NewPayment {
            paid_at: Some(at(3)),
            ..NewPayment::new(ana.id, money(1500), PaymentMethod::Card).transaction_id("GW-1002")
        })
        .await
        .unwrap();

    store
}

#[tokio::test]
async fn plans_are_listed_by_name_and_searchable() {
    let store = seeded_store().await;

    let all = store.list_plans(&ListParams::default()).await.unwrap();
    let names: Vec<_> = all.items.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Annual", "Monthly"]);
    assert_eq!(all.total, 2);
    assert_eq!(all.per_page, DEFAULT_PER_PAGE);

    let found = store.list_plans(&ListParams::search("month")).await.unwrap();
    assert_eq!(found.total, 1);
    assert_eq!(found.items[0].name, "Monthly");
}

#[tokio::test]
async fn customers_search_name_and_email_case_insensitively() {
    let store = seeded_store().await;

    let ruiz = store
        .list_customers(&ListParams::search("RUIZ"), CustomerFilter::default())
        .await
        .unwrap();
    assert_eq!(ruiz.total, 2);

    let by_domain = store
        .list_customers(&ListParams::search("x.com"), CustomerFilter::default())
        .await
        .unwrap();
    let emails: Vec<_> = by_domain.items.iter().map(|c| c.email.as_str()).collect();
    assert_eq!(emails.len(), 2);
    assert!(emails.contains(&"ana@x.com"));
    assert!(emails.contains(&"carl@x.com"));

    // Every term has to match some field.
    let both = store
        .list_customers(&ListParams::search("ruiz x.com"), CustomerFilter::default())
        .await
        .unwrap();
    assert_eq!(both.total, 1);
    assert_eq!(both.items[0].name, "Carl Ruiz");

    let none = store
        .list_customers(&ListParams::search("nobody"), CustomerFilter::default())
        .await
        .unwrap();
    assert_eq!(none.total, 0);
    assert!(none.items.is_empty());
}

#[tokio::test]
async fn customers_filter_on_active_flag() {
    let store = seeded_store().await;

    let inactive = store
        .list_customers(
            &ListParams::default(),
            CustomerFilter {
                active: Some(false),
            },
        )
        .await
        .unwrap();
    assert_eq!(inactive.total, 1);
    assert_eq!(inactive.items[0].name, "Carl Ruiz");

    let active = store
        .list_customers(&ListParams::default(), CustomerFilter { active: Some(true) })
        .await
        .unwrap();
    assert_eq!(active.total, 2);
}

#[tokio::test]
async fn memberships_search_through_customer() {
    let store = seeded_store().await;

    let rows = store
        .list_memberships(&ListParams::search("bea@y"), MembershipFilter::default())
        .await
        .unwrap();
    assert_eq!(rows.total, 1);
    let row = &rows.items[0];
    assert_eq!(row.customer, "Bea Ruiz");
    assert_eq!(row.plan, "Annual");
    assert_eq!(row.end_date, Some(date(2025, 3, 1)));
    assert_eq!(row.to_string(), "Bea Ruiz - Annual (2024-03-01 to 2025-03-01)");

    let by_name = store
        .list_memberships(&ListParams::search("lopez"), MembershipFilter::default())
        .await
        .unwrap();
    assert_eq!(by_name.total, 1);
    assert_eq!(by_name.items[0].customer, "Ana Lopez");
}

#[tokio::test]
async fn memberships_are_newest_first_and_filterable() {
    let store = seeded_store().await;

    let all = store
        .list_memberships(&ListParams::default(), MembershipFilter::default())
        .await
        .unwrap();
    let starts: Vec<_> = all.items.iter().map(|m| m.start_date).collect();
    assert_eq!(
        starts,
        [date(2024, 3, 1), date(2024, 1, 1), date(2023, 6, 1)]
    );

    let monthly = store.list_plans(&ListParams::search("Monthly")).await.unwrap().items[0].id;
    let on_monthly = store
        .list_memberships(
            &ListParams::default(),
            MembershipFilter {
                plan_id: Some(monthly),
                active: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(on_monthly.total, 2);

    let active_monthly = store
        .list_memberships(
            &ListParams::default(),
            MembershipFilter {
                plan_id: Some(monthly),
                active: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(active_monthly.total, 1);
    assert_eq!(active_monthly.items[0].customer, "Ana Lopez");
}

#[tokio::test]
async fn payments_search_and_filter() {
    let store = seeded_store().await;

    let all = store
        .list_payments(&ListParams::default(), PaymentFilter::default())
        .await
        .unwrap();
    let ids: Vec<_> = all
        .items
        .iter()
        .map(|p| p.transaction_id.as_deref())
        .collect();
    assert_eq!(ids, [Some("GW-1002"), None, Some("GW-1001")]);

    let by_tx = store
        .list_payments(&ListParams::search("gw-1001"), PaymentFilter::default())
        .await
        .unwrap();
    assert_eq!(by_tx.total, 1);
    assert_eq!(by_tx.items[0].status, PaymentStatus::Paid);
    assert_eq!(
        by_tx.items[0].to_string(),
        format!("Payment {} - Ana Lopez (paid)", by_tx.items[0].amount)
    );

    let by_email = store
        .list_payments(&ListParams::search("ana@x.com"), PaymentFilter::default())
        .await
        .unwrap();
    assert_eq!(by_email.total, 2);

    let cash = store
        .list_payments(
            &ListParams::default(),
            PaymentFilter {
                method: Some(PaymentMethod::Cash),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(cash.total, 1);
    assert_eq!(cash.items[0].customer, "Bea Ruiz");
    assert_eq!(cash.items[0].amount, money(30000));

    let pending_card = store
        .list_payments(
            &ListParams::default(),
            PaymentFilter {
                method: Some(PaymentMethod::Card),
                status: Some(PaymentStatus::Pending),
            },
        )
        .await
        .unwrap();
    assert_eq!(pending_card.total, 1);
    assert_eq!(pending_card.items[0].transaction_id.as_deref(), Some("GW-1002"));
}

#[tokio::test]
async fn pages_split_the_results() {
    let store = seeded_store().await;

    let first = store
        .list_customers(
            &ListParams {
                per_page: 2,
                ..Default::default()
            },
            CustomerFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.items.len(), 2);

    let second = store
        .list_customers(
            &ListParams {
                page: 1,
                per_page: 2,
                ..Default::default()
            },
            CustomerFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(first.items.iter().all(|c| c.id != second.items[0].id));
}

#[tokio::test]
async fn pages_past_the_end_are_empty() {
    let store = seeded_store().await;

    let past = store
        .list_customers(
            &ListParams {
                page: 5,
                per_page: 2,
                ..Default::default()
            },
            CustomerFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(past.total, 3);
    assert!(past.items.is_empty());

    let huge = store
        .list_memberships(
            &ListParams {
                page: u64::MAX / 10,
                per_page: 100,
                ..Default::default()
            },
            MembershipFilter::default(),
        )
        .await
        .unwrap();
    assert_eq!(huge.total, 3);
    assert_eq!(huge.page, u64::MAX / 10);
    assert!(huge.items.is_empty());
}

#[tokio::test]
async fn like_wildcards_in_search_are_literal() {
    let store = create_test_store().await;
    customer(&store, "Ana", "ana@x.com").await;

    let found = store
        .list_customers(&ListParams::search("%"), CustomerFilter::default())
        .await
        .unwrap();
    assert_eq!(found.total, 0);
}
