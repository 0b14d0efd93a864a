use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::Username)
                            .string_len(150)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(AuthUsers::DateJoined)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Customers::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Customers::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::Phone).string_len(20).null())
                    .col(
                        ColumnDef::new(Customers::RegisteredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Customers::UserId).integer().null().unique_key())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customer_user")
                            .from(Customers::Table, Customers::UserId)
                            .to(AuthUsers::Table, AuthUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        create_table_with_checks(
            manager,
            &Table::create()
                .table(Plans::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Plans::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(
                    ColumnDef::new(Plans::Name)
                        .string_len(100)
                        .not_null()
                        .unique_key(),
                )
                .col(ColumnDef::new(Plans::Description).text().null())
                .col(ColumnDef::new(Plans::Price).decimal_len(10, 2).not_null())
                .col(ColumnDef::new(Plans::DurationDays).integer().not_null())
                .to_owned(),
            &[("plan_duration_non_negative", "duration_days >= 0")],
        )
        .await?;

        create_table_with_checks(
            manager,
            &Table::create()
                .table(Memberships::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Memberships::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Memberships::CustomerId).integer().not_null())
                .col(ColumnDef::new(Memberships::PlanId).integer().not_null())
                .col(ColumnDef::new(Memberships::StartDate).date().not_null())
                .col(ColumnDef::new(Memberships::EndDate).date().null())
                .col(
                    ColumnDef::new(Memberships::Active)
                        .boolean()
                        .not_null()
                        .default(true),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_membership_customer")
                        .from(Memberships::Table, Memberships::CustomerId)
                        .to(Customers::Table, Customers::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_membership_plan")
                        .from(Memberships::Table, Memberships::PlanId)
                        .to(Plans::Table, Plans::Id)
                        .on_delete(ForeignKeyAction::Restrict)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            // NULL end dates pass: they are resolved before the write.
            &[("membership_end_after_start", "end_date >= start_date")],
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_membership_customer_plan_start")
                    .table(Memberships::Table)
                    .col(Memberships::CustomerId)
                    .col(Memberships::PlanId)
                    .col(Memberships::StartDate)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_membership_customer_plan")
                    .table(Memberships::Table)
                    .col(Memberships::CustomerId)
                    .col(Memberships::PlanId)
                    .to_owned(),
            )
            .await?;

        create_table_with_checks(
            manager,
            &Table::create()
                .table(Payments::Table)
                .if_not_exists()
                .col(
                    ColumnDef::new(Payments::Id)
                        .integer()
                        .not_null()
                        .auto_increment()
                        .primary_key(),
                )
                .col(ColumnDef::new(Payments::CustomerId).integer().not_null())
                .col(ColumnDef::new(Payments::MembershipId).integer().null())
                .col(ColumnDef::new(Payments::Amount).decimal_len(10, 2).not_null())
                .col(
                    ColumnDef::new(Payments::PaidAt)
                        .timestamp_with_time_zone()
                        .not_null(),
                )
                .col(ColumnDef::new(Payments::Method).string_len(50).not_null())
                .col(
                    ColumnDef::new(Payments::Status)
                        .string_len(20)
                        .not_null()
                        .default("pending"),
                )
                .col(
                    ColumnDef::new(Payments::TransactionId)
                        .string_len(100)
                        .null()
                        .unique_key(),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_payment_customer")
                        .from(Payments::Table, Payments::CustomerId)
                        .to(Customers::Table, Customers::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_payment_membership")
                        .from(Payments::Table, Payments::MembershipId)
                        .to(Memberships::Table, Memberships::Id)
                        .on_delete(ForeignKeyAction::SetNull)
                        .on_update(ForeignKeyAction::Cascade),
                )
                .to_owned(),
            &[("payment_amount_non_negative", "amount >= 0")],
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_customer")
                    .table(Payments::Table)
                    .col(Payments::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payment_transaction")
                    .table(Payments::Table)
                    .col(Payments::TransactionId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memberships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuthUsers::Table).to_owned())
            .await
    }
}

/// Creates `table` with named CHECK constraints appended to its definition.
///
/// The table builder only emits anonymous `CHECK (...)` clauses, so the
/// rendered statement is extended before it is executed. Column names in
/// `checks` are unquoted so the same text works on every backend.
async fn create_table_with_checks(
    manager: &SchemaManager<'_>,
    table: &TableCreateStatement,
    checks: &[(&str, &str)],
) -> Result<(), DbErr> {
    let stmt = manager.get_database_backend().build(table);
    let body = stmt
        .sql
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| DbErr::Migration(format!("unexpected table definition: {}", stmt.sql)))?;
    let constraints: String = checks
        .iter()
        .map(|(name, expr)| format!(", CONSTRAINT {name} CHECK ({expr})"))
        .collect();

    manager
        .get_connection()
        .execute_unprepared(&format!("{body}{constraints} )"))
        .await?;
    Ok(())
}

#[derive(DeriveIden)]
enum AuthUsers {
    Table,
    Id,
    Username,
    DateJoined,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    RegisteredAt,
    Active,
    UserId,
}

#[derive(DeriveIden)]
enum Plans {
    Table,
    Id,
    Name,
    Description,
    Price,
    DurationDays,
}

#[derive(DeriveIden)]
enum Memberships {
    Table,
    Id,
    CustomerId,
    PlanId,
    StartDate,
    EndDate,
    Active,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    CustomerId,
    MembershipId,
    Amount,
    PaidAt,
    Method,
    Status,
    TransactionId,
}
