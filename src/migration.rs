//! Schema migrations for the gym tables.
//!
//! Run [`Migrator::up`] once against a fresh database before using
//! [`GymStore`](crate::GymStore).

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_gym_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Override the name of migration table to avoid conflicts
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("gym_membership_seaorm_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_gym_tables::Migration)]
    }
}
