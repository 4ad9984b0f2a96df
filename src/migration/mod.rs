//! SeaORM database migrations.
//!
//! Written with the schema builder so the same migrations run on PostgreSQL
//! and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_locations;
mod m20250301_000002_create_employees;
mod m20250301_000003_create_jsa;
mod m20250301_000004_create_jsa_steps;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_locations::Migration),
            Box::new(m20250301_000002_create_employees::Migration),
            Box::new(m20250301_000003_create_jsa::Migration),
            Box::new(m20250301_000004_create_jsa_steps::Migration),
        ]
    }
}
