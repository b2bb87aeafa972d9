//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_order_set;
mod m20240101_000002_create_order_set_member;
mod m20240101_000003_create_order_group;
mod m20240101_000004_create_drug_order;
mod m20240101_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_order_set::Migration),
            Box::new(m20240101_000002_create_order_set_member::Migration),
            Box::new(m20240101_000003_create_order_group::Migration),
            Box::new(m20240101_000004_create_drug_order::Migration),
            // Indexes should always be applied last
            Box::new(m20240101_000009_add_indexes::Migration),
        ]
    }
}
