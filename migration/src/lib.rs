pub use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_user_profiles;
mod m20250601_000003_create_properties;
mod m20250601_000004_create_documents;
mod m20250601_000005_create_transactions;
mod m20250601_000006_create_digital_signatures;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_user_profiles::Migration),
            Box::new(m20250601_000003_create_properties::Migration),
            Box::new(m20250601_000004_create_documents::Migration),
            Box::new(m20250601_000005_create_transactions::Migration),
            Box::new(m20250601_000006_create_digital_signatures::Migration),
        ]
    }
}
