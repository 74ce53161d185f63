//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_api_key_table;
mod m20260101_000002_create_multi_question_table;
mod m20260101_000003_create_question_table;
mod m20260101_000004_create_url_table;
mod m20260101_000005_create_answer_table;
mod m20260101_000006_create_user_answer_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_api_key_table::Migration),
            Box::new(m20260101_000002_create_multi_question_table::Migration),
            Box::new(m20260101_000003_create_question_table::Migration),
            Box::new(m20260101_000004_create_url_table::Migration),
            Box::new(m20260101_000005_create_answer_table::Migration),
            Box::new(m20260101_000006_create_user_answer_table::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 6);
    }
}
