//! Database layer for quescheetah-rs.

pub mod entities;
pub mod migrations;
pub mod repositories;
pub mod test_utils;

use quescheetah_common::{AppError, AppResult, Config};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr};
use std::time::Duration;
use tracing::log::LevelFilter;

/// Initialize database connection.
pub async fn init(config: &Config) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(&config.database.url);

    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(LevelFilter::Debug);

    Database::connect(opt)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Run pending migrations.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), AppError> {
    use sea_orm_migration::MigratorTrait;
    migrations::Migrator::up(db, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Commit a transaction opened with a repository's `begin`.
///
/// Dropping the transaction instead rolls every statement back.
pub async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit()
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

/// Whether `err` was raised by a unique index.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err
            .to_string()
            .contains("duplicate key value violates unique constraint")
}

/// Map a write error, surfacing unique index violations as [`AppError::Conflict`].
///
/// Callers turn the conflict into the field error that the index guards.
pub(crate) fn map_write_err(err: DbErr) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(err.to_string())
    } else {
        AppError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_detected_from_message() {
        let err = DbErr::Custom(
            "duplicate key value violates unique constraint \"idx_question_api_key_title\""
                .to_string(),
        );
        assert!(is_unique_violation(&err));
        assert!(matches!(map_write_err(err), AppError::Conflict(_)));
    }

    #[test]
    fn test_other_errors_are_database_errors() {
        let err = DbErr::Custom("connection reset".to_string());
        assert!(!is_unique_violation(&err));
        assert!(matches!(map_write_err(err), AppError::Database(_)));
    }
}
