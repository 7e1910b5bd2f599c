//! Migrate command - Database migration management.

use sea_orm::DbErr;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Manual control: nothing runs until the action says so
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await.map_err(migration_error)?;
            tracing::info!("Migrations applied");
        }
        MigrateAction::Down => {
            db.rollback_migration().await.map_err(migration_error)?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await.map_err(migration_error)?;
            let width = status.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            for (name, applied) in status {
                let state = if applied { "applied" } else { "pending" };
                println!("{:width$}  {}", name, state, width = width);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping all tables and re-running every migration");
            db.fresh_migrations().await.map_err(migration_error)?;
            tracing::info!("Schema rebuilt");
        }
    }

    Ok(())
}

fn migration_error(err: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", err))
}
