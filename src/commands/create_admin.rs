//! Create-admin command - Bootstraps an administrator account.
//!
//! Admins cannot self-register over HTTP, so the first one is created here.

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::Database;
use crate::services::{ServiceContainer, Services};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let services = Services::from_connection(db.get_connection(), config);
    let admin = services
        .auth()
        .create_admin(args.email, args.name, args.password)
        .await?;

    tracing::info!(user_id = %admin.id, "Admin account created");
    println!("Created admin {} ({})", admin.email, admin.id);

    Ok(())
}
