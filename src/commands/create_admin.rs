//! Create-admin command - Bootstraps a Super-Admin account.
//!
//! Account creation over HTTP is Super-Admin only, so the first one is
//! created from the command line.

use std::sync::Arc;

use validator::Validate;

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::domain::{NewAccount, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{AccountManager, AccountService};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let account = NewAccount {
        user_id: args.user_id,
        password: args.password,
        role: Some(UserRole::SuperAdmin.as_str().to_string()),
        email: args.email,
    };
    account
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let db = Database::connect(&config).await?;
    db.run_migrations().await?;

    let accounts = AccountManager::new(Arc::new(Persistence::new(db.get_connection())));
    let created = accounts.create(account).await;

    db.close().await?;

    let created = created?;
    println!("Created Super-Admin '{}'", created.user_id);
    Ok(())
}
