//! Provision the administrator account
//!
//! ```bash
//! ADMIN_PASSWORD=... cargo run -p ngo-api --bin ngo-create-admin
//! ```
//!
//! Creates the account from `ADMIN_EMAIL`, `ADMIN_PASSWORD` and `ADMIN_NAME`.
//! An existing administrator gets its password reset and is reactivated.

use anyhow::{bail, Context};
use ngo_common::auth::{hash_password, validate_password_strength, verify_password};
use ngo_common::{try_init_tracing, AdminSeedConfig, DatabaseConfig};
use ngo_core::entities::{normalize_email, Role, User};
use ngo_core::{SnowflakeGenerator, UserRepository};
use ngo_db::{create_pool, run_migrations, PgUserRepository, PoolConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %format!("{e:#}"), "Admin provisioning failed");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let seed = AdminSeedConfig::from_env().context("loading admin credentials")?;
    let database = DatabaseConfig::from_env().context("loading database configuration")?;
    validate_password_strength(&seed.password).context("ADMIN_PASSWORD")?;

    let pool = create_pool(&PoolConfig::from(&database))
        .await
        .context("connecting to PostgreSQL")?;
    run_migrations(&pool, &database.migrations_dir)
        .await
        .context("applying migrations")?;

    let users = PgUserRepository::new(pool);
    let email = normalize_email(&seed.email);

    match users.find_by_email(&email).await? {
        Some(existing) if existing.role != Role::Admin => {
            bail!(
                "{email} is already registered with role '{}'",
                existing.role.as_str()
            );
        }
        Some(existing) => {
            let current = users.get_password_hash(existing.id).await?;
            let matches = match current {
                Some(hash) => verify_password(&seed.password, &hash)?,
                None => false,
            };
            if matches {
                info!(email = %email, "Administrator already exists, password unchanged");
            } else {
                users
                    .update_password(existing.id, &hash_password(&seed.password)?)
                    .await?;
                warn!(email = %email, "Administrator password reset");
            }

            if !existing.is_active {
                users.set_active(existing.id, true).await?;
                info!(email = %email, "Administrator reactivated");
            }
        }
        None => {
            let id = SnowflakeGenerator::new(0).generate();
            let admin = User::new(id, seed.name.trim().to_string(), email.clone(), Role::Admin);
            users.create(&admin, &hash_password(&seed.password)?).await?;
            info!(email = %email, user_id = %admin.id, "Administrator created");
        }
    }

    Ok(())
}
