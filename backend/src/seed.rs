//! Startup seeding for empty stores.
//!
//! A fresh deployment has no way to log in, so an empty user store receives
//! a bootstrap admin account (with a default password that must be rotated)
//! and a starter set of categories. Stores that already hold users are left
//! untouched, which makes the seeding safe to leave enabled.

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{CategoryRepository, StorageError, UserRepository};
use crate::domain::{Category, Role, User};

/// Email of the seeded bootstrap admin.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@example.com";
/// Default password of the seeded bootstrap admin. Rotate it immediately.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin";

const STARTER_CATEGORIES: [&str; 4] = ["Local News", "Politics", "Sport", "Culture"];

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Store access failed.
    #[error("seeding store access failed: {0}")]
    Storage(#[from] StorageError),
    /// A built-in fixture failed validation.
    #[error("invalid seed fixture: {0}")]
    InvalidFixture(String),
}

/// Seed the bootstrap admin and starter categories into an empty store.
///
/// A store with at least one user is considered initialised and is not
/// modified.
pub async fn seed_if_empty(
    users: &dyn UserRepository,
    categories: &dyn CategoryRepository,
) -> Result<(), SeedError> {
    if users.count().await? > 0 {
        info!(reason = "store already has users", "startup seeding skipped");
        return Ok(());
    }

    let admin = User::try_new(
        "Administrator",
        BOOTSTRAP_ADMIN_EMAIL,
        BOOTSTRAP_ADMIN_PASSWORD,
        Role::Admin,
        None,
    )
    .map_err(|error| SeedError::InvalidFixture(error.to_string()))?;
    users.save(&admin).await?;
    warn!(
        email = BOOTSTRAP_ADMIN_EMAIL,
        "seeded bootstrap admin with the default password; rotate it"
    );

    let mut seeded = 0_usize;
    for name in STARTER_CATEGORIES {
        if categories.find_by_name(name).await?.is_none() {
            let category = Category::try_new(name)
                .map_err(|error| SeedError::InvalidFixture(error.to_string()))?;
            categories.save(&category).await?;
            seeded += 1;
        }
    }
    info!(categories = seeded, "starter categories seeded");
    Ok(())
}
