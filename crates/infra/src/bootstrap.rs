//! First-start provisioning of the administrator account.

use thiserror::Error;
use tracing::info;

use rainforest_auth::{NewUser, RegistrationError, Role, User};

use crate::error::StoreError;
use crate::user_store::UserStore;

/// Credentials for the account created when no admin exists yet.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid admin credentials: {0}")]
    Registration(#[from] RegistrationError),
}

/// Create the admin account unless one already exists.
///
/// Returns the created account, or `None` when an admin was already present.
pub async fn ensure_admin(
    users: &dyn UserStore,
    seed: &AdminSeed,
    bcrypt_cost: Option<u32>,
) -> Result<Option<User>, BootstrapError> {
    if users.admin_exists().await? {
        info!("admin account present; skipping bootstrap");
        return Ok(None);
    }

    let new = NewUser::register(&seed.username, &seed.email, &seed.password, Role::Admin, bcrypt_cost).await?;
    let admin = users.create(new).await?;

    info!(user_id = %admin.id, username = %admin.username, "created admin account");
    Ok(Some(admin))
}
