//! Infrastructure wiring shared by every handler.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use rainforest_auth::Hs256Jwt;
use rainforest_infra::{
    AdminSeed, BootstrapError, InMemorySpeciesStore, InMemoryUserStore, PostgresSpeciesStore, PostgresUserStore,
    SpeciesStore, StoreError, TracingLowStockNotifier, UserStore, db, ensure_admin,
};
use rainforest_inventory::LowStockNotifier;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("admin bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),
}

/// Handles to the stores, the token signer and the low-stock sink.
#[derive(Clone)]
pub struct AppServices {
    pub species: Arc<dyn SpeciesStore>,
    pub users: Arc<dyn UserStore>,
    pub notifier: Arc<dyn LowStockNotifier>,
    pub jwt: Arc<Hs256Jwt>,
    /// bcrypt cost for new passwords; `None` uses the library default.
    pub bcrypt_cost: Option<u32>,
}

impl AppServices {
    /// Services backed by in-memory stores and the tracing notifier.
    pub fn in_memory(jwt: Hs256Jwt) -> Self {
        Self {
            species: Arc::new(InMemorySpeciesStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            notifier: Arc::new(TracingLowStockNotifier),
            jwt: Arc::new(jwt),
            bcrypt_cost: None,
        }
    }

    /// Connect to Postgres and make sure the schema exists.
    pub async fn postgres(database_url: &str, max_connections: u32, jwt: Hs256Jwt) -> Result<Self, StoreError> {
        let pool = db::connect(database_url, max_connections).await?;
        db::ensure_schema(&pool).await?;

        Ok(Self {
            species: Arc::new(PostgresSpeciesStore::new(pool.clone())),
            users: Arc::new(PostgresUserStore::new(pool)),
            notifier: Arc::new(TracingLowStockNotifier),
            jwt: Arc::new(jwt),
            bcrypt_cost: None,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn LowStockNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    /// Create the admin account from `seed` unless an admin already exists.
    pub async fn bootstrap_admin(&self, seed: &AdminSeed) -> Result<(), BootstrapError> {
        ensure_admin(self.users.as_ref(), seed, self.bcrypt_cost).await.map(|_| ())
    }
}

/// Build services for `config`: Postgres when `DATABASE_URL` is set,
/// in-memory otherwise. Bootstraps the admin account either way.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StartupError> {
    let jwt = Hs256Jwt::new(config.jwt_secret.as_bytes(), config.token_ttl);

    let services = match &config.database_url {
        Some(url) => AppServices::postgres(url, config.database_max_connections, jwt).await?,
        None => {
            info!("DATABASE_URL not set; using in-memory stores");
            AppServices::in_memory(jwt)
        }
    };

    services.bootstrap_admin(&config.admin).await?;
    Ok(services)
}
