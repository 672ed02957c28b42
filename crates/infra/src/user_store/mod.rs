//! User account storage.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use rainforest_auth::{NewUser, User};
use rainforest_core::UserId;

use crate::error::StoreResult;

pub use in_memory::InMemoryUserStore;
pub use postgres::PostgresUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new account. Fails with `Conflict` when the username or email
    /// is already taken.
    async fn create(&self, new: NewUser) -> StoreResult<User>;

    /// Look an account up by username, or by email (case-insensitive).
    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>>;

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn admin_exists(&self) -> StoreResult<bool>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        (**self).create(new).await
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        (**self).find_by_login(login).await
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).find_by_id(id).await
    }

    async fn admin_exists(&self) -> StoreResult<bool> {
        (**self).admin_exists().await
    }
}
