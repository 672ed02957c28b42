use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use rainforest_auth::{NewUser, User};
use rainforest_core::UserId;

use super::UserStore;
use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;

        if users.values().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict(format!("username '{}' is already taken", new.username)));
        }
        if users.values().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
            return Err(StoreError::Conflict(format!("email '{}' is already registered", new.email)));
        }

        let user = User::create(new, Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.values().find(|u| u.answers_to(login)).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.get(&id).cloned())
    }

    async fn admin_exists(&self) -> StoreResult<bool> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.values().any(|u| u.role.is_admin()))
    }
}
