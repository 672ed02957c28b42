use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use rainforest_auth::{NewUser, User};
use rainforest_core::UserId;

use super::UserStore;
use crate::error::{StoreError, StoreResult, map_sqlx_error};

const COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self, new), fields(username = %new.username))]
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let now = Utc::now();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(*UserId::new().as_uuid())
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match map_sqlx_error("insert_user", e) {
            StoreError::Conflict(_) => StoreError::Conflict("username or email is already taken".to_string()),
            other => other,
        })?;

        user_from_row(&row)
    }

    #[instrument(skip(self, login))]
    async fn find_by_login(&self, login: &str) -> StoreResult<Option<User>> {
        let login = login.trim();
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM users WHERE username = $1 OR email = lower($1) LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_login", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_user_by_id", e))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn admin_exists(&self) -> StoreResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'ADMIN')")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("admin_exists", e))
    }
}

fn user_from_row(row: &PgRow) -> StoreResult<User> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_user", e);
    let role: String = row.try_get("role").map_err(decode)?;

    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(decode)?),
        username: row.try_get("username").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        role: role.parse().map_err(|e: rainforest_core::DomainError| StoreError::Corrupt(e.to_string()))?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
