use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    #[error("a user with this {field} already exists")]
    DuplicateKey { field: &'static str },
    #[error("a value is longer than its column allows")]
    ValueTooLong,
    #[error("user store query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                let field = match db.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("username") => "username",
                    _ => "key",
                };
                return StoreError::DuplicateKey { field };
            }
            // string_data_right_truncation
            if db.code().as_deref() == Some("22001") {
                return StoreError::ValueTooLong;
            }
        }
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Unavailable(err),
            other => StoreError::Query(other),
        }
    }
}

/// Access to persisted users. Every call opens its own store session and
/// releases it before returning, on success and on failure.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        // Returned to the pool when `conn` drops.
        let mut conn = self.pool.acquire().await.map_err(StoreError::Unavailable)?;
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::Unavailable)?;
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, role, created_at
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(new_user.role.as_str())
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(user) => {
                tx.commit().await?;
                debug!(user_id = user.id, "user row committed");
                Ok(user)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed insert failed");
                }
                Err(e.into())
            }
        }
    }
}
