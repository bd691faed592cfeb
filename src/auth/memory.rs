//! In-process `UserStore` doubles for tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::{
    repo::{StoreError, UserStore},
    repo_types::{NewUser, User},
};

/// Holds users in a vector and enforces the same unique keys as the
/// `users` table.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_users(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap()
    }

    pub fn count_username(&self, username: &str) -> usize {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.username == username)
            .count()
    }

    pub fn insert_with_role(&self, username: &str, password: &str, email: &str, role: &str) {
        let hash = crate::auth::password::hash_password(password).unwrap();
        let mut users = self.users.lock().unwrap();
        let id = users.len() as i32 + 1;
        users.push(User {
            id,
            username: username.into(),
            password_hash: hash,
            email: email.into(),
            role: role.into(),
            created_at: OffsetDateTime::now_utc(),
        });
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(StoreError::DuplicateKey { field: "username" });
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateKey { field: "email" });
        }
        let user = User {
            id: users.len() as i32 + 1,
            username: new_user.username,
            password_hash: new_user.password_hash,
            email: new_user.email,
            role: new_user.role.as_str().to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// Fails every call as if the database could not be reached.
pub struct UnreachableUserStore;

#[async_trait]
impl UserStore for UnreachableUserStore {
    async fn find_by_username(&self, _username: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _new_user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Unavailable(sqlx::Error::PoolTimedOut))
    }
}
