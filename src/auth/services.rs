use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::auth::{
    password::{hash_password, verify_password, PasswordError},
    repo::{StoreError, UserStore},
    repo_types::{NewUser, Role, User},
};

/// Column widths of `users.username` and `users.email`.
pub const MAX_USERNAME_CHARS: usize = 50;
pub const MAX_EMAIL_CHARS: usize = 100;

lazy_static! {
    // Verified against when the username is unknown so both rejections cost one Argon2 run.
    static ref UNKNOWN_USER_HASH: String =
        hash_password("unknown-user-placeholder").unwrap_or_default();
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Outcome of a credential check.
#[derive(Debug)]
pub enum Authentication {
    Authenticated(User),
    /// Unknown username or wrong password; callers cannot tell which.
    Rejected,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("a user with this {field} already exists")]
    DuplicateKey { field: &'static str },
    #[error(transparent)]
    Hashing(#[from] PasswordError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field } => AccountError::DuplicateKey { field },
            StoreError::ValueTooLong => AccountError::Validation(err.to_string()),
            other => AccountError::Store(other),
        }
    }
}

pub async fn authenticate(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<Authentication, StoreError> {
    let Some(user) = store.find_by_username(username).await? else {
        debug!(%username, "no user with this username");
        let _ = verify_password(password, &UNKNOWN_USER_HASH);
        return Ok(Authentication::Rejected);
    };

    if !verify_password(password, &user.password_hash) {
        debug!(%username, user_id = user.id, "password mismatch");
        return Ok(Authentication::Rejected);
    }

    Ok(Authentication::Authenticated(user))
}

pub async fn create_account(
    store: &dyn UserStore,
    username: &str,
    password: &str,
    email: &str,
) -> Result<User, AccountError> {
    let username = username.trim();
    let email = email.trim();

    if username.is_empty() {
        return Err(AccountError::Validation("username is required".into()));
    }
    if password.is_empty() {
        return Err(AccountError::Validation("password is required".into()));
    }
    if email.is_empty() {
        return Err(AccountError::Validation("email is required".into()));
    }
    if username.chars().count() > MAX_USERNAME_CHARS {
        return Err(AccountError::Validation(format!(
            "username must be at most {MAX_USERNAME_CHARS} characters"
        )));
    }
    if email.chars().count() > MAX_EMAIL_CHARS {
        return Err(AccountError::Validation(format!(
            "email must be at most {MAX_EMAIL_CHARS} characters"
        )));
    }
    if !is_valid_email(email) {
        warn!(email_len = email.len(), "invalid email");
        return Err(AccountError::Validation("Invalid email".into()));
    }

    let password_hash = hash_password(password)?;
    let user = store
        .create(NewUser {
            username: username.to_string(),
            password_hash,
            email: email.to_string(),
            role: Role::User,
        })
        .await?;

    info!(user_id = user.id, username = %user.username, "user created");
    Ok(user)
}
