use axum::{
    extract::{rejection::FormRejection, State},
    response::Redirect,
    routing::post,
    Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{CreateUserForm, LoginForm, MessageResponse},
        services::{authenticate, create_account, Authentication},
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/create_user", post(create_user))
        .route("/logout", post(logout))
}

/// Verifies the submitted credentials and sends the browser to the landing
/// page for the user's role. Nothing is issued; every visit re-authenticates.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let username = form.username.trim();

    if username.is_empty() || form.password.is_empty() {
        warn!("login without username or password");
        return Err(AppError::Validation(
            "username and password are required".into(),
        ));
    }

    match authenticate(state.store.as_ref(), username, &form.password).await? {
        Authentication::Authenticated(user) => {
            let role = user.role();
            info!(user_id = user.id, role = role.as_str(), "user logged in");
            Ok(Redirect::to(role.landing_path()))
        }
        Authentication::Rejected => {
            warn!(%username, "login rejected");
            Err(AppError::NoMatch)
        }
    }
}

#[instrument(skip(state, form))]
pub async fn create_user(
    State(state): State<AppState>,
    form: Result<Form<CreateUserForm>, FormRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Form(form) = form?;

    let user = create_account(
        state.store.as_ref(),
        &form.username,
        &form.password,
        &form.email,
    )
    .await
    .map_err(|e| {
        warn!(error = %e, username = %form.username, "create user failed");
        AppError::from(e)
    })?;

    info!(user_id = user.id, "user registered");
    Ok(Json(MessageResponse {
        message: "User created successfully".into(),
    }))
}

pub async fn logout() -> Redirect {
    Redirect::to("/")
}
