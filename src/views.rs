use axum::{response::Html, routing::get, Router};

use crate::state::AppState;

const LOGIN_PAGE: &str = include_str!("../templates/login.html");
const ADMIN_DASHBOARD_PAGE: &str = include_str!("../templates/admin_dashboard.html");
const USER_DASHBOARD_PAGE: &str = include_str!("../templates/user_dashboard.html");

// Dashboards are served to anyone; the role only chooses which one a login lands on.
pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(login_page))
        .route("/admin/dashboard", get(admin_dashboard))
        .route("/user/dashboard", get(user_dashboard))
}

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub async fn admin_dashboard() -> Html<&'static str> {
    Html(ADMIN_DASHBOARD_PAGE)
}

pub async fn user_dashboard() -> Html<&'static str> {
    Html(USER_DASHBOARD_PAGE)
}
