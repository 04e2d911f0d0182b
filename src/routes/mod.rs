use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::AppState;
use crate::middleware::{auth_middleware, require_admin};

pub mod auth;
pub mod financial;
pub mod generation;
pub mod ping;
pub mod submission;
pub mod user;

/// 组装完整路由树：公开、需认证、管理员三段，统一挂在API前缀下
///
/// 管理员路由先过认证再过角色检查，两道门都在handler之前
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(ping::ping))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route(
            "/submissions",
            get(submission::list_submissions).post(submission::upsert_submission),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let admin_routes = Router::new()
        .route(
            "/admin/users",
            get(user::list_users).post(user::create_user),
        )
        .route(
            "/admin/users/{id}",
            patch(user::update_user).delete(user::delete_user),
        )
        .route("/admin/generations", get(generation::list_generations))
        .route(
            "/admin/generations/{id}/cancel",
            post(generation::cancel_generation),
        )
        .route("/admin/generate-deck", post(generation::generate_deck))
        .route(
            "/admin/financials",
            get(financial::list_financials).post(financial::upsert_financial),
        )
        .layer(axum::middleware::from_fn(require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_base_uri = state.config.api_base_uri.clone();
    Router::new()
        .nest(
            &api_base_uri,
            Router::new()
                .merge(public_routes)
                .merge(protected_routes)
                .merge(admin_routes),
        )
        .with_state(state)
}
