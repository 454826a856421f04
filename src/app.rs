use crate::assets;
use crate::auth as auth_service;
use crate::config;
use crate::error::StartupError;
use crate::state;
use crate::store::Store;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

mod auth;
mod items;
mod loans;
mod pages;
mod reports;
mod users;

pub fn app(config: config::AppConfig) -> Result<Router, StartupError> {
    let auth = auth_service::AuthState::from_config(&config)?;
    let store = Store::open(&config.data_file)?;
    tracing::info!(path = %store.path().display(), "using data file");
    let state = state::AppState {
        config,
        auth,
        store: Arc::new(store),
    };
    Ok(router(state))
}

fn router(state: state::AppState) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route("/inicio", get(pages::dashboard))
        .route("/logout", post(auth::logout))
        .route("/registro", get(auth::register_form))
        .route("/registrar_admin", post(auth::register_submit))
        .route("/login", get(auth::login_form))
        .route("/login_admin", post(auth::login_submit))
        .route("/inventario", get(items::inventory))
        .route("/add_casco", post(items::add_item))
        .route("/editar_casco", post(items::rename_item))
        .route("/eliminar_casco", post(items::delete_item))
        .route("/usuarios", get(users::users))
        .route("/add_usuario", post(users::add_user))
        .route("/editar_usuario", post(users::rename_user))
        .route("/eliminar_usuario", post(users::delete_user))
        .route("/prestamos", get(loans::loans_view))
        .route("/prestar", post(loans::lend))
        .route("/devolver", post(loans::return_item))
        .route("/estadisticas", get(reports::stats_view))
        .route("/static/style.css", get(assets::stylesheet))
        .route("/health", get(health))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, auth::session_middleware))
        .layer(TraceLayer::new_for_http())
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
