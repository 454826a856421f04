use crate::auth as auth_service;
use crate::catalog;
use crate::error::AppError;
use crate::reporting;
use crate::state;
use crate::templates;

use axum::Extension;
use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};

use super::auth::Session;

pub(crate) async fn landing(
    State(state): State<state::AppState>,
    Extension(session): Extension<Session>,
) -> templates::LandingTemplate {
    templates::LandingTemplate {
        app_name: state.config.app_name,
        signed_in: session.admin_id.is_some(),
    }
}

pub(crate) async fn dashboard(
    State(state): State<state::AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response, AppError> {
    let Some(admin_id) = session.admin_id else {
        return Ok(Redirect::to("/login").into_response());
    };

    let view = state.store.read(|document| {
        let admin = auth_service::find_administrator(document, admin_id)?;
        Some((
            admin.name.clone(),
            reporting::stats(catalog::list_items(document)),
        ))
    })?;

    // The token outlived its administrator record.
    let Some((admin_name, stats)) = view else {
        tracing::debug!(admin_id, "session refers to unknown administrator");
        return Ok(Redirect::to("/login").into_response());
    };

    Ok(templates::DashboardTemplate {
        app_name: state.config.app_name,
        admin_name,
        stats,
    }
    .into_response())
}
