use crate::auth::{self as auth_service, AuthError, Registration};
use crate::error::{AppError, required};
use crate::state;
use crate::templates;

use axum::body::Body;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use std::sync::Arc;

/// Request-scoped login state, resolved from the session cookie.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Session {
    pub(crate) admin_id: Option<u32>,
}

pub(crate) async fn session_middleware(
    State(state): State<state::AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let admin_id = session_cookie(req.headers(), state.auth.cookie_name())
        .and_then(|token| state.auth.verify_token(token).ok());

    if state.config.require_login && admin_id.is_none() && !is_public_path(req.uri().path()) {
        return Redirect::to("/login").into_response();
    }

    req.extensions_mut().insert(Session { admin_id });
    next.run(req).await
}

fn is_public_path(path: &str) -> bool {
    matches!(
        path,
        "/" | "/login" | "/login_admin" | "/registro" | "/registrar_admin" | "/logout" | "/health"
    ) || path.starts_with("/static/")
}

fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for header in headers.get_all(COOKIE).iter() {
        if let Ok(raw) = header.to_str()
            && let Some(value) = cookie_from_header(raw, name)
        {
            return Some(value);
        }
    }
    None
}

fn cookie_from_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some((cookie_name, cookie_value)) = trimmed.split_once('=')
            && cookie_name == name
        {
            return Some(cookie_value);
        }
    }
    None
}

pub(crate) async fn register_form(
    State(state): State<state::AppState>,
) -> templates::RegisterTemplate {
    templates::RegisterTemplate {
        app_name: state.config.app_name,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterForm {
    nombre: String,
    dni: String,
    correo: String,
    password: String,
}

pub(crate) async fn register_submit(
    State(state): State<state::AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let registration = Registration {
        name: required("nombre", &form.nombre)?,
        national_id: required("dni", &form.dni)?,
        email: required("correo", &form.correo)?,
    };
    if form.password.is_empty() {
        return Err(AppError::InvalidForm("password is required".to_string()));
    }

    let password = form.password;
    let password_hash =
        tokio::task::spawn_blocking(move || auth_service::hash_password(&password)).await??;
    let admin = state.store.update(|document| {
        auth_service::register_administrator(document, registration, password_hash)
    })??;
    tracing::info!(admin_id = admin.id, "registered administrator");

    Ok(Redirect::to("/login"))
}

pub(crate) async fn login_form(
    State(state): State<state::AppState>,
) -> templates::LoginTemplate {
    templates::LoginTemplate {
        app_name: state.config.app_name,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    dni_correo: String,
    password: String,
}

pub(crate) async fn login_submit(
    State(state): State<state::AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;
    let identifier = form.dni_correo.trim().to_string();
    let password = form.password;
    if identifier.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    let store = Arc::clone(&state.store);
    let admin = tokio::task::spawn_blocking(move || {
        store.read(|document| auth_service::authenticate(document, &identifier, &password))
    })
    .await??
    .inspect_err(|_| tracing::info!("rejected login attempt"))?;

    let token = state.auth.issue_token(admin.id)?;
    let cookie = HeaderValue::from_str(&state.auth.session_cookie(&token))
        .map_err(|_| AuthError::InvalidToken)?;
    tracing::info!(admin_id = admin.id, "administrator signed in");

    let mut response = Redirect::to("/inicio").into_response();
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}

pub(crate) async fn logout(State(state): State<state::AppState>) -> Result<Response, AppError> {
    let cookie =
        HeaderValue::from_str(&state.auth.clear_cookie()).map_err(|_| AuthError::InvalidToken)?;
    let mut response = Redirect::to("/").into_response();
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}
