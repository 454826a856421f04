use crate::directory;
use crate::error::{AppError, required};
use crate::state;
use crate::templates;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Redirect;
use serde::Deserialize;

pub(crate) async fn users(
    State(state): State<state::AppState>,
) -> Result<templates::UsersTemplate, AppError> {
    let users = state
        .store
        .read(|document| directory::list_users(document).to_vec())?;
    Ok(templates::UsersTemplate {
        app_name: state.config.app_name,
        users,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddUserForm {
    nombre: String,
}

pub(crate) async fn add_user(
    State(state): State<state::AppState>,
    form: Result<Form<AddUserForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let name = required("nombre", &form.nombre)?;
    let user = state
        .store
        .update(|document| directory::add_user(document, &name))??;
    tracing::info!(user_id = user.id, "added user");
    Ok(Redirect::to("/usuarios"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameUserForm {
    usuario_id: u32,
    nuevo_nombre: String,
}

pub(crate) async fn rename_user(
    State(state): State<state::AppState>,
    form: Result<Form<RenameUserForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let name = required("nuevo_nombre", &form.nuevo_nombre)?;
    let found = state
        .store
        .update(|document| directory::rename_user(document, form.usuario_id, &name))?;
    if found {
        tracing::info!(user_id = form.usuario_id, "renamed user");
    } else {
        tracing::debug!(user_id = form.usuario_id, "rename skipped, no such user");
    }
    Ok(Redirect::to("/usuarios"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserForm {
    usuario_id: u32,
}

pub(crate) async fn delete_user(
    State(state): State<state::AppState>,
    form: Result<Form<UserForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let found = state
        .store
        .update(|document| directory::delete_user(document, form.usuario_id))?;
    if found {
        tracing::info!(user_id = form.usuario_id, "deleted user");
    } else {
        tracing::debug!(user_id = form.usuario_id, "delete skipped, no such user");
    }
    Ok(Redirect::to("/usuarios"))
}
