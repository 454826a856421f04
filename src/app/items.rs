use crate::catalog;
use crate::error::{AppError, required};
use crate::state;
use crate::templates;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Redirect;
use serde::Deserialize;

pub(crate) async fn inventory(
    State(state): State<state::AppState>,
) -> Result<templates::InventoryTemplate, AppError> {
    let items = state
        .store
        .read(|document| catalog::list_items(document).to_vec())?;
    Ok(templates::InventoryTemplate {
        app_name: state.config.app_name,
        items,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddItemForm {
    nombre: String,
    geles: u32,
}

pub(crate) async fn add_item(
    State(state): State<state::AppState>,
    form: Result<Form<AddItemForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let name = required("nombre", &form.nombre)?;
    let item = state
        .store
        .update(|document| catalog::add_item(document, &name, form.geles))??;
    tracing::info!(item_id = item.id, "added item");
    Ok(Redirect::to("/inventario"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RenameItemForm {
    casco_id: u32,
    nuevo_nombre: String,
}

pub(crate) async fn rename_item(
    State(state): State<state::AppState>,
    form: Result<Form<RenameItemForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let name = required("nuevo_nombre", &form.nuevo_nombre)?;
    let found = state
        .store
        .update(|document| catalog::rename_item(document, form.casco_id, &name))?;
    if found {
        tracing::info!(item_id = form.casco_id, "renamed item");
    } else {
        tracing::debug!(item_id = form.casco_id, "rename skipped, no such item");
    }
    Ok(Redirect::to("/inventario"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ItemForm {
    casco_id: u32,
}

pub(crate) async fn delete_item(
    State(state): State<state::AppState>,
    form: Result<Form<ItemForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let found = state
        .store
        .update(|document| catalog::delete_item(document, form.casco_id))?;
    if found {
        tracing::info!(item_id = form.casco_id, "deleted item");
    } else {
        tracing::debug!(item_id = form.casco_id, "delete skipped, no such item");
    }
    Ok(Redirect::to("/inventario"))
}
