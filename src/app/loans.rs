use crate::catalog;
use crate::directory;
use crate::error::AppError;
use crate::loans;
use crate::state;
use crate::templates;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::Redirect;
use serde::Deserialize;

pub(crate) async fn loans_view(
    State(state): State<state::AppState>,
) -> Result<templates::LoansTemplate, AppError> {
    let (items, users) = state.store.read(|document| {
        let items = catalog::list_items(document)
            .iter()
            .map(|item| templates::LoanRow {
                id: item.id,
                name: item.name.clone(),
                lent: item.lent,
                borrower: match item.borrower {
                    Some(user_id) => directory::find_user(document, user_id)
                        .map(|user| user.name.clone())
                        .unwrap_or_else(|| format!("#{user_id}")),
                    None => String::new(),
                },
            })
            .collect();
        (items, directory::list_users(document).to_vec())
    })?;
    Ok(templates::LoansTemplate {
        app_name: state.config.app_name,
        items,
        users,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct LendForm {
    casco_id: u32,
    usuario_id: u32,
}

pub(crate) async fn lend(
    State(state): State<state::AppState>,
    form: Result<Form<LendForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let found = state
        .store
        .update(|document| loans::lend(document, form.casco_id, form.usuario_id))?;
    if found {
        tracing::info!(item_id = form.casco_id, user_id = form.usuario_id, "lent item");
    } else {
        tracing::debug!(item_id = form.casco_id, "lend skipped, no such item");
    }
    Ok(Redirect::to("/prestamos"))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReturnForm {
    casco_id: u32,
}

pub(crate) async fn return_item(
    State(state): State<state::AppState>,
    form: Result<Form<ReturnForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    let found = state
        .store
        .update(|document| loans::return_item(document, form.casco_id))?;
    if found {
        tracing::info!(item_id = form.casco_id, "returned item");
    } else {
        tracing::debug!(item_id = form.casco_id, "return skipped, no such item");
    }
    Ok(Redirect::to("/prestamos"))
}
