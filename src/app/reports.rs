use crate::catalog;
use crate::error::AppError;
use crate::reporting;
use crate::state;
use crate::templates;

use axum::extract::State;

pub(crate) async fn stats_view(
    State(state): State<state::AppState>,
) -> Result<templates::StatsTemplate, AppError> {
    let stats = state
        .store
        .read(|document| reporting::stats(catalog::list_items(document)))?;
    Ok(templates::StatsTemplate {
        app_name: state.config.app_name,
        stats,
    })
}
