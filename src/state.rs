use crate::auth::AuthState;
use crate::config::AppConfig;
use crate::store::Store;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub(crate) auth: AuthState,
    pub store: Arc<Store>,
}
