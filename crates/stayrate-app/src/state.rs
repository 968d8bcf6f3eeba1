use std::sync::Arc;

use stayrate_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool, app_config }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

impl axum::extract::FromRef<AppState> for () {
    fn from_ref(_state: &AppState) {}
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

pub struct AppConfig {
    pub default_page_size: u32,
}
