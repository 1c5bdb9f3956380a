use crate::config::AppConfig;
use crate::session::DashboardSession;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub session: Arc<Mutex<Option<DashboardSession>>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(None)),
        }
    }
}
