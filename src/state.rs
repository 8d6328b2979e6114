// src/state.rs
use std::sync::Arc;

use crate::config::ChatProfiles;
use crate::services::gateway::{CompletionGateway, OpenAiClient};
use crate::services::metrics_manager::MetricsManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub profiles: ChatProfiles,
    pub gateway: Arc<dyn CompletionGateway>,
    pub metrics: MetricsManager,
}

impl AppState {
    pub fn new(profiles: ChatProfiles, gateway: Arc<dyn CompletionGateway>) -> Self {
        Self {
            profiles,
            gateway,
            metrics: MetricsManager::new(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(ChatProfiles::from_env(), Arc::new(OpenAiClient::from_env()))
    }
}
