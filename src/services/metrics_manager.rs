use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub outcome_usage: HashMap<String, u64>,
    pub endpoint_usage: HashMap<String, u64>,
}

#[derive(Debug, Clone)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl Default for MetricsManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MetricsData::default())),
        }
    }

    pub async fn increment_outcome(&self, outcome: &str) {
        let mut data = self.inner.write().await;
        *data.outcome_usage.entry(outcome.to_string()).or_insert(0) += 1;
    }

    pub async fn increment_endpoint(&self, endpoint: &str) {
        let mut data = self.inner.write().await;
        *data.endpoint_usage.entry(endpoint.to_string()).or_insert(0) += 1;
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}
