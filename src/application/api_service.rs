// API orchestration - typed endpoints with uniform failure surfacing
use crate::application::console_api::{ApiFault, ConsoleApi, HttpMethod};
use crate::application::notification_service::NotificationChannel;
use crate::domain::business::{BusinessOverview, DataPointList};
use crate::domain::cluster::{ClusterInfo, MetadataInfo, StatsInfo};
use crate::domain::config_record::{ConfigUpdate, ConsoleConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

/// Lifecycle actions on a business instance, each with its own endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceAction {
    Start,
    Stop,
    Delete,
}

impl InstanceAction {
    fn endpoint(&self) -> &'static str {
        match self {
            InstanceAction::Start => "/business/instance/start",
            InstanceAction::Stop => "/business/instance/stop",
            InstanceAction::Delete => "/business/instance/delete",
        }
    }
}

/// Every failing call is logged, reported once on the notification channel and
/// handed back to the caller.
#[derive(Clone)]
pub struct ApiService {
    api: Arc<dyn ConsoleApi>,
    notifier: NotificationChannel,
}

impl ApiService {
    pub fn new(api: Arc<dyn ConsoleApi>, notifier: NotificationChannel) -> Self {
        Self { api, notifier }
    }

    pub async fn call(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<Value>,
    ) -> Result<Value, ApiFault> {
        tracing::debug!("{} {}", method, endpoint);
        let result = self.api.call(endpoint, method, body).await;
        result.map_err(|fault| self.surface(endpoint, fault))
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiFault> {
        let payload = self.call(endpoint, HttpMethod::Get, None).await?;
        serde_json::from_value(payload)
            .map_err(|e| self.surface(endpoint, ApiFault::Parse(e.to_string())))
    }

    async fn post<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<Value, ApiFault> {
        let body = serde_json::to_value(body)
            .map_err(|e| self.surface(endpoint, ApiFault::Parse(e.to_string())))?;
        self.call(endpoint, HttpMethod::Post, Some(body)).await
    }

    fn surface(&self, endpoint: &str, fault: ApiFault) -> ApiFault {
        tracing::error!("API call to {} failed: {}", endpoint, fault);
        self.notifier.error(format!("API call failed: {}", fault));
        fault
    }

    pub async fn stats(&self) -> Result<StatsInfo, ApiFault> {
        self.fetch("/stats").await
    }

    pub async fn metadata(&self) -> Result<MetadataInfo, ApiFault> {
        self.fetch("/metadata").await
    }

    pub async fn config(&self) -> Result<ConsoleConfig, ApiFault> {
        self.fetch("/config").await
    }

    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<(), ApiFault> {
        self.post("/config/update", update).await.map(|_| ())
    }

    pub async fn cluster(&self) -> Result<ClusterInfo, ApiFault> {
        self.fetch("/cluster").await
    }

    pub async fn business(&self) -> Result<BusinessOverview, ApiFault> {
        self.fetch("/business").await
    }

    pub async fn business_data(&self) -> Result<DataPointList, ApiFault> {
        self.fetch("/business/data").await
    }

    pub async fn create_instance(&self, instance_id: &str, business_type: &str) -> Result<(), ApiFault> {
        let body = json!({"instance_id": instance_id, "business_type": business_type});
        self.post("/business/instance/create", &body).await.map(|_| ())
    }

    pub async fn instance_action(&self, instance_id: &str, action: InstanceAction) -> Result<(), ApiFault> {
        let body = json!({"instance_id": instance_id});
        self.post(action.endpoint(), &body).await.map(|_| ())
    }
}
