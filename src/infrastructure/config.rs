use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct ConsoleSettings {
    pub api: ApiSettings,
    pub server: ServerSettings,
    pub pagination: PaginationSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub base_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationSettings {
    pub page_size: usize,
    #[serde(default)]
    pub page_sizes: Vec<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            page_sizes: vec![10, 20, 50],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub dismiss_after_ms: u64,
}

impl NotificationSettings {
    pub fn dismiss_after(&self) -> Duration {
        Duration::from_millis(self.dismiss_after_ms)
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("api.base_url", "http://127.0.0.1:6379")?
        .set_default("api.base_path", "/api")?
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("pagination.page_size", 10)?
        .set_default("pagination.page_sizes", vec![10, 20, 50])?
        .set_default("notifications.dismiss_after_ms", 3000)?)
}

/// Defaults, then `config/console.*` if present, then `CONSOLE__*` environment variables.
pub fn load_console_settings() -> anyhow::Result<ConsoleSettings> {
    let settings = builder()?
        .add_source(config::File::with_name("config/console").required(false))
        .add_source(
            config::Environment::with_prefix("CONSOLE")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
