use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_server_endpoint")]
    pub server_endpoint: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long a critical notification stays on screen.
    #[serde(default = "default_notification_dismiss_secs")]
    pub notification_dismiss_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            server_endpoint: default_server_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
            notification_dismiss_secs: default_notification_dismiss_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_server_endpoint() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_notification_dismiss_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    5
}

impl WatchConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Base URL of the server with a scheme and without a trailing slash.
    pub fn base_url(&self) -> String {
        let addr = self.server_endpoint.trim().trim_end_matches('/');
        if addr.contains("://") {
            return addr.to_string();
        }
        format!("http://{addr}")
    }
}
