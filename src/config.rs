use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8000
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the energy/emissions trend API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://10.10.2.70:3008/api/energy-emission/energy".into()
}
fn default_upstream_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// JSON training series the trend model is fitted from at startup.
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
    /// Months predicted beyond the training index.
    #[serde(default = "default_horizon")]
    pub horizon_months: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            horizon_months: default_horizon(),
        }
    }
}

fn default_artifact_path() -> String {
    "models/training_history.json".into()
}
fn default_horizon() -> usize {
    12
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_forecast_ttl")]
    pub forecast_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            forecast_ttl_secs: default_forecast_ttl(),
        }
    }
}

fn default_forecast_ttl() -> u64 {
    3600
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("ENERTREND").separator("__"))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        Ok(app_config)
    }
}
