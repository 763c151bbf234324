use std::env;
use std::path::PathBuf;

use crate::error::CityGridError;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    /// JSON `{ nodes, edges }` file replacing the bundled seed graph.
    pub graph_seed_path: Option<PathBuf>,

    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from the environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, CityGridError> {
        dotenvy::dotenv().ok();

        let web_port = env::var("WEB_PORT").unwrap_or_else(|_| "3001".to_string());
        let web_port = web_port
            .parse::<u16>()
            .map_err(|_| CityGridError::Config(format!("WEB_PORT must be a number, got {web_port:?}")))?;

        Ok(Self {
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port,
            graph_seed_path: env::var("GRAPH_SEED_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            cors_allowed_origins: parse_origins(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  WEB_HOST: {}", self.web_host);
        tracing::info!("  WEB_PORT: {}", self.web_port);
        tracing::info!(
            "  GRAPH_SEED_PATH: {}",
            self.graph_seed_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "<bundled>".to_string())
        );
        if self.cors_allowed_origins.is_empty() {
            tracing::info!("  CORS_ALLOWED_ORIGINS: <any>");
        } else {
            tracing::info!("  CORS_ALLOWED_ORIGINS: {}", self.cors_allowed_origins.join(", "));
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
