//! Process settings for the HTTP server.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENV_FILE: &str = "intelligence.env";
pub const DEFAULT_MAX_BODY_BYTES: usize = 50 << 20;

/// Server settings. Every flag falls back to an environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "intelligence-server", version, about = "Declarative AI intelligence dispatch server")]
pub struct ServerConfig {
    /// TCP port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "INTELLIGENCE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Service document (JSON, or YAML by .yaml/.yml extension)
    #[arg(long = "config", env = "INTELLIGENCE_CONFIG", default_value = "intelligence.json")]
    pub config_path: PathBuf,

    /// Outbound provider request timeout in seconds
    #[arg(long, env = "AI_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    pub http_timeout_secs: u64,

    /// Largest accepted request body in bytes
    #[arg(long, env = "INTELLIGENCE_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Reload the service document when it changes
    #[arg(long, env = "INTELLIGENCE_WATCH")]
    pub watch: bool,
}

impl ServerConfig {
    /// Load the env file named by `INTELLIGENCE_ENV_FILE` (a missing file is
    /// ignored), then parse arguments and environment.
    pub fn load() -> Self {
        let env_file =
            std::env::var("INTELLIGENCE_ENV_FILE").unwrap_or_else(|_| DEFAULT_ENV_FILE.to_string());
        let _ = dotenvy::from_filename(env_file);
        Self::parse()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
