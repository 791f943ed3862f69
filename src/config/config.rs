use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;
use tracing::warn;

pub static CONFIG: Lazy<AppConfig> =
    Lazy::new(|| AppConfig::load().unwrap_or_else(|e| panic!("Failed to load config: {}", e)));

const DEFAULT_REVEAL_WINDOW_MS: u64 = 2500;
const MAX_REVEAL_WINDOW_MS: u64 = 60_000;
const DEFAULT_SESSION_IDLE_SECS: u64 = 1800;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub quiz: QuizConfig,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QuizConfig {
    pub reveal_window_ms: u64,
    pub session_idle_secs: u64,
    #[serde(default)]
    pub bank_path: Option<String>,
}

impl AppConfig {
    /// Defaults, then an optional `config.toml`, then `PRAJAKAVACH__*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0")?
            .set_default("server.port", 3000_i64)?
            .set_default("quiz.reveal_window_ms", DEFAULT_REVEAL_WINDOW_MS as i64)?
            .set_default("quiz.session_idle_secs", DEFAULT_SESSION_IDLE_SECS as i64)?
            .set_default("log_level", "debug")?
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("PRAJAKAVACH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl QuizConfig {
    /// The explanation must stay up for a positive, bounded time.
    pub fn reveal_window(&self) -> Duration {
        let ms = match self.reveal_window_ms {
            0 => {
                warn!(
                    "quiz.reveal_window_ms must be positive, using {}",
                    DEFAULT_REVEAL_WINDOW_MS
                );
                DEFAULT_REVEAL_WINDOW_MS
            }
            ms if ms > MAX_REVEAL_WINDOW_MS => {
                warn!(
                    "quiz.reveal_window_ms {} is too long, clamping to {}",
                    ms, MAX_REVEAL_WINDOW_MS
                );
                MAX_REVEAL_WINDOW_MS
            }
            ms => ms,
        };

        Duration::from_millis(ms)
    }

    /// How long a session may go untouched before it is evicted.
    pub fn session_idle(&self) -> Duration {
        match self.session_idle_secs {
            0 => {
                warn!(
                    "quiz.session_idle_secs must be positive, using {}",
                    DEFAULT_SESSION_IDLE_SECS
                );
                Duration::from_secs(DEFAULT_SESSION_IDLE_SECS)
            }
            secs => Duration::from_secs(secs),
        }
    }
}
