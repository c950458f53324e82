use std::env;
use std::path::PathBuf;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub event_buffer_size: usize,
    /// Directory holding the persisted snapshot. `None` keeps state in memory only.
    pub storage_dir: Option<PathBuf>,
    pub storage_key: String,
    pub chat: ChatTiming,
}

/// Simulated assistant "typing" before a canned reply lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatTiming {
    pub typing_delay_ms: u64,
    pub typing_jitter_ms: u64,
}

impl ChatTiming {
    pub fn immediate() -> Self {
        Self {
            typing_delay_ms: 0,
            typing_jitter_ms: 0,
        }
    }
}

impl Default for ChatTiming {
    fn default() -> Self {
        Self {
            typing_delay_ms: 1000,
            typing_jitter_ms: 1000,
        }
    }
}

pub const DEFAULT_STORAGE_KEY: &str = "poobel-storage";

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let defaults = ChatTiming::default();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            storage_dir: env::var("STORAGE_DIR")
                .ok()
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from),
            storage_key: env::var("STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string()),
            chat: ChatTiming {
                typing_delay_ms: parse_or_default("CHAT_TYPING_DELAY_MS", defaults.typing_delay_ms)?,
                typing_jitter_ms: parse_or_default(
                    "CHAT_TYPING_JITTER_MS",
                    defaults.typing_jitter_ms,
                )?,
            },
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
