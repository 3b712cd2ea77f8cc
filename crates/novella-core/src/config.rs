//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Fallback when no environment override is set
const DEFAULT_API_BASE_URL: &str = "http://localhost:8888";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the platform API
    pub api_base_url: String,
    /// Path to the local database file
    pub database_path: PathBuf,
    /// Bounded per-request timeout
    pub request_timeout: Duration,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        let api_base_url = std::env::var("NOVELLA_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Self {
            api_base_url,
            database_path: data_dir.join("novella.db"),
            request_timeout: novella_api::DEFAULT_TIMEOUT,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Novella"))
            .unwrap_or_else(|| PathBuf::from(".novella"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for common directories
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
