use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::data::tables::DEFAULT_DATA_DIR;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_RELOAD_SECS: u64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    /// `None` disables periodic reload.
    pub reload_interval: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            reload_interval: Some(Duration::from_secs(DEFAULT_RELOAD_SECS)),
        }
    }
}

impl AppConfig {
    /// OPDEX_BIND, OPDEX_DATA_DIR, OPDEX_RELOAD_SECS.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bind_addr = lookup("OPDEX_BIND").unwrap_or(defaults.bind_addr);
        let data_dir = lookup("OPDEX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let reload_secs = match lookup("OPDEX_RELOAD_SECS") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warn!(value = %raw, "invalid OPDEX_RELOAD_SECS, using {DEFAULT_RELOAD_SECS}");
                DEFAULT_RELOAD_SECS
            }),
            None => DEFAULT_RELOAD_SECS,
        };
        let reload_interval = (reload_secs > 0).then(|| Duration::from_secs(reload_secs));

        Self {
            bind_addr,
            data_dir,
            reload_interval,
        }
    }
}
