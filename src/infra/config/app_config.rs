use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub sync: SyncConfig,
    pub typing: TypingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Tunables for history loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    pub page_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { page_size: 50 }
    }
}

/// Tunables for typing signals: how long a signal stays visible, how often
/// the sweep runs, and the minimum gap between outbound pings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypingConfig {
    pub ttl_ms: i64,
    pub sweep_interval_ms: u64,
    pub ping_interval_ms: i64,
}

impl Default for TypingConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 2_500,
            sweep_interval_ms: 800,
            ping_interval_ms: 1_200,
        }
    }
}
