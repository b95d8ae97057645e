use serde::Deserialize;

use crate::infra::config::{AppConfig, LogConfig, SyncConfig, TypingConfig};

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub logging: Option<FileLogConfig>,
    pub sync: Option<FileSyncConfig>,
    pub typing: Option<FileTypingConfig>,
}

impl FileConfig {
    pub fn merge_into(self, config: &mut AppConfig) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut config.logging);
        }

        if let Some(sync) = self.sync {
            sync.merge_into(&mut config.sync);
        }

        if let Some(typing) = self.typing {
            typing.merge_into(&mut config.typing);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogConfig {
    pub level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileSyncConfig {
    pub page_size: Option<usize>,
}

impl FileSyncConfig {
    fn merge_into(self, config: &mut SyncConfig) {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct FileTypingConfig {
    pub ttl_ms: Option<i64>,
    pub sweep_interval_ms: Option<u64>,
    pub ping_interval_ms: Option<i64>,
}

impl FileTypingConfig {
    fn merge_into(self, config: &mut TypingConfig) {
        if let Some(ttl_ms) = self.ttl_ms {
            config.ttl_ms = ttl_ms;
        }

        if let Some(sweep_interval_ms) = self.sweep_interval_ms {
            config.sweep_interval_ms = sweep_interval_ms;
        }

        if let Some(ping_interval_ms) = self.ping_interval_ms {
            config.ping_interval_ms = ping_interval_ms;
        }
    }
}
