//! CLI 配置
//!
//! 配置文件读取，以及检测器日志配置到 tracing 级别的映射。

use std::path::{Path, PathBuf};

use circdep_config::{Component, DetectorConfig, LogLevel, LoggingConfig};
use thiserror::Error;
use tracing::Level;

/// 配置文件错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 读取 JSON 配置文件
pub fn load_detector_config(path: &Path) -> Result<DetectorConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    DetectorConfig::from_json(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    /// (target, level)，每个组件一项
    pub targets: Vec<(String, Level)>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_logging(&LoggingConfig::default())
    }
}

impl LogConfig {
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            global: to_level(logging.global),
            targets: Component::ALL
                .iter()
                .map(|c| (c.target(), to_level(logging.level_for(*c))))
                .collect(),
        }
    }

    /// Get log level for a specific target
    pub fn level_for(&self, target: &str) -> Level {
        self.targets
            .iter()
            .find(|(name, _)| name == target)
            .map_or(self.global, |(_, level)| *level)
    }
}

fn to_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_override() {
        let mut logging = LoggingConfig::default();
        logging.set_level(Component::Validator, LogLevel::Trace);
        let cfg = LogConfig::from_logging(&logging);
        assert_eq!(cfg.global, Level::WARN);
        assert_eq!(cfg.level_for("circdep::validator"), Level::TRACE);
        assert_eq!(cfg.level_for("circdep::ledger"), Level::WARN);
        assert_eq!(cfg.level_for("other"), Level::WARN);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circdep.json");
        std::fs::write(&path, r#"{"vendor_dirs": ["third_party"], "logging": {"global": "info"}}"#).unwrap();

        let cfg = load_detector_config(&path).unwrap();
        assert_eq!(cfg.vendor_dirs, vec!["third_party"]);
        assert_eq!(cfg.extensions, vec![".mod"]);
        assert_eq!(cfg.logging.global, LogLevel::Info);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_detector_config(&missing), Err(ConfigError::Read { .. })));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        let err = load_detector_config(&broken).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid config file"));
    }
}
