//! circdep Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all circdep crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Detection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Project root; module paths are reported relative to it.
    /// `None` means the process working directory.
    pub root: Option<PathBuf>,
    /// Extensions stripped during normalization and tried during resolution
    pub extensions: Vec<String>,
    /// Directory names treated as vendored / third-party code
    pub vendor_dirs: Vec<String>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Report filter
///
/// `None` (no filter) reports every circular dependency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Only records that actively cause problems
    Problems,
    /// Exports that stay empty even for async access
    AlwaysEmpty,
    /// Exports that are only incomplete for synchronous access
    SyncEmpty,
    /// Properties read mid-cycle that never showed up
    MissingProperties,
}

impl Filter {
    /// Get the string name of the filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Filter::Problems => "problems",
            Filter::AlwaysEmpty => "always-empty",
            Filter::SyncEmpty => "sync-empty",
            Filter::MissingProperties => "missing-properties",
        }
    }
}

/// Detector component enum for component-specific log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Interceptor,
    Ledger,
    Validator,
    Reporter,
    Host,
    Cli,
}

impl Component {
    /// All components, in pipeline order
    pub const ALL: [Component; 6] = [
        Component::Interceptor,
        Component::Ledger,
        Component::Validator,
        Component::Reporter,
        Component::Host,
        Component::Cli,
    ];

    /// Get the string name of the component
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Interceptor => "interceptor",
            Component::Ledger => "ledger",
            Component::Validator => "validator",
            Component::Reporter => "reporter",
            Component::Host => "host",
            Component::Cli => "cli",
        }
    }

    /// Get the log target name for this component
    pub fn target(&self) -> String {
        format!("circdep::{}", self.as_str())
    }
}

/// Log level
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse a level name; "silent" maps to errors only
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    /// One step more verbose (saturates at trace)
    pub fn raised(self) -> Self {
        match self {
            LogLevel::Error => LogLevel::Warn,
            LogLevel::Warn => LogLevel::Info,
            LogLevel::Info => LogLevel::Debug,
            LogLevel::Debug | LogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global default level
    pub global: LogLevel,
    /// Per-component overrides (None means use global)
    pub interceptor: Option<LogLevel>,
    pub ledger: Option<LogLevel>,
    pub validator: Option<LogLevel>,
    pub reporter: Option<LogLevel>,
    pub host: Option<LogLevel>,
}

impl LoggingConfig {
    /// Get log level for a specific component
    pub fn level_for(&self, component: Component) -> LogLevel {
        let specific = match component {
            Component::Interceptor => self.interceptor,
            Component::Ledger => self.ledger,
            Component::Validator => self.validator,
            Component::Reporter => self.reporter,
            Component::Host => self.host,
            Component::Cli => None,
        };
        specific.unwrap_or(self.global)
    }

    /// Set the level of one component
    pub fn set_level(&mut self, component: Component, level: LogLevel) {
        match component {
            Component::Interceptor => self.interceptor = Some(level),
            Component::Ledger => self.ledger = Some(level),
            Component::Validator => self.validator = Some(level),
            Component::Reporter => self.reporter = Some(level),
            Component::Host => self.host = Some(level),
            Component::Cli => self.global = level,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Warn,
            interceptor: None,
            ledger: None,
            validator: None,
            reporter: None,
            host: None,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec![".mod".to_string()],
            vendor_dirs: vec!["node_modules".to_string(), "vendor".to_string()],
            logging: LoggingConfig::default(),
        }
    }
}

impl DetectorConfig {
    /// Project root with fallbacks: `root`, then the working directory, then `.`
    pub fn effective_root(&self) -> PathBuf {
        self.root
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Parse a JSON configuration document; missing fields take defaults
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_detector_config() {
        let cfg = DetectorConfig::default();
        assert!(cfg.root.is_none());
        assert_eq!(cfg.extensions, vec![".mod"]);
        assert_eq!(cfg.vendor_dirs, vec!["node_modules", "vendor"]);
    }

    #[test]
    fn test_effective_root() {
        let explicit = DetectorConfig {
            root: Some(PathBuf::from("/project")),
            ..DetectorConfig::default()
        };
        assert_eq!(explicit.effective_root(), PathBuf::from("/project"));

        let fallback = DetectorConfig::default().effective_root();
        if let Ok(cwd) = std::env::current_dir() {
            assert_eq!(fallback, cwd);
        }
    }

    #[test]
    fn test_component_target() {
        assert_eq!(Component::Ledger.as_str(), "ledger");
        assert_eq!(Component::Validator.target(), "circdep::validator");
    }

    #[test]
    fn test_filter_names() {
        assert_eq!(Filter::AlwaysEmpty.as_str(), "always-empty");
        let parsed: Filter = serde_json::from_str("\"missing-properties\"").unwrap();
        assert_eq!(parsed, Filter::MissingProperties);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = DetectorConfig::from_json(r#"{ "root": "/project", "logging": { "ledger": "trace" } }"#)
            .unwrap();
        assert_eq!(cfg.root, Some(PathBuf::from("/project")));
        assert_eq!(cfg.extensions, vec![".mod"]);
        assert_eq!(cfg.logging.level_for(Component::Ledger), LogLevel::Trace);
        assert_eq!(cfg.logging.level_for(Component::Host), LogLevel::Warn);
    }

    #[test]
    fn test_log_level_parse_and_raise() {
        assert_eq!(LogLevel::parse("silent"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogLevel::Warn.raised().raised(), LogLevel::Debug);
        assert_eq!(LogLevel::Trace.raised(), LogLevel::Trace);
    }
}
