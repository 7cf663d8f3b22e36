//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use serde::Serialize;
use thiserror::Error;

use circdep_core::{DetectError, LoadError};

/// circdep 错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CircdepError {
    /// 检测配置或入口解析错误
    #[error("{0}")]
    Detect(#[from] DetectError),

    /// 模块加载/执行错误
    #[error("{0}")]
    Load(#[from] LoadError),
}

impl CircdepError {
    /// 错误类别名称
    pub fn kind(&self) -> &'static str {
        match self {
            CircdepError::Detect(DetectError::Configuration(_)) => "configuration",
            CircdepError::Detect(DetectError::Resolution { .. }) => "resolution",
            CircdepError::Load(LoadError::NotFound { .. }) => "not_found",
            CircdepError::Load(LoadError::Read { .. }) => "read",
            CircdepError::Load(LoadError::Parse { .. }) => "parse",
            CircdepError::Load(LoadError::Runtime { .. }) => "runtime",
        }
    }

    /// 出错的文件（如果有）
    pub fn path(&self) -> Option<String> {
        match self {
            CircdepError::Detect(DetectError::Resolution { entry, .. }) => Some(entry.display().to_string()),
            CircdepError::Load(LoadError::Read { path, .. })
            | CircdepError::Load(LoadError::Parse { path, .. })
            | CircdepError::Load(LoadError::Runtime { path, .. }) => Some(path.display().to_string()),
            _ => None,
        }
    }

    /// 错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        match self {
            CircdepError::Load(LoadError::Parse { line, .. }) => Some(*line),
            _ => None,
        }
    }

    /// 转换为结构化错误报告
    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            path: self.path(),
            line: self.line(),
            message: self.to_string(),
        }
    }
}

/// 结构化错误报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    /// 错误类别: configuration, resolution, not_found, read, parse, runtime
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// 人类可读的错误消息
    pub message: String,
}

impl std::fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.path, self.line) {
            (Some(path), Some(line)) => write!(f, "[{}:{}] {} error: {}", path, line, self.kind, self.message),
            _ => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl ErrorReport {
    /// JSON 格式
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{{\"kind\":\"{}\"}}", self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_error_report() {
        let err = CircdepError::from(LoadError::Parse {
            path: PathBuf::from("/p/a.mod"),
            line: 3,
            message: "expected identifier".to_string(),
        });
        let report = err.to_report();
        assert_eq!(report.kind, "parse");
        assert_eq!(report.line, Some(3));
        assert_eq!(report.path.as_deref(), Some("/p/a.mod"));
        assert!(report.to_string().starts_with("[/p/a.mod:3] parse error:"));
    }

    #[test]
    fn test_resolution_report_json() {
        let err = CircdepError::from(DetectError::Resolution {
            entry: PathBuf::from("/p/missing.mod"),
            source: LoadError::NotFound {
                specifier: "/p/missing.mod".to_string(),
                tried: vec![],
            },
        });
        let json: serde_json::Value = serde_json::from_str(&err.to_report().to_json()).unwrap();
        assert_eq!(json["kind"], "resolution");
        assert_eq!(json["path"], "/p/missing.mod");
        assert!(json.get("line").is_none());
    }

    #[test]
    fn test_configuration_display() {
        let err = CircdepError::from(DetectError::Configuration("bad".to_string()));
        assert_eq!(err.kind(), "configuration");
        assert_eq!(err.to_report().to_string(), "[configuration] Configuration error: bad");
    }
}
