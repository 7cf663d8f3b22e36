//! 错误类型
//!
//! - `LoadError`：宿主加载失败，原样穿过拦截器
//! - `DetectError`：检测本身的配置/入口错误
//!
//! 检测到的问题不是错误，始终通过成功通道交付。

use std::path::PathBuf;
use thiserror::Error;

/// 宿主加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// 模块未找到
    #[error("Cannot find module '{specifier}'{}", format_tried(.tried))]
    NotFound {
        /// 请求的说明符
        specifier: String,
        /// 尝试过的文件路径
        tried: Vec<PathBuf>,
    },

    /// 文件读取错误
    #[error("Failed to read '{}': {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// 模块源码解析错误
    #[error("Failed to parse '{}' (line {line}): {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// 模块执行错误
    #[error("Error while executing '{}': {message}", .path.display())]
    Runtime { path: PathBuf, message: String },
}

fn format_tried(tried: &[PathBuf]) -> String {
    if tried.is_empty() {
        return String::new();
    }
    let mut out = String::from(". Tried:");
    for path in tried {
        out.push_str("\n  - ");
        out.push_str(&path.display().to_string());
    }
    out
}

/// 检测错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    /// 配置错误（在任何加载开始前失败）
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 入口解析失败（只中止该入口）
    #[error("Cannot resolve entry point '{}': {source}", .entry.display())]
    Resolution {
        entry: PathBuf,
        #[source]
        source: LoadError,
    },
}
