//! CLI 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分组件日志控制，输出到 stderr，
//! 不干扰 stdout 上的检测报告。

use std::io;

use circdep_config::Component;
use tracing_subscriber::{filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LogConfig;

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 构建目标过滤器：全局默认级别 + 每个组件的级别
pub fn build_targets(log_config: &LogConfig) -> Targets {
    Component::ALL
        .iter()
        .fold(Targets::new().with_default(log_config.global), |targets, component| {
            let target = component.target();
            let level = log_config.level_for(&target);
            targets.with_target(target, level)
        })
}

/// 使用指定格式和日志配置初始化日志系统
pub fn init(log_config: &LogConfig, format: LogFormat) {
    let layer = create_format_layer(format, io::stderr).with_filter(build_targets(log_config));
    // 重复初始化（例如测试中）时保留已有的全局 subscriber
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

/// Create formatter layer based on format
fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use circdep_config::{LogLevel, LoggingConfig};
    use tracing::Level;

    #[test]
    fn test_targets_follow_component_levels() {
        let mut logging = LoggingConfig::default();
        logging.set_level(Component::Ledger, LogLevel::Debug);
        let targets = build_targets(&LogConfig::from_logging(&logging));

        assert!(targets.would_enable("circdep::ledger", &Level::DEBUG));
        assert!(!targets.would_enable("circdep::interceptor", &Level::DEBUG));
        assert!(targets.would_enable("circdep::interceptor", &Level::WARN));
        assert!(!targets.would_enable("somewhere::else", &Level::INFO));
    }
}
