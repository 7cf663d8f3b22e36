//! API 层配置
//!
//! `RunConfig` 显式构造并按引用传递，不使用全局单例。

use circdep_config::{DetectorConfig, Filter};

/// 一次检测运行的配置
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 检测器配置（根目录、扩展名、第三方目录、日志）
    pub detector: DetectorConfig,
    /// 报告过滤器；`None` 报告全部循环依赖
    pub filter: Option<Filter>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            filter: Some(Filter::Problems),
        }
    }
}

impl RunConfig {
    pub fn new(detector: DetectorConfig) -> Self {
        Self {
            detector,
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }
}
