//! 检测运行与问题报告
//!
//! `start` 安装拦截器并登记一次性的 drain 回调；`Detection::finish`
//! 在同步加载全部返回后执行 drain，并且只调用一次 `on_done`。

use std::rc::Rc;

use circdep_config::{DetectorConfig, Filter};
use tracing::{debug, info, warn};

use crate::error::DetectError;
use crate::hook::{HookPoint, LoadHook};
use crate::problem::ProblemRecord;
use crate::session::DetectionSession;

const TARGET: &str = "circdep::reporter";

/// 完成回调：每次运行恰好调用一次
pub type OnDone = Box<dyn FnOnce(Result<Vec<ProblemRecord>, DetectError>)>;

/// 启动参数
#[derive(Default)]
pub struct StartOptions {
    pub filter: Option<Filter>,
    pub config: DetectorConfig,
    pub on_done: Option<OnDone>,
}

impl StartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Option<Filter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(mut self, config: DetectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_done(mut self, on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static) -> Self {
        self.on_done = Some(Box::new(on_done));
        self
    }
}

/// 一次检测运行
pub struct Detection {
    session: DetectionSession,
    host: Rc<dyn HookPoint>,
    /// 安装期间保存被替换的拦截器
    previous: Option<Option<Rc<dyn LoadHook>>>,
    filter: Option<Filter>,
    on_done: Option<OnDone>,
}

/// 启动检测：安装拦截器，登记 drain
///
/// # Errors
/// 缺少完成回调时返回 `DetectError::Configuration`，此时不安装任何东西。
pub fn start(host: Rc<dyn HookPoint>, options: StartOptions) -> Result<Detection, DetectError> {
    let StartOptions {
        filter,
        config,
        on_done,
    } = options;
    let on_done = on_done.ok_or_else(|| DetectError::Configuration("a completion callback is required".to_string()))?;

    let session = DetectionSession::new(&config);
    let previous = host.install_hook(session.hook());
    info!(target: TARGET, filter = filter.map(|f| f.as_str()).unwrap_or("circular"), "detection started");

    Ok(Detection {
        session,
        host,
        previous: Some(previous),
        filter,
        on_done: Some(on_done),
    })
}

impl Detection {
    pub fn session(&self) -> &DetectionSession {
        &self.session
    }

    pub fn filter(&self) -> Option<Filter> {
        self.filter
    }

    /// 拦截器是否仍在安装中
    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }

    /// 恢复原始解析，结束拦截（可重复调用）
    pub fn stop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.host.restore_hook(previous);
            debug!(target: TARGET, "interception stopped");
        }
    }

    /// 通过错误通道交付错误（例如入口不存在）
    pub fn report_error(&self, error: DetectError) {
        self.session.report_error(error);
    }

    /// drain 并调用完成回调
    pub fn finish(mut self) {
        self.complete();
    }

    fn complete(&mut self) {
        let Some(on_done) = self.on_done.take() else {
            return;
        };
        self.session.drain();
        let outcome = match self.session.take_error() {
            Some(error) => Err(error),
            None => Ok(self.session.problems(self.filter)),
        };
        if let Ok(records) = &outcome {
            info!(target: TARGET, count = records.len(), "detection drained");
        }
        on_done(outcome);
    }
}

impl Drop for Detection {
    fn drop(&mut self) {
        self.stop();
        if self.on_done.is_some() {
            warn!(target: TARGET, "detection dropped before finish, draining now");
            self.complete();
        }
    }
}

/// 只报告正在造成问题的循环依赖
pub fn problems(
    host: Rc<dyn HookPoint>,
    on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static,
) -> Result<Detection, DetectError> {
    start(host, StartOptions::new().filter(Some(Filter::Problems)).on_done(on_done))
}

/// 报告全部循环依赖
pub fn circular(
    host: Rc<dyn HookPoint>,
    on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static,
) -> Result<Detection, DetectError> {
    start(host, StartOptions::new().filter(None).on_done(on_done))
}

/// 只报告导出始终为空（对象不一致）的循环依赖
pub fn always_empty_exports(
    host: Rc<dyn HookPoint>,
    on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static,
) -> Result<Detection, DetectError> {
    start(host, StartOptions::new().filter(Some(Filter::AlwaysEmpty)).on_done(on_done))
}

/// 只报告同步访问时导出不完整的循环依赖
pub fn empty_sync_access(
    host: Rc<dyn HookPoint>,
    on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static,
) -> Result<Detection, DetectError> {
    start(host, StartOptions::new().filter(Some(Filter::SyncEmpty)).on_done(on_done))
}

/// 只报告循环窗口内读到缺失属性的循环依赖
pub fn missing_properties(
    host: Rc<dyn HookPoint>,
    on_done: impl FnOnce(Result<Vec<ProblemRecord>, DetectError>) + 'static,
) -> Result<Detection, DetectError> {
    start(host, StartOptions::new().filter(Some(Filter::MissingProperties)).on_done(on_done))
}
