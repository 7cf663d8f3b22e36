//! 宿主加载挂钩点
//!
//! 检测器不实现任何模块解析算法，只要求宿主提供一个可以透明包裹的
//! `load()` 挂钩点。

use std::path::Path;
use std::rc::Rc;

use crate::error::LoadError;
use crate::value::Value;

/// 一次加载请求
#[derive(Debug, Clone, Copy)]
pub struct LoadRequest<'a> {
    /// 源码中写的说明符（如 "./b" 或 "lodash"）
    pub specifier: &'a str,
    /// 宿主解析出的绝对文件路径
    pub resolved: &'a Path,
    /// 发起请求的模块文件；入口加载为 None
    pub requester: Option<&'a Path>,
}

/// 加载结果
pub type LoadResult = Result<Value, LoadError>;

/// 加载拦截器
///
/// 实现方必须最多调用一次 `load`，并原样返回其结果
/// （循环返回时可以换成读拦截包装）。
pub trait LoadHook {
    fn on_load(&self, request: &LoadRequest<'_>, load: &mut dyn FnMut() -> LoadResult) -> LoadResult;
}

/// 宿主侧的挂钩点
pub trait HookPoint {
    /// 安装拦截器，返回之前安装的那个
    fn install_hook(&self, hook: Rc<dyn LoadHook>) -> Option<Rc<dyn LoadHook>>;

    /// 恢复之前的拦截器（None 表示原始解析）
    fn restore_hook(&self, previous: Option<Rc<dyn LoadHook>>);
}
