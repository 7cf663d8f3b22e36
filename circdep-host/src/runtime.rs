//! 同步模块运行时
//!
//! 持有模块缓存和加载拦截器槽位：
//! 1. 解析说明符
//! 2. 有拦截器时经由拦截器调用原始加载
//! 3. 原始加载：命中缓存直接返回当前导出；否则读源码、解析，
//!    先入缓存再执行模块体，失败则移出缓存
//!
//! 先入缓存保证循环进入时拿到的是部分导出。

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use circdep_config::DetectorConfig;
use circdep_core::path::lexical_clean;
use circdep_core::{HookPoint, LoadError, LoadHook, LoadRequest, LoadResult, Value};
use tracing::{debug, trace};

use crate::fs::SourceFs;
use crate::resolver::Resolver;
use crate::script::{self, ModuleContext};

const TARGET: &str = "circdep::host";

/// 缓存中的模块
struct ModuleRecord {
    exports: RefCell<Value>,
}

/// 模块运行时
pub struct Runtime {
    fs: Rc<dyn SourceFs>,
    resolver: Resolver,
    cache: RefCell<HashMap<PathBuf, Rc<ModuleRecord>>>,
    hook: RefCell<Option<Rc<dyn LoadHook>>>,
}

impl Runtime {
    pub fn new(fs: Rc<dyn SourceFs>, config: &DetectorConfig) -> Self {
        let resolver = Resolver::new(Rc::clone(&fs), config);
        Self {
            fs,
            resolver,
            cache: RefCell::new(HashMap::new()),
            hook: RefCell::new(None),
        }
    }

    /// 项目根目录
    pub fn root(&self) -> &Path {
        self.resolver.root()
    }

    /// 解析说明符（不加载）
    pub fn resolve(&self, specifier: &str, requester: Option<&Path>) -> Result<PathBuf, LoadError> {
        self.resolver.resolve(specifier, requester)
    }

    /// 加载入口模块
    ///
    /// 相对路径按项目根目录补全为绝对路径。
    pub fn require_entry(&self, entry: &Path) -> LoadResult {
        let absolute = lexical_clean(&self.root().join(entry));
        self.load(&absolute.to_string_lossy(), None)
    }

    /// 从 `requester` 加载 `specifier`
    pub fn load(&self, specifier: &str, requester: Option<&Path>) -> LoadResult {
        let resolved = self.resolver.resolve(specifier, requester)?;
        let request = LoadRequest {
            specifier,
            resolved: &resolved,
            requester,
        };
        let hook = self.hook.borrow().clone();
        match hook {
            Some(hook) => hook.on_load(&request, &mut || self.load_resolved(&resolved)),
            None => self.load_resolved(&resolved),
        }
    }

    /// 模块是否在缓存中（包括正在初始化的）
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.borrow().contains_key(path)
    }

    /// 缓存中的模块数
    pub fn cached_count(&self) -> usize {
        self.cache.borrow().len()
    }

    fn load_resolved(&self, path: &Path) -> LoadResult {
        let cached = self.cache.borrow().get(path).cloned();
        if let Some(record) = cached {
            trace!(target: TARGET, path = %path.display(), "cache hit");
            let exports = record.exports.borrow().clone();
            return Ok(exports);
        }

        let source = self.fs.read_to_string(path).map_err(|e| LoadError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let parsed = script::parse(&source).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            line: e.line,
            message: e.message,
        })?;

        let record = Rc::new(ModuleRecord {
            exports: RefCell::new(Value::object()),
        });
        self.cache.borrow_mut().insert(path.to_path_buf(), Rc::clone(&record));
        debug!(target: TARGET, path = %path.display(), "executing module");

        let ctx = Context {
            runtime: self,
            file: path,
            record: &record,
        };
        if let Err(error) = script::execute(&parsed, &ctx) {
            self.cache.borrow_mut().remove(path);
            debug!(target: TARGET, path = %path.display(), %error, "module failed, evicted from cache");
            return Err(error);
        }

        let exports = record.exports.borrow().clone();
        Ok(exports)
    }
}

impl HookPoint for Runtime {
    fn install_hook(&self, hook: Rc<dyn LoadHook>) -> Option<Rc<dyn LoadHook>> {
        self.hook.borrow_mut().replace(hook)
    }

    fn restore_hook(&self, previous: Option<Rc<dyn LoadHook>>) {
        *self.hook.borrow_mut() = previous;
    }
}

/// 模块体执行上下文
struct Context<'a> {
    runtime: &'a Runtime,
    file: &'a Path,
    record: &'a ModuleRecord,
}

impl ModuleContext for Context<'_> {
    fn file(&self) -> &Path {
        self.file
    }

    fn require(&self, specifier: &str) -> LoadResult {
        self.runtime.load(specifier, Some(self.file))
    }

    fn exports(&self) -> Value {
        self.record.exports.borrow().clone()
    }

    fn set_exports(&self, value: Value) {
        *self.record.exports.borrow_mut() = value;
    }
}
