//! 测试辅助工具
//!
//! 一个最小的同步模块宿主：模块体是 Rust 闭包，缓存语义与真实宿主一致
//! （先入缓存再执行模块体，循环进入时返回部分导出）。

#![allow(dead_code)]

use circdep_core::{HookPoint, LoadError, LoadHook, LoadRequest, LoadResult, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const ROOT: &str = "/p";

/// 模块体
pub type Body = Rc<dyn Fn(&ModuleCtx<'_>) -> Result<(), LoadError>>;

struct ModuleRecord {
    exports: RefCell<Value>,
}

/// 闭包驱动的测试宿主
#[derive(Default)]
pub struct FakeHost {
    hook: RefCell<Option<Rc<dyn LoadHook>>>,
    bodies: RefCell<HashMap<PathBuf, Body>>,
    cache: RefCell<HashMap<PathBuf, Rc<ModuleRecord>>>,
}

/// 模块体可用的上下文
pub struct ModuleCtx<'a> {
    host: &'a FakeHost,
    file: PathBuf,
}

impl ModuleCtx<'_> {
    pub fn require(&self, specifier: &str) -> LoadResult {
        self.host.load(specifier, Some(&self.file))
    }

    /// 在当前导出对象上设置属性
    pub fn export(&self, key: &str, value: Value) {
        let exports = self.exports();
        if let Some(obj) = exports.as_object() {
            obj.set(key, value);
        }
    }

    /// 整体替换导出值
    pub fn replace_exports(&self, value: Value) {
        if let Some(record) = self.host.cache.borrow().get(&self.file) {
            *record.exports.borrow_mut() = value;
        }
    }

    pub fn exports(&self) -> Value {
        self.host
            .cache
            .borrow()
            .get(&self.file)
            .map(|record| record.exports.borrow().clone())
            .unwrap_or(Value::Undefined)
    }
}

/// 读取对象属性（测试模块体里的同步访问）
pub fn read(value: &Value, key: &str) -> Value {
    value.as_object().map(|obj| obj.get(key)).unwrap_or(Value::Undefined)
}

pub fn file(name: &str) -> PathBuf {
    PathBuf::from(format!("{ROOT}/{name}.mod"))
}

impl FakeHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn define(&self, name: &str, body: impl Fn(&ModuleCtx<'_>) -> Result<(), LoadError> + 'static) {
        self.bodies.borrow_mut().insert(file(name), Rc::new(body));
    }

    /// 加载入口模块
    pub fn require_entry(&self, name: &str) -> LoadResult {
        let path = file(name);
        self.load(&path.to_string_lossy(), None)
    }

    fn resolve(&self, specifier: &str, requester: Option<&Path>) -> PathBuf {
        if let Some(rest) = specifier.strip_prefix("./") {
            let dir = requester.and_then(Path::parent).unwrap_or(Path::new(ROOT));
            return dir.join(format!("{rest}.mod"));
        }
        if Path::new(specifier).is_absolute() {
            return PathBuf::from(specifier);
        }
        PathBuf::from(format!("{ROOT}/vendor/{specifier}.mod"))
    }

    pub fn load(&self, specifier: &str, requester: Option<&Path>) -> LoadResult {
        let resolved = self.resolve(specifier, requester);
        let request = LoadRequest {
            specifier,
            resolved: &resolved,
            requester,
        };
        let hook = self.hook.borrow().clone();
        match hook {
            Some(hook) => hook.on_load(&request, &mut || self.raw_load(&resolved)),
            None => self.raw_load(&resolved),
        }
    }

    fn raw_load(&self, resolved: &Path) -> LoadResult {
        if let Some(record) = self.cache.borrow().get(resolved) {
            return Ok(record.exports.borrow().clone());
        }
        let body = self
            .bodies
            .borrow()
            .get(resolved)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                specifier: resolved.display().to_string(),
                tried: vec![resolved.to_path_buf()],
            })?;
        let record = Rc::new(ModuleRecord {
            exports: RefCell::new(Value::object()),
        });
        self.cache.borrow_mut().insert(resolved.to_path_buf(), Rc::clone(&record));
        let ctx = ModuleCtx {
            host: self,
            file: resolved.to_path_buf(),
        };
        if let Err(error) = body(&ctx) {
            self.cache.borrow_mut().remove(resolved);
            return Err(error);
        }
        let exports = record.exports.borrow().clone();
        Ok(exports)
    }
}

impl HookPoint for FakeHost {
    fn install_hook(&self, hook: Rc<dyn LoadHook>) -> Option<Rc<dyn LoadHook>> {
        self.hook.borrow_mut().replace(hook)
    }

    fn restore_hook(&self, previous: Option<Rc<dyn LoadHook>>) {
        *self.hook.borrow_mut() = previous;
    }
}
