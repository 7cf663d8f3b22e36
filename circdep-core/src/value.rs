//! 模块值模型
//!
//! 模块导出值：原始值按值比较，对象按引用共享、按身份比较。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// 2^53：整数按整数格式输出的上限
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// 导出对象接口
///
/// 宿主的普通对象和读拦截包装都实现这个 trait，
/// 导入方无法区分两者。
pub trait ExportsObject {
    /// 读取属性；不存在时返回 `Value::Undefined`
    fn get(&self, key: &str) -> Value;

    /// 写入属性（新键追加到键序末尾）
    fn set(&self, key: &str, value: Value);

    /// 删除属性，返回是否存在过
    fn remove(&self, key: &str) -> bool;

    /// 当前键序列（插入顺序）
    fn keys(&self) -> Vec<String>;

    /// 是否存在该属性
    fn has(&self, key: &str) -> bool {
        self.keys().iter().any(|k| k == key)
    }
}

/// 对象引用
pub type ObjectRef = Rc<dyn ExportsObject>;

/// 模块值
#[derive(Clone)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Object(ObjectRef),
}

impl Value {
    /// 创建新的空对象
    pub fn object() -> Self {
        Value::Object(Rc::new(PlainObject::new()))
    }

    /// 创建字符串值
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// 对象的键序列；非对象返回空
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(obj) => obj.keys(),
            _ => Vec::new(),
        }
    }

    /// 类型名称（用于错误信息）
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }
}

/// 严格相等：原始值按值，对象按身份
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => same_object(x, y),
        _ => false,
    }
}

/// 对象身份比较（忽略 vtable 元数据）
pub fn same_object(a: &ObjectRef, b: &ObjectRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => write!(f, "{}", *n as i64),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            // 只展开一层键，导出对象之间可能互相引用
            Value::Object(obj) => write!(f, "{{{}}}", obj.keys().join(", ")),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(obj) => write!(f, "Object@{:p}{{{}}}", Rc::as_ptr(obj), obj.keys().join(", ")),
            other => write!(f, "{other}"),
        }
    }
}

/// 普通对象：按插入顺序保存属性
#[derive(Default)]
pub struct PlainObject {
    props: RefCell<Vec<(String, Value)>>,
}

impl PlainObject {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExportsObject for PlainObject {
    fn get(&self, key: &str) -> Value {
        self.props
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or(Value::Undefined)
    }

    fn set(&self, key: &str, value: Value) {
        let mut props = self.props.borrow_mut();
        match props.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => props.push((key.to_string(), value)),
        }
    }

    fn remove(&self, key: &str) -> bool {
        let mut props = self.props.borrow_mut();
        let before = props.len();
        props.retain(|(k, _)| k != key);
        props.len() != before
    }

    fn keys(&self) -> Vec<String> {
        self.props.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    fn has(&self, key: &str) -> bool {
        self.props.borrow().iter().any(|(k, _)| k == key)
    }
}
