//! 延迟属性校验
//!
//! 循环返回的导出值会被包成 `ReadInterposer` 交给导入方。
//! 所有操作原样转发；每次属性读取额外记下一条待校验读取，
//! 等最终导出确定后再比较。

use std::rc::Rc;

use crate::ledger::ExportSnapshot;
use crate::path::ModulePath;
use crate::problem::{Category, ProblemDetail, ProblemRecord};
use crate::value::{same_value, ExportsObject, ObjectRef, Value};

/// 一次循环窗口内的属性读取
#[derive(Debug, Clone)]
pub struct PendingRead {
    pub module: ModulePath,
    pub property: String,
    /// 读取当时得到的值
    pub value: Value,
    /// 产生该循环返回的加载链
    pub stack: Rc<[ModulePath]>,
}

/// 读取记录回调
pub type ReadLog = Rc<dyn Fn(PendingRead)>;

/// 读拦截包装
pub struct ReadInterposer {
    target: ObjectRef,
    module: ModulePath,
    stack: Rc<[ModulePath]>,
    log: ReadLog,
}

impl ReadInterposer {
    /// 包装循环返回值；非对象值无法拦截，原样返回
    pub fn wrap(value: Value, module: ModulePath, stack: Vec<ModulePath>, log: ReadLog) -> Value {
        match value {
            Value::Object(target) => Value::Object(Rc::new(ReadInterposer {
                target,
                module,
                stack: stack.into(),
                log,
            })),
            other => other,
        }
    }
}

impl ExportsObject for ReadInterposer {
    fn get(&self, key: &str) -> Value {
        let value = self.target.get(key);
        (self.log)(PendingRead {
            module: self.module.clone(),
            property: key.to_string(),
            value: value.clone(),
            stack: Rc::clone(&self.stack),
        });
        value
    }

    fn set(&self, key: &str, value: Value) {
        self.target.set(key, value);
    }

    fn remove(&self, key: &str) -> bool {
        self.target.remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.target.keys()
    }

    fn has(&self, key: &str) -> bool {
        self.target.has(key)
    }
}

/// 校验结果
#[derive(Debug)]
pub enum Validation {
    /// 读取值与最终值一致
    Match,
    /// 不一致（包括最终导出里已经没有该属性）
    Mismatch(ProblemRecord),
    /// 模块至今未结算，无法判断
    Unsettled,
}

/// 用最终导出校验一次读取
pub fn validate(read: &PendingRead, settled: Option<&ExportSnapshot>) -> Validation {
    let Some(settled) = settled else {
        return Validation::Unsettled;
    };
    let actual = match &settled.value {
        Value::Object(obj) => obj.get(&read.property),
        _ => Value::Undefined,
    };
    if same_value(&actual, &read.value) {
        return Validation::Match;
    }
    Validation::Mismatch(ProblemRecord {
        file: read.module.clone(),
        stack: read.stack.to_vec(),
        category: Category::MissingProperty,
        detail: ProblemDetail::MissingProperty {
            name: read.property.clone(),
            expected_value: actual,
        },
    })
}
