//! modscript 解释器
//!
//! 顺序执行语句。`require` 与导出值的读写都委托给 `ModuleContext`，
//! 由运行时提供缓存和拦截器语义。

use std::collections::HashMap;
use std::path::Path;

use circdep_core::{LoadError, LoadResult, Value};

use super::ast::{Expr, Script, Stmt};

/// 模块体执行时可用的宿主能力
pub trait ModuleContext {
    /// 当前模块文件
    fn file(&self) -> &Path;

    /// 从当前模块加载另一个模块
    fn require(&self, specifier: &str) -> LoadResult;

    /// 当前导出值
    fn exports(&self) -> Value;

    /// 整体替换导出值
    fn set_exports(&self, value: Value);
}

/// 执行一个模块体
///
/// # Errors
/// 嵌套加载的错误原样返回；本模块内的求值错误包装为 `LoadError::Runtime`。
pub fn execute(script: &Script, ctx: &dyn ModuleContext) -> Result<(), LoadError> {
    let mut scope: HashMap<String, Value> = HashMap::new();

    for line in &script.lines {
        let fail = |message: String| LoadError::Runtime {
            path: ctx.file().to_path_buf(),
            message: format!("line {}: {message}", line.line),
        };

        match &line.stmt {
            Stmt::Let { name, value } => {
                let value = eval(value, &scope, ctx).map_err(|e| e.into_load_error(&fail))?;
                scope.insert(name.clone(), value);
            }
            Stmt::Export { key, value } => {
                let value = eval(value, &scope, ctx).map_err(|e| e.into_load_error(&fail))?;
                let exports = ctx.exports();
                let Some(target) = exports.as_object() else {
                    return Err(fail(format!(
                        "cannot export '{key}': exports is {}",
                        exports.type_name()
                    )));
                };
                target.set(key, value);
            }
            Stmt::SetExports(value) => {
                let value = eval(value, &scope, ctx).map_err(|e| e.into_load_error(&fail))?;
                ctx.set_exports(value);
            }
            Stmt::Read(value) => {
                eval(value, &scope, ctx).map_err(|e| e.into_load_error(&fail))?;
            }
            Stmt::Require(specifier) => {
                ctx.require(specifier)?;
            }
        }
    }
    Ok(())
}

/// 求值失败：嵌套加载错误或本地错误
enum EvalError {
    Load(LoadError),
    Local(String),
}

impl EvalError {
    fn into_load_error(self, local: &impl Fn(String) -> LoadError) -> LoadError {
        match self {
            EvalError::Load(error) => error,
            EvalError::Local(message) => local(message),
        }
    }
}

fn eval(expr: &Expr, scope: &HashMap<String, Value>, ctx: &dyn ModuleContext) -> Result<Value, EvalError> {
    let value = match expr {
        Expr::Number(n) => Value::Number(*n),
        Expr::Str(s) => Value::string(s),
        Expr::Bool(b) => Value::Bool(*b),
        Expr::Null => Value::Null,
        Expr::Undefined => Value::Undefined,
        Expr::Object => Value::object(),
        Expr::Ident(name) if name == "exports" => ctx.exports(),
        Expr::Ident(name) => scope
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::Local(format!("'{name}' is not defined")))?,
        Expr::Require(specifier) => ctx.require(specifier).map_err(EvalError::Load)?,
        Expr::Member { object, property } => {
            let target = eval(object, scope, ctx)?;
            match target.as_object() {
                Some(obj) => obj.get(property),
                None => {
                    return Err(EvalError::Local(format!(
                        "cannot read property '{property}' of {}",
                        target.type_name()
                    )))
                }
            }
        }
    };
    Ok(value)
}
