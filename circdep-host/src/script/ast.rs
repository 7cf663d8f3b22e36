//! modscript 语法树

/// 表达式
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Undefined,
    /// `{}`：新的空对象
    Object,
    /// 变量引用（`exports` 指当前导出值）
    Ident(String),
    /// `require "./a"`
    Require(String),
    /// `a.b`
    Member { object: Box<Expr>, property: String },
}

/// 语句
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let NAME = EXPR`
    Let { name: String, value: Expr },
    /// `export KEY = EXPR`
    Export { key: String, value: Expr },
    /// `exports = EXPR`
    SetExports(Expr),
    /// `read EXPR`：求值并丢弃（触发属性读取）
    Read(Expr),
    /// `require "SPEC"`
    Require(String),
}

/// 带行号的语句
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 从 1 开始
    pub line: usize,
    pub stmt: Stmt,
}

/// 整个模块
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    pub lines: Vec<Line>,
}

impl Script {
    /// 模块中出现的全部 `require` 说明符（按出现顺序，可能重复）
    pub fn requires(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for line in &self.lines {
            match &line.stmt {
                Stmt::Require(spec) => out.push(spec.as_str()),
                Stmt::Let { value, .. } | Stmt::Export { value, .. } | Stmt::SetExports(value) | Stmt::Read(value) => {
                    collect_requires(value, &mut out)
                }
            }
        }
        out
    }
}

fn collect_requires<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::Require(spec) => out.push(spec),
        Expr::Member { object, .. } => collect_requires(object, out),
        _ => {}
    }
}
