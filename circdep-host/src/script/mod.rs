//! modscript：`.mod` 模块脚本
//!
//! ```text
//! # x.mod
//! export a = 1
//! let y = require "./y"
//! export b = 2
//! ```

pub mod ast;
pub mod interp;
pub mod parser;

pub use ast::{Expr, Line, Script, Stmt};
pub use interp::{execute, ModuleContext};
pub use parser::{parse, ParseError};
