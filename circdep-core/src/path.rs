//! 模块路径规范化
//!
//! `ModulePath` 是账本的唯一键：相对项目根目录、去掉扩展名、
//! 统一使用 `/` 分隔。规范化之后按字符串精确比较。

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// 规范化的模块路径
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
    /// 从文件路径构造
    ///
    /// # Arguments
    /// * `file` - 模块文件路径（绝对路径，或相对 `root`）
    /// * `root` - 项目根目录
    /// * `extensions` - 需要去掉的扩展名（如 ".mod"）
    pub fn normalize(file: &Path, root: &Path, extensions: &[String]) -> Self {
        let file = lexical_clean(&root.join(file));
        let root = lexical_clean(root);
        let relative = relative_to(&file, &root);

        let mut text = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/");

        if let Some(ext) = extensions.iter().find(|ext| !ext.is_empty() && text.ends_with(ext.as_str())) {
            text.truncate(text.len() - ext.len());
        }

        ModulePath(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModulePath {
    fn from(s: &str) -> Self {
        ModulePath(s.to_string())
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 相对说明符：`.`、`..`、`./x`、`../x`
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// 词法层面去掉 `.` 和 `..`（不访问文件系统）
pub fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// 计算 `path` 相对 `base` 的路径，不在 `base` 下时用 `..` 上溯
fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path_parts: Vec<_> = path.components().collect();
    let base_parts: Vec<_> = base.components().collect();

    let common = path_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in common..base_parts.len() {
        out.push("..");
    }
    for part in &path_parts[common..] {
        out.push(part.as_os_str());
    }
    out
}
