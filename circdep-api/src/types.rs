//! API 类型定义
//!
//! 检测结果的可序列化视图。

use std::path::PathBuf;

use circdep_core::{Category, ProblemRecord};
use serde::Serialize;

/// 缺失属性细节
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingPropertyReport {
    pub name: String,
    /// 最终导出中的值（展示形式）
    pub expected_value: String,
}

/// 一条问题报告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemReport {
    pub file: String,
    pub stack: Vec<String>,
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_property: Option<MissingPropertyReport>,
    /// 人类可读描述（含循环路径）
    pub message: String,
}

impl ProblemReport {
    pub fn from_record(record: &ProblemRecord) -> Self {
        let stack: Vec<String> = record.stack.iter().map(|p| p.to_string()).collect();
        let missing_property = record.missing_property().map(|(name, value)| MissingPropertyReport {
            name: name.to_string(),
            expected_value: value.to_string(),
        });
        let message = describe(record.category, &stack, missing_property.as_ref());
        Self {
            file: record.file.to_string(),
            stack,
            category: record.category.as_str(),
            missing_property,
            message,
        }
    }
}

fn describe(category: Category, stack: &[String], missing: Option<&MissingPropertyReport>) -> String {
    let first = stack.first().map(String::as_str).unwrap_or("");
    let last = stack.last().map(String::as_str).unwrap_or("");
    let headline = match (category, missing) {
        (Category::MissingProperty, Some(missing)) => {
            format!("Can't find a property: {} at {} (It causes problems)", missing.name, last)
        }
        (Category::ExportsNotIdentical, _) => {
            format!("The exports of {first} is empty when it is required at {last} (It causes problems)")
        }
        (Category::IncompleteExports, _) => format!(
            "The exports of {first} is not complete when it is required at {last} (It doesn't cause problems but maybe in future)"
        ),
        _ => format!("Circular requiring of {first}"),
    };
    format!("{headline}\n    Circular Path: {}", stack.join(" > "))
}

/// 单个入口的检测结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    /// 入口文件（绝对路径）
    pub entry: PathBuf,
    /// 生效的过滤器名称；`None` 表示不过滤
    pub filter: Option<&'static str>,
    pub problems: Vec<ProblemReport>,
}

impl EntryReport {
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}
