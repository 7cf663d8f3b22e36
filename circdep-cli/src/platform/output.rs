//! CLI 格式化输出
//!
//! 文本模式逐条打印问题；JSON 模式每个入口输出一个文档。

use std::path::Path;

use circdep_api::{CircdepError, EntryReport};
use circdep_core::DetectError;
use serde_json::json;

/// 入口开始提示
pub fn print_start(file: &Path) {
    println!("Start detecting entrypoint: {}", file.display());
}

/// 文本格式的入口结果
pub fn format_report(report: &EntryReport) -> String {
    if report.is_clean() {
        let suffix = if report.filter.is_some() { " [filtered]" } else { "" };
        return format!("✓ No Problems for Circular Dependencies found!{suffix}");
    }
    report
        .problems
        .iter()
        .map(|problem| format!("✗  {}", problem.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 文本格式的错误
pub fn format_error(error: &CircdepError) -> String {
    match error {
        CircdepError::Detect(DetectError::Resolution { entry, .. }) => {
            format!("⚠️  Cannot find module {}", entry.display())
        }
        other => format!("⚠️  {other}"),
    }
}

/// JSON 格式的入口结果
pub fn print_json(report: &EntryReport) {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}

/// JSON 格式的错误
pub fn print_json_error(file: &Path, error: &CircdepError) {
    let document = json!({
        "entry": file.display().to_string(),
        "error": error.to_report(),
    });
    println!("{document:#}");
}
