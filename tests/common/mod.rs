//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数：在内存文件系统上搭建项目并检测入口。

#![allow(dead_code)]

use circdep_workspace::{check_entry, CircdepError, DetectorConfig, EntryReport, Filter, MemoryFs, RunConfig};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// 测试项目根目录
pub const ROOT: &str = "/project";

/// 创建测试用的内存文件系统（路径相对 ROOT）
pub fn project(files: &[(&str, &str)]) -> MemoryFs {
    MemoryFs::with_files(
        files
            .iter()
            .map(|(path, content)| (PathBuf::from(ROOT).join(path), *content)),
    )
}

/// 默认检测配置
pub fn run_config(filter: Option<Filter>) -> RunConfig {
    RunConfig::new(DetectorConfig {
        root: Some(PathBuf::from(ROOT)),
        ..DetectorConfig::default()
    })
    .with_filter(filter)
}

/// 检测入口
pub fn check(files: &[(&str, &str)], entry: &str, filter: Option<Filter>) -> Result<EntryReport, CircdepError> {
    let fs = project(files);
    check_entry(Rc::new(fs), Path::new(entry), &run_config(filter))
}

/// 检测入口并返回 (file, category) 列表
pub fn summary(files: &[(&str, &str)], entry: &str, filter: Option<Filter>) -> Vec<(String, &'static str)> {
    check(files, entry, filter)
        .expect("detection failed")
        .problems
        .into_iter()
        .map(|p| (p.file, p.category))
        .collect()
}
