//! 集成测试
//!
//! 从 API 层检测完整项目，验证各类循环依赖的报告。

mod common;

use circdep_workspace::{check_entries, CircdepError, Filter};
use common::{check, run_config, summary, ROOT};
use std::path::PathBuf;
use std::rc::Rc;

const CYCLE_INCOMPLETE: &[(&str, &str)] = &[
    ("a.mod", "require \"./b\"\nexport ready = true\n"),
    ("b.mod", "let a = require \"./a\"\n"),
];

const CYCLE_REPLACED: &[(&str, &str)] = &[
    ("a.mod", "require \"./b\"\nexports = {}\nexport run = true\n"),
    ("b.mod", "let a = require \"./a\"\n"),
];

const CYCLE_MISSING: &[(&str, &str)] = &[
    ("x.mod", "require \"./y\"\nexport b = 2\n"),
    ("y.mod", "let x = require \"./x\"\nread x.b\n"),
];

// ==================== 过滤器 ====================

#[test]
fn test_default_filter_reports_problems_only() {
    assert!(summary(CYCLE_INCOMPLETE, "a.mod", Some(Filter::Problems)).is_empty());
    assert_eq!(
        summary(CYCLE_REPLACED, "a.mod", Some(Filter::Problems)),
        vec![("a".to_string(), "EXPORTS_NOT_IDENTICAL")]
    );
}

#[test]
fn test_sync_empty_filter() {
    assert_eq!(
        summary(CYCLE_INCOMPLETE, "a.mod", Some(Filter::SyncEmpty)),
        vec![("a".to_string(), "INCOMPLETE_EXPORTS")]
    );
    assert!(summary(CYCLE_REPLACED, "a.mod", Some(Filter::SyncEmpty)).is_empty());
}

#[test]
fn test_always_empty_filter() {
    assert!(summary(CYCLE_INCOMPLETE, "a.mod", Some(Filter::AlwaysEmpty)).is_empty());
    assert_eq!(summary(CYCLE_REPLACED, "a.mod", Some(Filter::AlwaysEmpty)).len(), 1);
}

#[test]
fn test_unfiltered_reports_every_cycle() {
    assert_eq!(summary(CYCLE_INCOMPLETE, "a.mod", None).len(), 1);
    assert_eq!(summary(CYCLE_REPLACED, "a.mod", None).len(), 1);
    assert_eq!(summary(CYCLE_MISSING, "x.mod", None).len(), 1);
}

// ==================== 缺失属性 ====================

#[test]
fn test_missing_property_report() {
    let report = check(CYCLE_MISSING, "x.mod", Some(Filter::MissingProperties)).unwrap();
    assert_eq!(report.problems.len(), 1);

    let problem = &report.problems[0];
    assert_eq!(problem.file, "x");
    assert_eq!(problem.stack, vec!["x", "y"]);
    assert_eq!(problem.category, "MISSING_PROPERTY");

    let missing = problem.missing_property.as_ref().unwrap();
    assert_eq!(missing.name, "b");
    assert_eq!(missing.expected_value, "2");
    assert!(problem.message.starts_with("Can't find a property: b at y"));
    assert!(problem.message.ends_with("Circular Path: x > y"));
}

#[test]
fn test_read_after_export_is_not_missing() {
    let files = &[
        ("x.mod", "export b = 2\nrequire \"./y\"\n"),
        ("y.mod", "let x = require \"./x\"\nread x.b\n"),
    ];
    assert!(summary(files, "x.mod", Some(Filter::MissingProperties)).is_empty());
    assert!(summary(files, "x.mod", Some(Filter::Problems)).is_empty());
}

// ==================== 项目结构 ====================

#[test]
fn test_nested_directories_and_indirect_cycle() {
    let files = &[
        ("src/main.mod", "require \"./lib/a\"\n"),
        ("src/lib/a.mod", "require \"./b\"\nexport a = 1\n"),
        ("src/lib/b.mod", "require \"../util/c\"\n"),
        ("src/util/c.mod", "let a = require \"../lib/a\"\n"),
    ];
    let report = check(files, "src/main.mod", None).unwrap();
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].file, "src/lib/a");
    assert_eq!(report.problems[0].stack, vec!["src/lib/a", "src/lib/b", "src/util/c"]);
    assert_eq!(report.entry, PathBuf::from(ROOT).join("src/main.mod"));
}

#[test]
fn test_vendored_cycles_are_ignored() {
    let files = &[
        ("main.mod", "require \"pkg\"\n"),
        ("node_modules/pkg.mod", "require \"./inner\"\nexports = {}\n"),
        ("node_modules/inner.mod", "require \"./pkg\"\n"),
    ];
    assert!(summary(files, "main.mod", None).is_empty());
}

#[test]
fn test_acyclic_diamond() {
    let files = &[
        ("main.mod", "require \"./left\"\nrequire \"./right\"\n"),
        ("left.mod", "let s = require \"./shared\"\nread s.v\n"),
        ("right.mod", "let s = require \"./shared\"\nread s.v\n"),
        ("shared.mod", "export v = 1\n"),
    ];
    assert!(summary(files, "main.mod", None).is_empty());
}

// ==================== 错误 ====================

#[test]
fn test_missing_entry() {
    let err = check(CYCLE_INCOMPLETE, "nope.mod", None).unwrap_err();
    assert_eq!(err.kind(), "resolution");
}

#[test]
fn test_missing_dependency_names_specifier() {
    let files = &[("main.mod", "require \"./gone\"\n")];
    let err = check(files, "main.mod", None).unwrap_err();
    assert!(matches!(err, CircdepError::Load(_)));
    assert_eq!(err.kind(), "not_found");
    assert!(err.to_string().contains("./gone"));
}

#[test]
fn test_runtime_error_report_serializes() {
    let files = &[("main.mod", "read missing.x\n")];
    let err = check(files, "main.mod", None).unwrap_err();
    assert_eq!(err.kind(), "runtime");

    let json: serde_json::Value = serde_json::from_str(&err.to_report().to_json()).unwrap();
    assert_eq!(json["kind"], "runtime");
    assert!(json["message"].as_str().unwrap().contains("'missing' is not defined"));
}

// ==================== 多入口 ====================

#[test]
fn test_entries_do_not_share_state() {
    let fs = Rc::new(common::project(&[
        ("a.mod", "require \"./b\"\nexport k = 1\n"),
        ("b.mod", "let a = require \"./a\"\n"),
        ("c.mod", "export c = 1\n"),
    ]));
    let entries = vec![
        PathBuf::from("a.mod"),
        PathBuf::from("missing.mod"),
        PathBuf::from("a.mod"),
        PathBuf::from("c.mod"),
    ];
    let results = check_entries(fs, &entries, &run_config(None));

    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap().problems.len(), 1);
    assert!(results[1].is_err());
    assert_eq!(results[0].as_ref().unwrap(), results[2].as_ref().unwrap());
    assert!(results[3].as_ref().unwrap().is_clean());
}

#[test]
fn test_report_json_shape() {
    let report = check(CYCLE_REPLACED, "a.mod", Some(Filter::Problems)).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["filter"], "problems");
    assert_eq!(json["problems"][0]["category"], "EXPORTS_NOT_IDENTICAL");
    assert_eq!(json["problems"][0]["stack"], serde_json::json!(["a", "b"]));
    assert!(json["problems"][0].get("missing_property").is_none());
}
