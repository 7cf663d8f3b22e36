//! 平台相关功能

pub mod output;

pub use output::{format_error, format_report, print_json, print_json_error, print_start};
