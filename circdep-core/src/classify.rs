//! 完整性分类
//!
//! 模块结算时，把每一次循环观察与最终导出比较。

use tracing::trace;

use crate::ledger::{CycleEntry, ExportSnapshot};
use crate::path::ModulePath;
use crate::problem::{Category, ProblemDetail, ProblemRecord};
use crate::value::same_value;

const TARGET: &str = "circdep::ledger";

/// 比较一次观察与最终导出
pub fn classify(observed: &ExportSnapshot, settled: &ExportSnapshot) -> Category {
    if !same_value(&observed.value, &settled.value) {
        Category::ExportsNotIdentical
    } else if observed.keys != settled.keys {
        Category::IncompleteExports
    } else {
        Category::Circular
    }
}

/// 对结算模块的全部循环观察分类
///
/// 同一模块在结算前被多次循环进入时，只保留最后一次观察的分类。
pub fn classify_settlement(
    file: &ModulePath,
    cycles: &[CycleEntry],
    settled: &ExportSnapshot,
) -> Option<ProblemRecord> {
    let mut last = None;
    for entry in cycles {
        let category = classify(&entry.snapshot, settled);
        trace!(target: TARGET, module = %file, %category, observed_keys = entry.snapshot.keys.len(), "classified");
        last = Some(ProblemRecord {
            file: file.clone(),
            stack: entry.stack.clone(),
            category,
            detail: ProblemDetail::None,
        });
    }
    last
}
