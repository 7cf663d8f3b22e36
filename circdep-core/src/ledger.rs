//! 观察账本
//!
//! 每个模块路径记录两类快照：
//! - 循环返回时的部分导出（模块仍在初始化中）
//! - 第一次非循环返回时的最终导出（只设置一次）

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::path::ModulePath;
use crate::value::Value;

const TARGET: &str = "circdep::ledger";

/// 导出快照：值本身 + 当时的键序列
#[derive(Debug, Clone)]
pub struct ExportSnapshot {
    pub value: Value,
    pub keys: Vec<String>,
}

impl ExportSnapshot {
    /// 记录值和它此刻的键
    pub fn capture(value: &Value) -> Self {
        Self {
            value: value.clone(),
            keys: value.keys(),
        }
    }
}

/// 一次循环返回的观察
#[derive(Debug, Clone)]
pub struct CycleEntry {
    pub snapshot: ExportSnapshot,
    /// 当时的加载链（由外到内，以循环边界开头）
    pub stack: Vec<ModulePath>,
}

#[derive(Debug, Default)]
struct ModuleEntry {
    cycles: Vec<CycleEntry>,
    settled: Option<ExportSnapshot>,
}

/// 模块结算结果
#[derive(Debug)]
pub struct Settlement<'a> {
    pub final_exports: &'a ExportSnapshot,
    /// 结算前积累的循环观察（已从账本移出）
    pub cycles: Vec<CycleEntry>,
}

/// 观察账本
#[derive(Debug, Default)]
pub struct Ledger {
    modules: HashMap<ModulePath, ModuleEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次循环返回
    ///
    /// 已结算的模块不再记录，返回 false。
    pub fn observe_cyclic(&mut self, path: &ModulePath, snapshot: ExportSnapshot, stack: Vec<ModulePath>) -> bool {
        let entry = self.modules.entry(path.clone()).or_default();
        if entry.settled.is_some() {
            trace!(target: TARGET, module = %path, "already settled, cyclic return ignored");
            return false;
        }
        debug!(target: TARGET, module = %path, keys = snapshot.keys.len(), "cyclic return recorded");
        entry.cycles.push(CycleEntry { snapshot, stack });
        true
    }

    /// 记录一次权威（非循环）返回
    ///
    /// 只有第一次生效：设置最终导出，并交出之前积累的循环观察。
    /// 已结算时返回 None。
    pub fn settle(&mut self, path: &ModulePath, snapshot: ExportSnapshot) -> Option<Settlement<'_>> {
        let entry = self.modules.entry(path.clone()).or_default();
        if entry.settled.is_some() {
            return None;
        }
        trace!(target: TARGET, module = %path, keys = snapshot.keys.len(), "settled");
        let cycles = std::mem::take(&mut entry.cycles);
        let final_exports = entry.settled.insert(snapshot);
        Some(Settlement { final_exports, cycles })
    }

    /// 丢弃未结算模块的循环观察（模块加载失败时）
    ///
    /// 已结算的模块保持不变。返回丢弃的观察数。
    pub fn discard(&mut self, path: &ModulePath) -> usize {
        let unsettled = self.modules.get(path).is_some_and(|entry| entry.settled.is_none());
        if !unsettled {
            return 0;
        }
        let dropped = self.modules.remove(path).map_or(0, |entry| entry.cycles.len());
        debug!(target: TARGET, module = %path, dropped, "unsettled observations discarded");
        dropped
    }

    /// 最终导出（未结算时为 None）
    pub fn final_exports(&self, path: &ModulePath) -> Option<&ExportSnapshot> {
        self.modules.get(path)?.settled.as_ref()
    }

    /// 尚未结算的循环观察数
    pub fn pending_cycles(&self, path: &ModulePath) -> usize {
        self.modules.get(path).map_or(0, |entry| entry.cycles.len())
    }
}
