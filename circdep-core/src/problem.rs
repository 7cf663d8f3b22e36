//! 问题记录与过滤

use std::collections::HashMap;
use std::fmt;

use circdep_config::Filter;

use crate::path::ModulePath;
use crate::value::Value;

/// 问题分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// 良性循环：循环中拿到的导出与最终导出完全一致
    Circular,
    /// 循环中拿到的对象永远不会变成最终导出
    ExportsNotIdentical,
    /// 同一个对象，但拿到时键还不全（潜在风险）
    IncompleteExports,
    /// 循环窗口内读取的属性与最终值不符
    MissingProperty,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Circular => "CIRCULAR",
            Category::ExportsNotIdentical => "EXPORTS_NOT_IDENTICAL",
            Category::IncompleteExports => "INCOMPLETE_EXPORTS",
            Category::MissingProperty => "MISSING_PROPERTY",
        }
    }

    /// 是否是正在生效的问题
    pub fn causes_problems(&self) -> bool {
        matches!(self, Category::ExportsNotIdentical | Category::MissingProperty)
    }

    /// 是否通过过滤器；`None` 不过滤
    pub fn matches(&self, filter: Option<Filter>) -> bool {
        match filter {
            None => true,
            Some(Filter::Problems) => self.causes_problems(),
            Some(Filter::AlwaysEmpty) => *self == Category::ExportsNotIdentical,
            Some(Filter::SyncEmpty) => *self == Category::IncompleteExports,
            Some(Filter::MissingProperties) => *self == Category::MissingProperty,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 分类附带的细节
#[derive(Debug, Clone)]
pub enum ProblemDetail {
    None,
    /// 缺失属性：属性名和最终导出里的值
    MissingProperty { name: String, expected_value: Value },
}

/// 一条问题记录
#[derive(Debug, Clone)]
pub struct ProblemRecord {
    /// 被循环引用的模块
    pub file: ModulePath,
    /// 由外到内的加载链，终止于重新进入循环的模块
    pub stack: Vec<ModulePath>,
    pub category: Category,
    pub detail: ProblemDetail,
}

impl ProblemRecord {
    /// 缺失属性细节（若有）
    pub fn missing_property(&self) -> Option<(&str, &Value)> {
        match &self.detail {
            ProblemDetail::MissingProperty { name, expected_value } => Some((name, expected_value)),
            ProblemDetail::None => None,
        }
    }
}

/// 问题表：每个路径保留最后一次分类，按首次报告顺序输出
#[derive(Debug, Default)]
pub struct ProblemTable {
    order: Vec<ModulePath>,
    records: HashMap<ModulePath, ProblemRecord>,
}

impl ProblemTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入或覆盖
    pub fn upsert(&mut self, record: ProblemRecord) {
        if !self.records.contains_key(&record.file) {
            self.order.push(record.file.clone());
        }
        self.records.insert(record.file.clone(), record);
    }

    pub fn get(&self, file: &ModulePath) -> Option<&ProblemRecord> {
        self.records.get(file)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 按顺序迭代所有记录
    pub fn iter(&self) -> impl Iterator<Item = &ProblemRecord> {
        self.order.iter().filter_map(|path| self.records.get(path))
    }

    /// 按过滤器取子集
    pub fn filtered(&self, filter: Option<Filter>) -> Vec<ProblemRecord> {
        self.iter()
            .filter(|record| record.category.matches(filter))
            .cloned()
            .collect()
    }
}
