//! 加载帧与循环检测
//!
//! 同步加载是嵌套调用，帧严格后进先出，所以用 Vec 做 arena，
//! 用下标做回指。沿回指向上走即为当前活动加载链。

use crate::path::ModulePath;

/// 帧下标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// 一次同步加载
#[derive(Debug, Clone)]
pub struct LoadFrame {
    /// 被加载的模块
    pub path: ModulePath,
    /// 外层（发起请求的）帧，只用于沿链回溯
    pub requester: Option<FrameId>,
}

/// 活动加载链
#[derive(Debug, Default)]
pub struct FrameArena {
    frames: Vec<LoadFrame>,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 压入新帧，外层帧为当前栈顶
    pub fn push(&mut self, path: ModulePath) -> FrameId {
        let requester = self.top();
        self.frames.push(LoadFrame { path, requester });
        FrameId(self.frames.len() - 1)
    }

    /// 弹出帧
    ///
    /// 正常情况下 `id` 就是栈顶。若不是（内层加载异常退出时遗留了帧），
    /// 一并丢弃 `id` 之上的帧。
    pub fn pop(&mut self, id: FrameId) -> Option<LoadFrame> {
        if id.0 >= self.frames.len() {
            return None;
        }
        self.frames.truncate(id.0 + 1);
        self.frames.pop()
    }

    /// 当前栈顶
    pub fn top(&self) -> Option<FrameId> {
        self.frames.len().checked_sub(1).map(FrameId)
    }

    pub fn get(&self, id: FrameId) -> Option<&LoadFrame> {
        self.frames.get(id.0)
    }

    /// 当前嵌套深度
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// 迭代 `start` 及其所有外层帧（由近到远）
    pub fn ancestors(&self, start: Option<FrameId>) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            next: start,
            remaining: self.frames.len(),
        }
    }

    /// `path` 是否已出现在 `requester` 的加载链上（直接或间接循环）
    pub fn is_cyclic(&self, path: &ModulePath, requester: Option<FrameId>) -> bool {
        self.ancestors(requester).any(|frame| &frame.path == path)
    }

    /// 从 `requester` 向外走到 `boundary`，返回由外到内的路径序列
    ///
    /// 结果以 `boundary` 开头（循环边界），以 `requester` 结尾。
    /// 链走完仍未遇到边界时返回整条链。
    pub fn chain_to(&self, requester: Option<FrameId>, boundary: &ModulePath) -> Vec<ModulePath> {
        let mut stack = Vec::new();
        for frame in self.ancestors(requester) {
            stack.push(frame.path.clone());
            if &frame.path == boundary {
                break;
            }
        }
        stack.reverse();
        stack
    }
}

/// 外层帧迭代器（步数不超过 arena 长度）
pub struct Ancestors<'a> {
    arena: &'a FrameArena,
    next: Option<FrameId>,
    remaining: usize,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a LoadFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let frame = self.arena.get(self.next?)?;
        self.next = frame.requester;
        Some(frame)
    }
}
