//! 一次性延迟任务队列
//!
//! 同步加载过程中排入的任务，在本轮同步加载全部返回之后按 FIFO 执行。
//! 队列关闭（drain）后排入的任务直接丢弃。

use std::collections::VecDeque;

/// FIFO 任务队列
#[derive(Debug)]
pub struct TaskQueue<T> {
    queue: VecDeque<T>,
    closed: bool,
}

impl<T> TaskQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            closed: false,
        }
    }

    /// 排入任务；队列已关闭时丢弃并返回 false
    pub fn schedule(&mut self, task: T) -> bool {
        if self.closed {
            return false;
        }
        self.queue.push_back(task);
        true
    }

    /// 取出下一个任务
    pub fn next_task(&mut self) -> Option<T> {
        self.queue.pop_front()
    }

    /// 关闭队列，返回被丢弃的未执行任务数
    pub fn close(&mut self) -> usize {
        self.closed = true;
        let dropped = self.queue.len();
        self.queue.clear();
        dropped
    }

    /// 移除满足条件的未执行任务，返回移除数
    pub fn discard_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let before = self.queue.len();
        self.queue.retain(|task| !pred(task));
        before - self.queue.len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        queue.schedule(1);
        queue.schedule(2);
        queue.schedule(3);
        assert_eq!(queue.next_task(), Some(1));
        assert_eq!(queue.next_task(), Some(2));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_closed_queue_drops_tasks() {
        let mut queue = TaskQueue::new();
        queue.schedule("pending");
        assert_eq!(queue.close(), 1);
        assert!(queue.is_closed());
        assert!(!queue.schedule("late"));
        assert!(queue.is_empty());
        assert_eq!(queue.next_task(), None);
    }

    #[test]
    fn test_discard_where_keeps_order() {
        let mut queue = TaskQueue::new();
        for n in 1..=5 {
            queue.schedule(n);
        }
        assert_eq!(queue.discard_where(|n| n % 2 == 0), 2);
        assert_eq!(queue.next_task(), Some(1));
        assert_eq!(queue.next_task(), Some(3));
        assert_eq!(queue.next_task(), Some(5));
    }
}
