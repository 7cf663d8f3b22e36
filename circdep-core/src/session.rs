//! 检测会话与加载拦截器
//!
//! `DetectionSession` 持有一次检测的全部状态（加载链、账本、问题表、
//! 待校验读取），通过拦截器和读取回调显式传递，不使用进程级全局表，
//! 所以多个会话可以并存互不干扰。
//!
//! 状态只在拦截器进入/离开时短暂借用，执行模块体（`load()`）期间不持有借用，
//! 嵌套加载因此可以重入。借用失败视为簿记故障：该次加载按非循环处理，跳过插桩。

use std::cell::RefCell;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use circdep_config::{DetectorConfig, Filter};
use tracing::{debug, info, trace, warn};

use crate::classify::classify_settlement;
use crate::error::DetectError;
use crate::frame::{FrameArena, FrameId};
use crate::hook::{LoadHook, LoadRequest, LoadResult};
use crate::ledger::{ExportSnapshot, Ledger};
use crate::path::{is_relative_specifier, ModulePath};
use crate::problem::{ProblemRecord, ProblemTable};
use crate::scheduler::TaskQueue;
use crate::validator::{validate, PendingRead, ReadInterposer, ReadLog, Validation};

const TARGET: &str = "circdep::interceptor";
const VALIDATOR_TARGET: &str = "circdep::validator";

struct SessionState {
    root: PathBuf,
    extensions: Vec<String>,
    vendor_dirs: Vec<String>,
    frames: FrameArena,
    ledger: Ledger,
    problems: ProblemTable,
    reads: TaskQueue<PendingRead>,
    error: Option<DetectError>,
}

impl SessionState {
    /// 只跟踪项目内模块：相对/绝对说明符，且请求方不在第三方目录中
    fn is_tracked(&self, request: &LoadRequest<'_>) -> bool {
        let specifier = request.specifier;
        let in_project = is_relative_specifier(specifier) || Path::new(specifier).is_absolute();
        let vendored = request.requester.is_some_and(|requester| {
            requester
                .components()
                .any(|c| self.vendor_dirs.iter().any(|dir| c.as_os_str() == OsStr::new(dir)))
        });
        in_project && !vendored
    }

    fn module_path(&self, file: &Path) -> ModulePath {
        ModulePath::normalize(file, &self.root, &self.extensions)
    }
}

/// 进入拦截器时记下的帧信息
struct Entered {
    id: FrameId,
    path: ModulePath,
    requester: Option<FrameId>,
    cyclic: bool,
}

/// 一次检测的会话
#[derive(Clone)]
pub struct DetectionSession {
    state: Rc<RefCell<SessionState>>,
}

impl DetectionSession {
    /// 创建会话
    ///
    /// `config.root` 为空时使用进程工作目录。
    pub fn new(config: &DetectorConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(SessionState {
                root: config.effective_root(),
                extensions: config.extensions.clone(),
                vendor_dirs: config.vendor_dirs.clone(),
                frames: FrameArena::new(),
                ledger: Ledger::new(),
                problems: ProblemTable::new(),
                reads: TaskQueue::new(),
                error: None,
            })),
        }
    }

    /// 本会话的加载拦截器
    pub fn hook(&self) -> Rc<dyn LoadHook> {
        Rc::new(SessionHook {
            session: self.clone(),
        })
    }

    /// 规范化文件路径（与账本键一致）
    pub fn module_path(&self, file: &Path) -> Option<ModulePath> {
        self.with_state(|state| state.module_path(file))
    }

    /// 当前问题表的过滤视图
    pub fn problems(&self, filter: Option<Filter>) -> Vec<ProblemRecord> {
        self.with_state(|state| state.problems.filtered(filter))
            .unwrap_or_default()
    }

    /// 未执行的待校验读取数
    pub fn pending_reads(&self) -> usize {
        self.with_state(|state| state.reads.len()).unwrap_or(0)
    }

    /// 记录一个通过错误通道交付的错误（保留第一个）
    pub fn report_error(&self, error: DetectError) {
        self.with_state(|state| {
            state.error.get_or_insert(error);
        });
    }

    pub(crate) fn take_error(&self) -> Option<DetectError> {
        self.with_state(|state| state.error.take()).flatten()
    }

    /// 执行 drain：处理此刻已排队的校验任务，然后关闭队列
    ///
    /// 返回被丢弃的任务数（drain 过程中新排入的任务不再等待）。
    pub fn drain(&self) -> usize {
        let scheduled = self.pending_reads();
        for _ in 0..scheduled {
            let Some(read) = self.with_state(|state| state.reads.next_task()).flatten() else {
                break;
            };
            self.run_validation(read);
        }
        let dropped = self.with_state(|state| state.reads.close()).unwrap_or(0);
        if dropped > 0 {
            debug!(target: VALIDATOR_TARGET, dropped, "validations scheduled after drain were dropped");
        }
        dropped
    }

    fn run_validation(&self, read: PendingRead) {
        // 校验期间不持有借用：最终导出本身也可能是包装对象
        let settled = self
            .with_state(|state| state.ledger.final_exports(&read.module).cloned())
            .flatten();
        match validate(&read, settled.as_ref()) {
            Validation::Match => {
                trace!(target: VALIDATOR_TARGET, module = %read.module, property = %read.property, "read confirmed");
            }
            Validation::Mismatch(record) => {
                info!(
                    target: VALIDATOR_TARGET,
                    module = %read.module,
                    property = %read.property,
                    "property read during cycle does not match settled exports"
                );
                self.with_state(|state| state.problems.upsert(record));
            }
            Validation::Unsettled => {
                warn!(target: VALIDATOR_TARGET, module = %read.module, property = %read.property, "module never settled, read skipped");
            }
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Option<R> {
        match self.state.try_borrow_mut() {
            Ok(mut state) => Some(f(&mut state)),
            Err(_) => {
                warn!(target: TARGET, "session state busy, bookkeeping skipped");
                None
            }
        }
    }

    fn read_log(&self) -> ReadLog {
        let weak: Weak<RefCell<SessionState>> = Rc::downgrade(&self.state);
        Rc::new(move |read: PendingRead| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Ok(mut guard) = state.try_borrow_mut() else {
                warn!(target: VALIDATOR_TARGET, module = %read.module, "session state busy, read not scheduled");
                return;
            };
            trace!(target: VALIDATOR_TARGET, module = %read.module, property = %read.property, "read scheduled");
            if !guard.reads.schedule(read) {
                debug!(target: VALIDATOR_TARGET, "read after drain dropped");
            }
        })
    }

    fn enter(&self, request: &LoadRequest<'_>) -> Option<Entered> {
        self.with_state(|state| {
            if !state.is_tracked(request) {
                trace!(target: TARGET, specifier = request.specifier, "untracked load passed through");
                return None;
            }
            let path = state.module_path(request.resolved);
            let requester = state.frames.top();
            let cyclic = state.frames.is_cyclic(&path, requester);
            let id = state.frames.push(path.clone());
            trace!(target: TARGET, module = %path, depth = state.frames.depth(), cyclic, "enter");
            Some(Entered {
                id,
                path,
                requester,
                cyclic,
            })
        })
        .flatten()
    }

    fn leave(&self, entered: Entered, result: LoadResult) -> LoadResult {
        let Some(stack) = self.with_state(|state| {
            state.frames.pop(entered.id);
            let value = match &result {
                Ok(value) => value,
                Err(error) => {
                    // 失败的模块不会以这次的导出结算，丢弃它未结算的观察和读取
                    let cycles = state.ledger.discard(&entered.path);
                    let reads = state.reads.discard_where(|read| read.module == entered.path);
                    debug!(target: TARGET, module = %entered.path, %error, cycles, reads, "load failed, observations discarded");
                    return None;
                }
            };
            let snapshot = ExportSnapshot::capture(value);

            if entered.cyclic {
                let stack = state.frames.chain_to(entered.requester, &entered.path);
                info!(target: TARGET, module = %entered.path, keys = snapshot.keys.len(), "circular load");
                state.ledger.observe_cyclic(&entered.path, snapshot, stack.clone());
                return Some(stack);
            }

            let SessionState { ledger, problems, .. } = state;
            if let Some(settlement) = ledger.settle(&entered.path, snapshot) {
                if let Some(record) = classify_settlement(&entered.path, &settlement.cycles, settlement.final_exports) {
                    debug!(target: TARGET, module = %record.file, category = %record.category, "cycle classified");
                    problems.upsert(record);
                }
            }
            None
        })
        .flatten() else {
            return result;
        };

        result.map(|value| ReadInterposer::wrap(value, entered.path, stack, self.read_log()))
    }
}

/// 会话拦截器
struct SessionHook {
    session: DetectionSession,
}

impl LoadHook for SessionHook {
    fn on_load(&self, request: &LoadRequest<'_>, load: &mut dyn FnMut() -> LoadResult) -> LoadResult {
        let Some(entered) = self.session.enter(request) else {
            return load();
        };
        let result = load();
        self.session.leave(entered, result)
    }
}
