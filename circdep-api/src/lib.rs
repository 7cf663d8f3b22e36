//! circdep API - detection orchestration layer
//!
//! Provides the unified entry points used by the CLI and by library callers:
//! - Per-entry orchestration (`check_entry` / `check_entries`)
//! - Configuration (`RunConfig`)
//! - Unified error handling (`CircdepError`, `ErrorReport`)
//! - Serialisable results (`EntryReport`, `ProblemReport`)
//!
//! Every entry runs in a fresh module runtime and a fresh detection session,
//! so results never leak between entries.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use circdep_core::path::lexical_clean;
use circdep_core::{start, DetectError, ProblemRecord, StartOptions};
use circdep_host::Runtime;
use tracing::{info, instrument, warn};

pub mod config;
pub mod error;
pub mod types;

pub use config::RunConfig;
pub use error::{CircdepError, ErrorReport};
pub use types::{EntryReport, MissingPropertyReport, ProblemReport};

// Re-export config and host types
pub use circdep_config::{Component, DetectorConfig, Filter, LogLevel, LoggingConfig};
pub use circdep_host::{MemoryFs, NativeFs, SourceFs};

const TARGET: &str = "circdep::reporter";

type Outcome = Rc<RefCell<Option<Result<Vec<ProblemRecord>, DetectError>>>>;

/// 检测单个入口
///
/// 入口为相对路径时按 `config.detector.root`（缺省为工作目录）补全。
///
/// # Errors
/// - `Detect(Resolution)`：入口文件不存在
/// - `Load`：入口或其依赖在加载时失败
#[instrument(target = "circdep::reporter", skip(fs, config), fields(entry = %entry.display()))]
pub fn check_entry(fs: Rc<dyn SourceFs>, entry: &Path, config: &RunConfig) -> Result<EntryReport, CircdepError> {
    let runtime = Rc::new(Runtime::new(fs, &config.detector));
    let entry = lexical_clean(&runtime.root().join(entry));

    let outcome: Outcome = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&outcome);
    let mut detection = start(
        runtime.clone(),
        StartOptions::new()
            .config(config.detector.clone())
            .filter(config.filter)
            .on_done(move |result| *sink.borrow_mut() = Some(result)),
    )?;

    let mut load_error = None;
    match runtime.resolve(&entry.to_string_lossy(), None) {
        Err(source) => detection.report_error(DetectError::Resolution {
            entry: entry.clone(),
            source,
        }),
        Ok(_) => {
            if let Err(error) = runtime.require_entry(&entry) {
                warn!(target: TARGET, %error, "entry failed while loading");
                load_error = Some(error);
            }
        }
    }
    detection.stop();
    detection.finish();

    if let Some(error) = load_error {
        return Err(error.into());
    }
    let records = match outcome.borrow_mut().take() {
        Some(result) => result?,
        None => return Err(DetectError::Configuration("detection finished without a result".to_string()).into()),
    };
    info!(target: TARGET, count = records.len(), "entry checked");

    Ok(EntryReport {
        entry,
        filter: config.filter.map(|f| f.as_str()),
        problems: records.iter().map(ProblemReport::from_record).collect(),
    })
}

/// 依次检测多个入口
///
/// 单个入口失败不影响后续入口。
pub fn check_entries(
    fs: Rc<dyn SourceFs>,
    entries: &[PathBuf],
    config: &RunConfig,
) -> Vec<Result<EntryReport, CircdepError>> {
    entries
        .iter()
        .map(|entry| check_entry(Rc::clone(&fs), entry, config))
        .collect()
}
