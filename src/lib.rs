//! circdep - runtime circular dependency detector
//!
//! Watches modules while they actually load, records what every importer
//! received from a module that was still initialising, and reports which
//! circular dependencies cause problems.
//!
//! # Architecture
//!
//! ```text
//! circdep-config/  - Pure configuration data
//! circdep-core/    - Detection engine (no IO)
//! circdep-host/    - Reference module host (fs, resolver, modscript, cache)
//! circdep-api/     - Per-entry orchestration, reports, unified errors
//! circdep-cli/     - `circdep` binary
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use circdep_workspace::{check_entry, NativeFs, RunConfig};
//! use std::{path::Path, rc::Rc};
//!
//! let report = check_entry(Rc::new(NativeFs::new()), Path::new("main.mod"), &RunConfig::default())?;
//! for problem in &report.problems {
//!     println!("{}", problem.message);
//! }
//! ```

pub use circdep_api as api;
pub use circdep_config as config;
pub use circdep_core as core;
pub use circdep_host as host;

// 重导出常用类型
pub use circdep_api::{
    check_entries, check_entry, CircdepError, EntryReport, ErrorReport, ProblemReport, RunConfig,
};
pub use circdep_config::{DetectorConfig, Filter};
pub use circdep_core::{start, Category, Detection, DetectionSession, ProblemRecord, StartOptions};
pub use circdep_host::{MemoryFs, NativeFs, Runtime, SourceFs};
