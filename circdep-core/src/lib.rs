//! circdep Core - circular dependency detection engine (pure logic, no IO)
//!
//! Watches modules as they actually load and classifies every circular
//! dependency by whether the partial exports an importer received mid-cycle
//! are usable:
//!
//! ```text
//! interceptor → cycle detector → ledger → classifier
//!                    │ (cyclic)
//!                    └→ read interposer → deferred validation → reporter
//! ```
//!
//! The host module system is an external collaborator reached only through
//! [`HookPoint`] / [`LoadHook`]. All detection state lives in an explicit
//! [`DetectionSession`]; there is no process-wide table.

pub mod classify;
pub mod error;
pub mod frame;
pub mod hook;
pub mod ledger;
pub mod path;
pub mod problem;
pub mod reporter;
pub mod scheduler;
pub mod session;
pub mod validator;
pub mod value;

// Re-export common types
pub use error::{DetectError, LoadError};
pub use hook::{HookPoint, LoadHook, LoadRequest, LoadResult};
pub use path::ModulePath;
pub use problem::{Category, ProblemDetail, ProblemRecord, ProblemTable};
pub use reporter::{
    always_empty_exports, circular, empty_sync_access, missing_properties, problems, start, Detection, OnDone,
    StartOptions,
};
pub use session::DetectionSession;
pub use value::{same_value, ExportsObject, ObjectRef, PlainObject, Value};

// Re-export config types from circdep-config
pub use circdep_config::{Component, DetectorConfig, Filter};
