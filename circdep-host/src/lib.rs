//! circdep Host - reference synchronous module host
//!
//! A small module system the detector can wrap: `.mod` scripts loaded from a
//! [`SourceFs`], resolved by [`Resolver`], executed by the modscript
//! interpreter and cached by [`Runtime`]. `Runtime` implements
//! [`circdep_core::HookPoint`], so a detection session can intercept every
//! load it performs.
//!
//! # Usage
//! ```rust,ignore
//! use circdep_host::{MemoryFs, Runtime};
//! use std::rc::Rc;
//!
//! let fs = MemoryFs::with_files([("/p/a.mod", "export a = 1")]);
//! let runtime = Rc::new(Runtime::new(Rc::new(fs), &config));
//! let exports = runtime.require_entry(Path::new("a.mod"))?;
//! ```

pub mod fs;
pub mod resolver;
pub mod runtime;
pub mod script;

pub use fs::{FsError, FsResult, MemoryFs, NativeFs, SourceFs};
pub use resolver::Resolver;
pub use runtime::Runtime;
pub use script::{parse, ParseError, Script};
