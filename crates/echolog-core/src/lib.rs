//! # echolog-core
//!
//! Console logging with a custom ECHO severity, colorized level templates and
//! a call-site `echo!` for debugging.
//!
//! This crate provides:
//! - A severity ladder with ECHO between INFO and WARNING
//! - A one-time registry that injects ECHO into the shared level namespace
//! - Colorized formatters in four variants (`short`, `short-time`, `long`, `long-time`)
//! - An idempotent, per-identifier logger factory
//! - `echo!`, which logs each argument's source expression next to its value
//! - `newline`, blank-line separators that vanish in non-verbose runs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use echolog_core::{echo, get_logger, newline, Level};
//!
//! fn main() -> echolog_core::Result<()>
//! {
//!     let log = get_logger(Some(Level::DEBUG), Some("long-time"), None)?;
//!     log.info("starting");
//!
//!     let answer = 6 * 7;
//!     echo!(answer, unit = "widgets")?;
//!
//!     newline(2)?;
//!     log.warning("done");
//!     Ok(())
//! }
//! ```

pub mod callsite;
pub mod colors;
pub mod config;
pub mod console;
pub mod echo;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod levels;
pub mod logger;
pub mod newline;
pub mod prelude;
pub mod registry;

// Re-export commonly used types
pub use config::EchologConfig;
pub use console::ColorMode;
pub use error::{EchologError, Result};
pub use factory::{get_logger, log, log_echo, LoggerFactory};
pub use formatter::{ColorFormatter, FormatSpec};
pub use levels::Level;
pub use logger::{ConsoleHandler, Logger, Record};
pub use newline::newline;
pub use registry::ensure_custom_level_registered;
