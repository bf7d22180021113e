//! # echolog-tracing
//!
//! Installs echolog as the process-wide `tracing` subscriber.
//!
//! Events from any crate that logs through `tracing` are rendered by the
//! echolog root logger, with the same level templates and colors as direct
//! logger calls and `echo!`.

pub mod bridge;

// Re-export commonly used functions for convenience
pub use bridge::{init_tracing, init_tracing_from_env, EchologLayer, ECHO_TARGET};
pub use tracing::{debug, error, info, trace, warn};
