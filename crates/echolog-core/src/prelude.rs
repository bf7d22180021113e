//! Common module for library exports

pub use crate::callsite::{CallSiteResolver, InlineResolver, SourceFileResolver};
pub use crate::echo;
pub use crate::error::{EchologError, Result};
pub use crate::factory::{get_logger, LoggerFactory};
pub use crate::formatter::FormatSpec;
pub use crate::levels::Level;
pub use crate::logger::Logger;
pub use crate::newline::newline;
