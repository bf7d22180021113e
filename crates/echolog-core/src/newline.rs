//! Blank-line separators that disappear in non-verbose runs.

use std::io::{self, Write};

use crate::error::Result;
use crate::factory::LoggerFactory;
use crate::levels::Level;
use crate::logger::Logger;

/// Write `n - 1` blank lines to `out` if `logger`'s threshold is at or below
/// INFO. Returns the number of blank lines written.
///
/// ## Errors
///
/// Returns the stream error, if any.
pub fn newline_to(logger: &Logger, out: &mut dyn Write, n: usize) -> io::Result<usize>
{
    if logger.level() > Level::INFO {
        return Ok(0);
    }
    let count = n.saturating_sub(1);
    out.write_all("\n".repeat(count).as_bytes())?;
    out.flush()?;
    Ok(count)
}

impl LoggerFactory
{
    /// Separator lines on this factory's console stream, gated by the root
    /// logger's threshold.
    ///
    /// ## Errors
    ///
    /// Root logger configuration failures and stream errors.
    pub fn newline(&self, n: usize) -> Result<usize>
    {
        let logger = self.root()?;
        let mut out = self.writer();
        Ok(newline_to(&logger, &mut out, n)?)
    }
}

/// Emit `n - 1` blank lines when the default logger runs at INFO or lower.
///
/// ## Errors
///
/// Root logger configuration failures and stream errors.
pub fn newline(n: usize) -> Result<()>
{
    LoggerFactory::global().newline(n).map(|_| ())
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_verbose_threshold_emits_n_minus_one()
    {
        let logger = Logger::new(None);
        logger.set_level(Level::INFO);
        let mut out = Vec::new();
        assert_eq!(newline_to(&logger, &mut out, 3).unwrap(), 2);
        assert_eq!(out, b"\n\n");
    }

    #[test]
    fn test_quiet_threshold_emits_nothing()
    {
        let logger = Logger::new(None);
        logger.set_level(Level::ECHO);
        let mut out = Vec::new();
        assert_eq!(newline_to(&logger, &mut out, 3).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_single_newline_is_empty()
    {
        let logger = Logger::new(None);
        logger.set_level(Level::DEBUG);
        let mut out = Vec::new();
        assert_eq!(newline_to(&logger, &mut out, 1).unwrap(), 0);
        assert_eq!(newline_to(&logger, &mut out, 0).unwrap(), 0);
    }
}
