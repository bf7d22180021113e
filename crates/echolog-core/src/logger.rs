//! # Loggers and Handlers
//!
//! The leveled dispatch layer: a [`Logger`] holds a threshold and a list of
//! [`ConsoleHandler`]s; each handler has its own threshold, a bound
//! [`ColorFormatter`] and an output stream.
//!
//! A record is emitted by a handler only if the logger is enabled for the
//! record's level *and* the level is at or above the handler's threshold.
//!
//! Loggers are shared (`Arc<Logger>`) and use interior mutability, so a
//! logger handed out by the factory keeps working while it is being
//! reconfigured elsewhere.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Local};

use crate::formatter::ColorFormatter;
use crate::levels::Level;

static NEXT_HANDLER_ID: AtomicU64 = AtomicU64::new(1);

/// A single log event
#[derive(Debug, Clone)]
pub struct Record
{
    level: Level,
    message: String,
    timestamp: DateTime<Local>,
}

impl Record
{
    /// Create a record stamped with the current local time
    pub fn new(level: Level, message: impl Into<String>) -> Self
    {
        Self::with_timestamp(level, message, Local::now())
    }

    /// Create a record with an explicit timestamp
    pub fn with_timestamp(level: Level, message: impl Into<String>, timestamp: DateTime<Local>) -> Self
    {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    /// Severity of the record
    #[must_use]
    pub const fn level(&self) -> Level
    {
        self.level
    }

    /// Message body
    #[must_use]
    pub fn message(&self) -> &str
    {
        &self.message
    }

    /// Creation time
    #[must_use]
    pub const fn timestamp(&self) -> &DateTime<Local>
    {
        &self.timestamp
    }
}

/// Process-unique handler identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Writes formatted records to a console stream (stderr unless overridden)
pub struct ConsoleHandler
{
    id: HandlerId,
    threshold: Level,
    formatter: Arc<ColorFormatter>,
    stream: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for ConsoleHandler
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("ConsoleHandler")
            .field("id", &self.id)
            .field("threshold", &self.threshold)
            .field("formatter", &self.formatter.spec())
            .finish_non_exhaustive()
    }
}

impl ConsoleHandler
{
    /// Handler writing to stderr
    #[must_use]
    pub fn new(threshold: Level, formatter: Arc<ColorFormatter>) -> Self
    {
        Self::with_writer(threshold, formatter, Box::new(io::stderr()))
    }

    /// Handler writing to an arbitrary stream
    #[must_use]
    pub fn with_writer(threshold: Level, formatter: Arc<ColorFormatter>, writer: Box<dyn Write + Send>) -> Self
    {
        Self {
            id: HandlerId(NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed)),
            threshold,
            formatter,
            stream: Mutex::new(writer),
        }
    }

    /// Identity of this handler
    #[must_use]
    pub const fn id(&self) -> HandlerId
    {
        self.id
    }

    /// Minimum level this handler emits
    #[must_use]
    pub const fn threshold(&self) -> Level
    {
        self.threshold
    }

    /// Bound formatter
    #[must_use]
    pub const fn formatter(&self) -> &Arc<ColorFormatter>
    {
        &self.formatter
    }

    /// Format and write `record` as one line, if it passes the threshold.
    ///
    /// ## Errors
    ///
    /// Returns the underlying stream error.
    pub fn emit(&self, record: &Record) -> io::Result<()>
    {
        if record.level() < self.threshold {
            return Ok(());
        }
        let line = self.formatter.render(record);
        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(stream, "{line}")?;
        stream.flush()
    }

    /// Flush the underlying stream.
    ///
    /// ## Errors
    ///
    /// Returns the underlying stream error.
    pub fn flush(&self) -> io::Result<()>
    {
        self.stream.lock().unwrap_or_else(PoisonError::into_inner).flush()
    }
}

#[derive(Debug)]
struct LoggerState
{
    level: Level,
    handlers: Vec<Arc<ConsoleHandler>>,
}

/// A named (or root) logger
#[derive(Debug)]
pub struct Logger
{
    name: Option<String>,
    state: RwLock<LoggerState>,
}

impl Logger
{
    /// Create an unconfigured logger: threshold WARNING, no handlers.
    ///
    /// `None` names the root logger.
    #[must_use]
    pub fn new(name: Option<&str>) -> Self
    {
        Self {
            name: name.map(str::to_string),
            state: RwLock::new(LoggerState {
                level: Level::WARNING,
                handlers: Vec::new(),
            }),
        }
    }

    /// Logger identifier (`None` for root)
    #[must_use]
    pub fn name(&self) -> Option<&str>
    {
        self.name.as_deref()
    }

    /// Logger threshold
    #[must_use]
    pub fn level(&self) -> Level
    {
        self.state.read().unwrap_or_else(PoisonError::into_inner).level
    }

    /// Set the logger threshold
    pub fn set_level(&self, level: Level)
    {
        self.state.write().unwrap_or_else(PoisonError::into_inner).level = level;
    }

    /// Whether a record at `level` would be dispatched
    #[must_use]
    pub fn is_enabled_for(&self, level: Level) -> bool
    {
        level >= self.level()
    }

    /// Whether any handler is attached
    #[must_use]
    pub fn has_handlers(&self) -> bool
    {
        !self.state.read().unwrap_or_else(PoisonError::into_inner).handlers.is_empty()
    }

    /// Snapshot of the attached handlers
    #[must_use]
    pub fn handlers(&self) -> Vec<Arc<ConsoleHandler>>
    {
        self.state.read().unwrap_or_else(PoisonError::into_inner).handlers.clone()
    }

    /// Attach a handler
    pub fn add_handler(&self, handler: Arc<ConsoleHandler>)
    {
        self.state.write().unwrap_or_else(PoisonError::into_inner).handlers.push(handler);
    }

    /// Flush and detach every handler
    pub fn clear_handlers(&self)
    {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        for handler in state.handlers.drain(..) {
            if let Err(e) = handler.flush() {
                tracing::warn!(handler = ?handler.id(), error = %e, "failed to flush detached handler");
            }
        }
    }

    /// Dispatch an already-built record to every handler.
    ///
    /// Stream failures are reported through `tracing` and never reach the
    /// caller.
    pub fn handle(&self, record: &Record)
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        if record.level() < state.level {
            return;
        }
        for handler in &state.handlers {
            if let Err(e) = handler.emit(record) {
                tracing::warn!(handler = ?handler.id(), error = %e, "failed to write log record");
            }
        }
    }

    /// Log `message` at `level` if enabled
    pub fn log(&self, level: Level, message: impl fmt::Display)
    {
        if self.is_enabled_for(level) {
            self.handle(&Record::new(level, message.to_string()));
        }
    }

    /// Log at DEBUG
    pub fn debug(&self, message: impl fmt::Display)
    {
        self.log(Level::DEBUG, message);
    }

    /// Log at INFO
    pub fn info(&self, message: impl fmt::Display)
    {
        self.log(Level::INFO, message);
    }

    /// Log at the custom ECHO level
    pub fn echo(&self, message: impl fmt::Display)
    {
        self.log(Level::ECHO, message);
    }

    /// Log at WARNING
    pub fn warning(&self, message: impl fmt::Display)
    {
        self.log(Level::WARNING, message);
    }

    /// Log at ERROR
    pub fn error(&self, message: impl fmt::Display)
    {
        self.log(Level::ERROR, message);
    }

    /// Log at CRITICAL
    pub fn critical(&self, message: impl fmt::Display)
    {
        self.log(Level::CRITICAL, message);
    }

    /// Alias for [`Logger::critical`]
    pub fn fatal(&self, message: impl fmt::Display)
    {
        self.critical(message);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::formatter::FormatSpec;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Write for Capture
    {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>
        {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()>
        {
            Ok(())
        }
    }

    impl Capture
    {
        fn lines(&self) -> Vec<String>
        {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn logger_with_handler(logger_level: Level, handler_level: Level) -> (Logger, Capture)
    {
        let capture = Capture::default();
        let formatter = Arc::new(ColorFormatter::with_color(FormatSpec::Short, false));
        let logger = Logger::new(Some("test"));
        logger.set_level(logger_level);
        logger.add_handler(Arc::new(ConsoleHandler::with_writer(
            handler_level,
            formatter,
            Box::new(capture.clone()),
        )));
        (logger, capture)
    }

    #[test]
    fn test_new_logger_defaults()
    {
        let logger = Logger::new(None);
        assert_eq!(logger.name(), None);
        assert_eq!(logger.level(), Level::WARNING);
        assert!(!logger.has_handlers());
    }

    #[test]
    fn test_logger_threshold_gates_records()
    {
        let (logger, capture) = logger_with_handler(Level::ECHO, Level::DEBUG);
        logger.debug("hidden");
        logger.info("hidden");
        logger.echo("shown");
        logger.fatal("also shown");
        assert_eq!(capture.lines(), vec!["[>] shown", "[X] also shown"]);
    }

    #[test]
    fn test_handler_threshold_gates_records()
    {
        let (logger, capture) = logger_with_handler(Level::DEBUG, Level::WARNING);
        logger.info("hidden");
        logger.warning("shown");
        assert_eq!(capture.lines(), vec!["[!] shown"]);
    }

    #[test]
    fn test_clear_handlers()
    {
        let (logger, capture) = logger_with_handler(Level::DEBUG, Level::DEBUG);
        logger.clear_handlers();
        assert!(!logger.has_handlers());
        logger.error("dropped");
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_handler_ids_are_unique()
    {
        let formatter = Arc::new(ColorFormatter::new(FormatSpec::Long));
        let a = ConsoleHandler::new(Level::DEBUG, Arc::clone(&formatter));
        let b = ConsoleHandler::new(Level::DEBUG, formatter);
        assert_ne!(a.id(), b.id());
    }
}
