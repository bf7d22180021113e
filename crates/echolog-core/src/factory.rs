//! # Logger Factory
//!
//! Creates, configures and hands out loggers keyed by identifier (`None` is
//! the root logger).
//!
//! Configuration is idempotent: asking for a logger without a level or format
//! returns the already-configured logger untouched. Supplying either one is a
//! reset: every handler is flushed and detached, then a single fresh console
//! handler is attached.
//!
//! ## Example
//!
//! ```rust,no_run
//! use echolog_core::{get_logger, Level};
//!
//! let log = get_logger(Some(Level::DEBUG), Some("long-time"), None).expect("valid format");
//! log.debug("starting");
//! log.echo("value is 42");
//!
//! // Later lookups return the same, already configured logger
//! let same = get_logger(None, None, None).expect("configured");
//! assert_eq!(same.handlers()[0].id(), log.handlers()[0].id());
//! ```

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;

use crate::config::EchologConfig;
use crate::console::{self, ColorMode};
use crate::error::{EchologError, Result};
use crate::formatter::{ColorFormatter, FormatSpec};
use crate::levels::Level;
use crate::logger::{ConsoleHandler, Logger};
use crate::registry::LevelRegistry;

/// Produces the output stream for each new console handler
pub type MakeWriter = Arc<dyn Fn() -> Box<dyn Write + Send> + Send + Sync>;

static GLOBAL_FACTORY: Lazy<LoggerFactory> = Lazy::new(|| LoggerFactory::new().with_env_lookup(|key| env::var(key).ok()));

/// Per-identifier logger table plus the settings used to build handlers
pub struct LoggerFactory
{
    loggers: Mutex<HashMap<Option<String>, Arc<Logger>>>,
    registry: &'static LevelRegistry,
    make_writer: MakeWriter,
    color: ColorMode,
    root_level: Option<Level>,
    root_format: Option<FormatSpec>,
    pending_error: Mutex<Option<EchologError>>,
}

impl fmt::Debug for LoggerFactory
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("LoggerFactory")
            .field("color", &self.color)
            .field("root_level", &self.root_level)
            .field("root_format", &self.root_format)
            .finish_non_exhaustive()
    }
}

impl Default for LoggerFactory
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl LoggerFactory
{
    /// Factory writing to stderr, always colored, using the global registry
    #[must_use]
    pub fn new() -> Self
    {
        Self::with_writer(|| Box::new(io::stderr()))
    }

    /// Factory whose handlers write to streams produced by `make_writer`
    pub fn with_writer<F>(make_writer: F) -> Self
    where
        F: Fn() -> Box<dyn Write + Send> + Send + Sync + 'static,
    {
        Self {
            loggers: Mutex::new(HashMap::new()),
            registry: LevelRegistry::global(),
            make_writer: Arc::new(make_writer),
            color: ColorMode::default(),
            root_level: None,
            root_format: None,
            pending_error: Mutex::new(None),
        }
    }

    /// Use a different level registry
    #[must_use]
    pub fn with_registry(mut self, registry: &'static LevelRegistry) -> Self
    {
        self.registry = registry;
        self
    }

    /// Choose when handlers emit color escapes
    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self
    {
        self.color = color;
        self
    }

    /// Take color mode and root-logger defaults from `ECHOLOG_*` variables
    /// read through `lookup`.
    ///
    /// Valid variables apply even when another one is invalid. The first
    /// invalid value is returned by the next [`LoggerFactory::configure`]
    /// call, before anything is touched.
    #[must_use]
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (config, error) = EchologConfig::parse_lookup(lookup);
        self.color = config.color;
        self.root_level = config.level;
        self.root_format = config.format;
        self.pending_error = Mutex::new(error);
        self
    }

    /// The process-wide factory (stderr, `ECHOLOG_*` environment)
    #[must_use]
    pub fn global() -> &'static LoggerFactory
    {
        &GLOBAL_FACTORY
    }

    /// Get (and if needed configure) a logger, parsing `format` first.
    ///
    /// ## Errors
    ///
    /// - [`EchologError::InvalidFormat`](crate::EchologError::InvalidFormat)
    ///   if `format` is not a known variant; nothing is touched in that case.
    /// - [`EchologError::LevelConflict`](crate::EchologError::LevelConflict)
    ///   if ECHO cannot be registered.
    pub fn get_logger(&self, level: Option<Level>, format: Option<&str>, id: Option<&str>) -> Result<Arc<Logger>>
    {
        let format = format.map(str::parse::<FormatSpec>).transpose()?;
        self.configure(level, format, id)
    }

    /// Get (and if needed configure) a logger.
    ///
    /// Without `level` and `format`, a logger that already has handlers is
    /// returned as is. Otherwise its handlers are flushed and detached and it
    /// is rebuilt with `level` (default ECHO) and `format` (default
    /// `short-time`). For the root logger the environment defaults from
    /// [`LoggerFactory::with_env_lookup`] come between the two.
    ///
    /// ## Errors
    ///
    /// - [`EchologError::LevelConflict`] if ECHO cannot be registered; the
    ///   logger keeps its previous handlers.
    /// - The invalid environment value recorded by
    ///   [`LoggerFactory::with_env_lookup`], on the first call only.
    pub fn configure(&self, level: Option<Level>, format: Option<FormatSpec>, id: Option<&str>) -> Result<Arc<Logger>>
    {
        if let Some(e) = self.pending_error.lock().unwrap_or_else(PoisonError::into_inner).take() {
            return Err(e);
        }

        // Held across lookup and handler rebuild so concurrent first-time
        // callers cannot attach duplicate handlers
        let mut loggers = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        let logger = Arc::clone(
            loggers
                .entry(id.map(str::to_string))
                .or_insert_with(|| Arc::new(Logger::new(id))),
        );

        let reset = level.is_some() || format.is_some();
        if !reset && logger.has_handlers() {
            return Ok(logger);
        }

        self.registry.ensure_custom_level_registered()?;
        console::enable_ansi_support();

        if reset {
            logger.clear_handlers();
        }

        let (default_level, default_format) = match id {
            None => (self.root_level, self.root_format),
            Some(_) => (None, None),
        };
        let level = level.or(default_level).unwrap_or(Level::ECHO);
        let format = format.or(default_format).unwrap_or_default();
        let formatter = Arc::new(ColorFormatter::with_color(format, self.color.resolve()));
        let handler = ConsoleHandler::with_writer(level, formatter, (self.make_writer)());
        logger.add_handler(Arc::new(handler));
        logger.set_level(level);

        tracing::debug!(
            logger = id.unwrap_or("root"),
            level = %level,
            format = %format,
            "configured logger"
        );
        Ok(logger)
    }

    /// The root logger through the idempotent fast path
    ///
    /// ## Errors
    ///
    /// See [`LoggerFactory::configure`].
    pub fn root(&self) -> Result<Arc<Logger>>
    {
        self.configure(None, None, None)
    }

    /// Level registry consulted when configuring
    #[must_use]
    pub fn registry(&self) -> &'static LevelRegistry
    {
        self.registry
    }

    /// Whether lines built for this factory's loggers should carry color
    pub(crate) fn colored(&self) -> bool
    {
        self.color.resolve()
    }

    /// A fresh stream from this factory's writer source
    pub(crate) fn writer(&self) -> Box<dyn Write + Send>
    {
        (self.make_writer)()
    }
}

/// Get (and if needed configure) a logger from the global factory.
///
/// ## Errors
///
/// See [`LoggerFactory::get_logger`].
pub fn get_logger(level: Option<Level>, format: Option<&str>, id: Option<&str>) -> Result<Arc<Logger>>
{
    LoggerFactory::global().get_logger(level, format, id)
}

/// Log `message` at `level` through the global root logger.
///
/// ## Errors
///
/// See [`LoggerFactory::configure`].
pub fn log(level: Level, message: impl fmt::Display) -> Result<()>
{
    LoggerFactory::global().root()?.log(level, message);
    Ok(())
}

/// Log `message` at ECHO through the global root logger.
///
/// ## Errors
///
/// See [`LoggerFactory::configure`].
pub fn log_echo(message: impl fmt::Display) -> Result<()>
{
    log(Level::ECHO, message)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::registry::ECHO_LEVEL_NAME;

    fn sink_factory() -> LoggerFactory
    {
        LoggerFactory::with_writer(|| Box::new(io::sink()))
    }

    #[test]
    fn test_defaults()
    {
        let factory = sink_factory();
        let logger = factory.root().unwrap();
        assert_eq!(logger.level(), Level::ECHO);

        let handlers = logger.handlers();
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].threshold(), Level::ECHO);
        assert_eq!(handlers[0].formatter().spec(), FormatSpec::ShortTime);
    }

    #[test]
    fn test_named_loggers_are_independent()
    {
        let factory = sink_factory();
        let a = factory.configure(Some(Level::DEBUG), Some(FormatSpec::Long), Some("a")).unwrap();
        let b = factory.configure(None, None, Some("b")).unwrap();
        assert_eq!(a.name(), Some("a"));
        assert_eq!(a.level(), Level::DEBUG);
        assert_eq!(b.level(), Level::ECHO);
        assert_eq!(b.handlers()[0].formatter().spec(), FormatSpec::ShortTime);
    }

    #[test]
    fn test_reset_replaces_handlers()
    {
        let factory = sink_factory();
        let first = factory.root().unwrap().handlers()[0].id();
        let logger = factory.configure(Some(Level::INFO), None, None).unwrap();
        let handlers = logger.handlers();
        assert_eq!(handlers.len(), 1);
        assert_ne!(handlers[0].id(), first);
        assert_eq!(logger.level(), Level::INFO);
    }

    #[test]
    fn test_conflict_leaves_logger_untouched()
    {
        let registry: &'static LevelRegistry = Box::leak(Box::new(LevelRegistry::new()));
        registry.add_level_name(Level::new(7), ECHO_LEVEL_NAME);
        let factory = sink_factory().with_registry(registry);

        let err = factory.configure(Some(Level::DEBUG), None, Some("x")).unwrap_err();
        assert!(matches!(err, EchologError::LevelConflict { .. }));

        let logger = factory.loggers.lock().unwrap().get(&Some("x".to_string())).cloned().unwrap();
        assert!(!logger.has_handlers());
        assert_eq!(logger.level(), Level::WARNING);
    }

    #[test]
    fn test_color_mode_is_applied()
    {
        let factory = sink_factory().with_color(ColorMode::Never);
        let logger = factory.root().unwrap();
        assert!(!logger.handlers()[0].formatter().is_colored());
    }

    fn lookup_from(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String>
    {
        move |key| pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| (*v).to_string())
    }

    #[test]
    fn test_env_defaults_apply_to_root_only()
    {
        let factory = sink_factory().with_env_lookup(lookup_from(&[("ECHOLOG_LEVEL", "debug"), ("ECHOLOG_FORMAT", "long")]));

        let root = factory.root().unwrap();
        assert_eq!(root.level(), Level::DEBUG);
        assert_eq!(root.handlers()[0].formatter().spec(), FormatSpec::Long);

        let named = factory.configure(None, None, Some("named")).unwrap();
        assert_eq!(named.level(), Level::ECHO);
        assert_eq!(named.handlers()[0].formatter().spec(), FormatSpec::ShortTime);

        // Explicit arguments still win
        let root = factory.configure(Some(Level::ERROR), None, None).unwrap();
        assert_eq!(root.level(), Level::ERROR);
        assert_eq!(root.handlers()[0].formatter().spec(), FormatSpec::Long);
    }

    #[test]
    fn test_invalid_env_is_reported_once()
    {
        let factory = sink_factory().with_env_lookup(lookup_from(&[
            ("ECHOLOG_LEVEL", "chatty"),
            ("ECHOLOG_COLOR", "never"),
            ("ECHOLOG_FORMAT", "long"),
        ]));

        let err = factory.root().unwrap_err();
        assert!(matches!(err, EchologError::InvalidLevel(ref s) if s == "chatty"));
        assert!(factory.loggers.lock().unwrap().is_empty());

        let root = factory.root().unwrap();
        assert_eq!(root.level(), Level::ECHO);
        let handler = &root.handlers()[0];
        assert!(!handler.formatter().is_colored());
        assert_eq!(handler.formatter().spec(), FormatSpec::Long);
    }
}
