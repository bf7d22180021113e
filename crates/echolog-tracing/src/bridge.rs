//! # Tracing Bridge
//!
//! Routes `tracing` events into echolog's root logger, so libraries that log
//! through `tracing` show up in the same colorized console stream as
//! `echo!` output.
//!
//! ## Level mapping
//!
//! | tracing | echolog |
//! |---------|---------|
//! | TRACE   | DEBUG   |
//! | DEBUG   | DEBUG   |
//! | INFO    | INFO, or the level of the log method the target names (`echo` → ECHO) |
//! | WARN    | WARNING |
//! | ERROR   | ERROR   |
//!
//! Events emitted by the echolog crates themselves are dropped: they are
//! produced while the logger table is locked and must not re-enter it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use echolog_core::EchologConfig;
//! use echolog_tracing::init_tracing;
//!
//! let config = EchologConfig::from_env().expect("valid ECHOLOG_* variables");
//! init_tracing(&config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::info!(target: "echo", answer = 42, "rendered at ECHO");
//! ```

use std::fmt::{self, Write as _};

use echolog_core::{EchologConfig, EchologError, Level, LoggerFactory, Result};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Event target that dispatches INFO events at ECHO
///
/// Any log-method name bound in the factory's level registry works the same
/// way; this is the one echolog binds.
pub const ECHO_TARGET: &str = "echo";

/// Target prefixes whose events are never forwarded
const INTERNAL_TARGETS: [&str; 2] = ["echolog_core", "echolog_tracing"];

/// A tracing layer forwarding events to an echolog factory's root logger
#[derive(Debug, Clone, Copy)]
pub struct EchologLayer
{
    factory: &'static LoggerFactory,
}

impl Default for EchologLayer
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl EchologLayer
{
    /// Layer writing through the global factory
    #[must_use]
    pub fn new() -> Self
    {
        Self::with_factory(LoggerFactory::global())
    }

    /// Layer writing through `factory`
    #[must_use]
    pub const fn with_factory(factory: &'static LoggerFactory) -> Self
    {
        Self { factory }
    }

    /// Map a tracing level (and target) to an echolog level.
    ///
    /// INFO events whose target is a log-method name bound in the registry
    /// dispatch at that method's level.
    #[must_use]
    pub fn map_level(&self, level: &tracing::Level, target: &str) -> Level
    {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::DEBUG,
            tracing::Level::INFO => self.factory.registry().method_level(target).unwrap_or(Level::INFO),
            tracing::Level::WARN => Level::WARNING,
            tracing::Level::ERROR => Level::ERROR,
        }
    }

    fn is_internal(target: &str) -> bool
    {
        INTERNAL_TARGETS.iter().any(|prefix| target.starts_with(prefix))
    }
}

impl<S> Layer<S> for EchologLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>)
    {
        let metadata = event.metadata();
        if Self::is_internal(metadata.target()) {
            return;
        }

        // A root logger that cannot be configured has nowhere to write
        let Ok(logger) = self.factory.root() else {
            return;
        };
        let level = self.map_level(metadata.level(), metadata.target());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        logger.log(level, visitor.finish());
    }
}

/// Collects the message and the remaining fields as `key=value`
#[derive(Default)]
struct FieldVisitor
{
    message: Option<String>,
    fields: String,
}

impl FieldVisitor
{
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>)
    {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }

    fn finish(self) -> String
    {
        match self.message {
            Some(message) if self.fields.is_empty() => message,
            Some(message) => format!("{message} {}", self.fields),
            None => self.fields,
        }
    }
}

impl Visit for FieldVisitor
{
    fn record_str(&mut self, field: &Field, value: &str)
    {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug)
    {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}

/// `EnvFilter` directive that lets through everything `level` would show
fn default_directive(level: Level) -> &'static str
{
    if level < Level::DEBUG {
        "trace"
    } else if level < Level::INFO {
        "debug"
    } else if level <= Level::ECHO {
        // ECHO events arrive as INFO
        "info"
    } else if level <= Level::WARNING {
        "warn"
    } else {
        "error"
    }
}

/// Configure the root logger from `config` and install the bridge as the
/// global `tracing` subscriber.
///
/// `RUST_LOG` overrides the filter; otherwise it is derived from the
/// configured level (default ECHO).
///
/// ## Errors
///
/// Returns an error if the root logger cannot be configured or a global
/// subscriber is already installed.
pub fn init_tracing(config: &EchologConfig) -> Result<()>
{
    config.apply(LoggerFactory::global())?;

    let level = config.level.unwrap_or(Level::ECHO);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    Registry::default()
        .with(EchologLayer::new().with_filter(env_filter))
        .try_init()
        .map_err(|e| EchologError::InitializationFailed(e.to_string()))
}

/// [`init_tracing`] with the configuration read from the environment.
///
/// ## Errors
///
/// Invalid `ECHOLOG_*` variables, plus everything [`init_tracing`] returns.
pub fn init_tracing_from_env() -> Result<()>
{
    init_tracing(&EchologConfig::from_env()?)
}
