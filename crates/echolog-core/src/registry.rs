//! # Level Registry
//!
//! Process-wide level namespace and the one-time injection of the custom
//! ECHO level into it.
//!
//! The namespace maps level values to display names (and back) and records
//! which log-method names are bound to which level. It starts out with the
//! standard levels (`NOTSET`, `DEBUG`, `INFO`, `WARNING`, `ERROR`,
//! `CRITICAL`) and their methods. [`Level`]'s `Display` and `FromStr` resolve
//! names through [`LevelRegistry::global`], and the tracing bridge dispatches
//! events whose target is a bound method name at that method's level.
//!
//! [`LevelRegistry::ensure_custom_level_registered`] binds `ECHO` and the
//! `echo` method exactly once. The "already registered" flag lives behind a
//! mutex, so concurrent first-time callers cannot double-register. A binding
//! made by someone else first is reported as
//! [`EchologError::LevelConflict`] and leaves the flag unset.
//!
//! ## Example
//!
//! ```rust
//! use echolog_core::levels::Level;
//! use echolog_core::registry::LevelRegistry;
//!
//! let registry = LevelRegistry::new();
//! assert_eq!(registry.level_name(Level::ECHO), "Level 25");
//!
//! registry.ensure_custom_level_registered().unwrap();
//! registry.ensure_custom_level_registered().unwrap(); // no-op
//! assert_eq!(registry.level_name(Level::ECHO), "ECHO");
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::error::{EchologError, Result};
use crate::levels::{Level, LEVEL_TABLE};

/// Name the custom level is registered under
pub const ECHO_LEVEL_NAME: &str = "ECHO";

/// Method name bound for the custom level
pub const ECHO_METHOD_NAME: &str = "echo";

static GLOBAL_REGISTRY: Lazy<LevelRegistry> = Lazy::new(LevelRegistry::new);

/// Name tables shared by every logger that uses a registry
#[derive(Debug, Default)]
struct LevelNamespace
{
    level_to_name: HashMap<Level, String>,
    name_to_level: HashMap<String, Level>,
    methods: HashMap<String, Level>,
}

impl LevelNamespace
{
    fn with_standard_levels() -> Self
    {
        let mut namespace = Self::default();
        namespace.add_level_name(Level::NOTSET, "NOTSET");
        for entry in LEVEL_TABLE.iter().filter(|entry| entry.level != Level::ECHO) {
            namespace.add_level_name(entry.level, entry.name);
            namespace.methods.insert(entry.name.to_lowercase(), entry.level);
        }
        namespace
    }

    fn add_level_name(&mut self, level: Level, name: &str)
    {
        self.level_to_name.insert(level, name.to_string());
        self.name_to_level.insert(name.to_string(), level);
    }
}

/// Level namespace plus the one-time ECHO registration state
#[derive(Debug)]
pub struct LevelRegistry
{
    namespace: RwLock<LevelNamespace>,
    registered: Mutex<bool>,
}

impl Default for LevelRegistry
{
    fn default() -> Self
    {
        Self::new()
    }
}

impl LevelRegistry
{
    /// Create a registry holding only the standard levels
    #[must_use]
    pub fn new() -> Self
    {
        Self {
            namespace: RwLock::new(LevelNamespace::with_standard_levels()),
            registered: Mutex::new(false),
        }
    }

    /// The process-wide registry used by the logger factory
    #[must_use]
    pub fn global() -> &'static LevelRegistry
    {
        &GLOBAL_REGISTRY
    }

    /// Inject ECHO into the namespace if this registry has not done so yet.
    ///
    /// Returns the ECHO level. Every call after the first successful one is a
    /// no-op.
    ///
    /// ## Errors
    ///
    /// Returns [`EchologError::LevelConflict`] if the name `ECHO` is bound to
    /// a different level, or the method name `echo` is already bound, by
    /// something other than this registry. Nothing is bound in that case.
    pub fn ensure_custom_level_registered(&self) -> Result<Level>
    {
        let mut registered = self.registered.lock().unwrap_or_else(PoisonError::into_inner);
        if *registered {
            return Ok(Level::ECHO);
        }

        let mut namespace = self.namespace.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = namespace.name_to_level.get(ECHO_LEVEL_NAME) {
            if *existing != Level::ECHO {
                return Err(EchologError::LevelConflict {
                    name: ECHO_LEVEL_NAME.to_string(),
                    existing: format!("bound to level {}", existing.value()),
                });
            }
        }
        if let Some(existing) = namespace.methods.get(ECHO_METHOD_NAME) {
            return Err(EchologError::LevelConflict {
                name: ECHO_METHOD_NAME.to_string(),
                existing: format!("method bound to level {}", existing.value()),
            });
        }

        namespace.add_level_name(Level::ECHO, ECHO_LEVEL_NAME);
        namespace.methods.insert(ECHO_METHOD_NAME.to_string(), Level::ECHO);
        *registered = true;

        tracing::debug!(level = Level::ECHO.value(), "registered custom level {ECHO_LEVEL_NAME}");
        Ok(Level::ECHO)
    }

    /// Whether this registry has injected ECHO
    #[must_use]
    pub fn is_registered(&self) -> bool
    {
        *self.registered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a display name to a level, overwriting any previous name
    pub fn add_level_name(&self, level: Level, name: &str)
    {
        let mut namespace = self.namespace.write().unwrap_or_else(PoisonError::into_inner);
        namespace.add_level_name(level, name);
    }

    /// Bind a log-method name to a level.
    ///
    /// ## Errors
    ///
    /// Returns [`EchologError::LevelConflict`] if `method` is already bound.
    pub fn bind_method(&self, method: &str, level: Level) -> Result<()>
    {
        let mut namespace = self.namespace.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = namespace.methods.get(method) {
            return Err(EchologError::LevelConflict {
                name: method.to_string(),
                existing: format!("method bound to level {}", existing.value()),
            });
        }
        namespace.methods.insert(method.to_string(), level);
        Ok(())
    }

    /// Display name of `level`, or `Level <n>` when it has none
    #[must_use]
    pub fn level_name(&self, level: Level) -> String
    {
        let namespace = self.namespace.read().unwrap_or_else(PoisonError::into_inner);
        namespace
            .level_to_name
            .get(&level)
            .cloned()
            .unwrap_or_else(|| format!("Level {}", level.value()))
    }

    /// Level bound to a display name
    #[must_use]
    pub fn level_for_name(&self, name: &str) -> Option<Level>
    {
        let namespace = self.namespace.read().unwrap_or_else(PoisonError::into_inner);
        namespace.name_to_level.get(name).copied()
    }

    /// Level a log-method name dispatches at
    #[must_use]
    pub fn method_level(&self, method: &str) -> Option<Level>
    {
        let namespace = self.namespace.read().unwrap_or_else(PoisonError::into_inner);
        namespace.methods.get(method).copied()
    }
}

/// Register ECHO in the process-wide namespace (idempotent).
///
/// ## Errors
///
/// See [`LevelRegistry::ensure_custom_level_registered`].
pub fn ensure_custom_level_registered() -> Result<Level>
{
    LevelRegistry::global().ensure_custom_level_registered()
}
