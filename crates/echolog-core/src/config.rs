//! # Environment Configuration
//!
//! Optional overrides for the default root-logger setup:
//!
//! - `ECHOLOG_LEVEL`: level name (`debug`, `echo`, ...) or number
//! - `ECHOLOG_FORMAT`: `short`, `short-time`, `long` or `long-time`
//! - `ECHOLOG_COLOR`: `auto`, `always` or `never`
//! - `NO_COLOR`: any non-empty value forces `never`
//!
//! Unset variables leave the factory defaults in place. Set-but-invalid values
//! are errors. The global factory reads these on first use: level and format
//! become the root logger's defaults, and an invalid value is returned by the
//! first call that configures a logger.

use std::env;

use crate::console::ColorMode;
use crate::error::{EchologError, Result};
use crate::factory::LoggerFactory;
use crate::formatter::FormatSpec;
use crate::levels::Level;

/// Level override variable
pub const LEVEL_ENV: &str = "ECHOLOG_LEVEL";
/// Format override variable
pub const FORMAT_ENV: &str = "ECHOLOG_FORMAT";
/// Color mode variable
pub const COLOR_ENV: &str = "ECHOLOG_COLOR";

/// Settings for the root logger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EchologConfig
{
    /// Threshold (`None` keeps the factory default, ECHO)
    pub level: Option<Level>,
    /// Format variant (`None` keeps the factory default, `short-time`)
    pub format: Option<FormatSpec>,
    /// Color choice
    pub color: ColorMode,
}

impl EchologConfig
{
    /// Read the configuration from the process environment.
    ///
    /// ## Errors
    ///
    /// `InvalidLevel`, `InvalidFormat` or `InvalidColorMode` for a set but
    /// unparseable variable.
    pub fn from_env() -> Result<Self>
    {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup.
    ///
    /// ## Errors
    ///
    /// See [`EchologConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::parse_lookup(lookup) {
            (config, None) => Ok(config),
            (_, Some(e)) => Err(e),
        }
    }

    /// Read every variable independently: invalid ones are left at their
    /// defaults and the first failure is returned next to the config.
    pub fn parse_lookup<F>(lookup: F) -> (Self, Option<EchologError>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut first_error = None;
        let level = keep_valid(lookup(LEVEL_ENV).map(|value| value.parse::<Level>()), &mut first_error);
        let format = keep_valid(lookup(FORMAT_ENV).map(|value| value.parse::<FormatSpec>()), &mut first_error);
        let mut color = keep_valid(lookup(COLOR_ENV).map(|value| value.parse::<ColorMode>()), &mut first_error)
            .unwrap_or_default();
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            color = ColorMode::Never;
        }

        (Self { level, format, color }, first_error)
    }

    /// Configure `factory`'s root logger with this level and format.
    ///
    /// The color choice is a property of the factory (see
    /// [`LoggerFactory::with_color`]). Nothing is reset when neither level nor
    /// format is set and the root logger is already configured.
    ///
    /// ## Errors
    ///
    /// See [`LoggerFactory::configure`].
    pub fn apply(&self, factory: &LoggerFactory) -> Result<()>
    {
        factory.configure(self.level, self.format, None).map(|_| ())
    }
}

fn keep_valid<T>(parsed: Option<Result<T>>, first_error: &mut Option<EchologError>) -> Option<T>
{
    match parsed? {
        Ok(value) => Some(value),
        Err(e) => {
            first_error.get_or_insert(e);
            None
        }
    }
}

#[cfg(test)]
mod tests
{
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String>
    {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults()
    {
        let config = EchologConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, EchologConfig::default());
        assert_eq!(config.color, ColorMode::Always);
    }

    #[test]
    fn test_reads_all_variables()
    {
        let config = EchologConfig::from_lookup(lookup_from(&[
            (LEVEL_ENV, "debug"),
            (FORMAT_ENV, "long-time"),
            (COLOR_ENV, "never"),
        ]))
        .unwrap();
        assert_eq!(config.level, Some(Level::DEBUG));
        assert_eq!(config.format, Some(FormatSpec::LongTime));
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_no_color_wins()
    {
        let config = EchologConfig::from_lookup(lookup_from(&[(COLOR_ENV, "always"), ("NO_COLOR", "1")])).unwrap();
        assert_eq!(config.color, ColorMode::Never);
    }

    #[test]
    fn test_invalid_values_are_errors()
    {
        let bad_format = EchologConfig::from_lookup(lookup_from(&[(FORMAT_ENV, "fancy")]));
        assert!(matches!(bad_format, Err(EchologError::InvalidFormat(_))));

        let bad_level = EchologConfig::from_lookup(lookup_from(&[(LEVEL_ENV, "chatty")]));
        assert!(matches!(bad_level, Err(EchologError::InvalidLevel(_))));
    }

    #[test]
    fn test_partial_parse_keeps_valid_values()
    {
        let (config, error) = EchologConfig::parse_lookup(lookup_from(&[
            (LEVEL_ENV, "chatty"),
            (FORMAT_ENV, "long"),
            (COLOR_ENV, "never"),
        ]));
        assert!(matches!(error, Some(EchologError::InvalidLevel(ref s)) if s == "chatty"));
        assert_eq!(config.level, None);
        assert_eq!(config.format, Some(FormatSpec::Long));
        assert_eq!(config.color, ColorMode::Never);
    }
}
