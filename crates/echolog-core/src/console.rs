//! # Console Color Support
//!
//! Optional color capability shim, probed once per process.
//!
//! On Windows the console has to be switched into virtual-terminal mode before
//! ANSI escapes render; `crossterm` does that as part of its capability check.
//! Elsewhere ANSI is assumed. The probe never fails: when the console cannot
//! do ANSI, output simply degrades to raw escape codes (or no color, when the
//! [`ColorMode`] resolves to off).

use std::env;
use std::io::{self, IsTerminal};
use std::str::FromStr;

use once_cell::sync::Lazy;

use crate::error::EchologError;

static ANSI_SUPPORT: Lazy<bool> = Lazy::new(|| {
    let supported = platform_supports_ansi();
    tracing::debug!(supported, "probed console ANSI support");
    supported
});

/// Whether rendered lines carry color escapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode
{
    /// Color when stderr is an ANSI-capable terminal and `NO_COLOR` is unset
    Auto,
    /// Always color (default)
    #[default]
    Always,
    /// Never color
    Never,
}

impl ColorMode
{
    /// Decide whether to emit color escapes
    #[must_use]
    pub fn resolve(self) -> bool
    {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => !no_color_requested() && enable_ansi_support() && io::stderr().is_terminal(),
        }
    }
}

impl FromStr for ColorMode
{
    type Err = EchologError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Ok(ColorMode::Auto),
            "always" | "on" => Ok(ColorMode::Always),
            "never" | "off" => Ok(ColorMode::Never),
            _ => Err(EchologError::InvalidColorMode(s.to_string())),
        }
    }
}

/// Probe (and on Windows, enable) ANSI escape support. Cached after the first call.
pub fn enable_ansi_support() -> bool
{
    *ANSI_SUPPORT
}

/// `NO_COLOR` set to any non-empty value
#[must_use]
pub fn no_color_requested() -> bool
{
    env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

#[cfg(windows)]
fn platform_supports_ansi() -> bool
{
    crossterm::ansi_support::supports_ansi()
}

#[cfg(not(windows))]
fn platform_supports_ansi() -> bool
{
    true
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_color_mode_from_str()
    {
        assert_eq!("auto".parse::<ColorMode>().unwrap(), ColorMode::Auto);
        assert_eq!("ALWAYS".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert_eq!("never".parse::<ColorMode>().unwrap(), ColorMode::Never);
        assert!("rainbow".parse::<ColorMode>().is_err());
    }

    #[test]
    fn test_fixed_modes_resolve()
    {
        assert!(ColorMode::Always.resolve());
        assert!(!ColorMode::Never.resolve());
    }
}
