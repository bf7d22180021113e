//! # Severity Levels
//!
//! The fixed severity ladder and the human-readable tags for each level.
//!
//! Levels are plain numbers so that records at arbitrary severities (for
//! example ones bridged in from another logging system) can still be routed
//! and rendered. The ladder itself is immutable:
//!
//! | level    | value | short tag | long tag |
//! |----------|-------|-----------|----------|
//! | DEBUG    | 10    | `/`       | `DEBUG`  |
//! | INFO     | 20    | `-`       | `INFO`   |
//! | ECHO     | 25    | `>`       | `ECHO`   |
//! | WARNING  | 30    | `!`       | `WARN`   |
//! | ERROR    | 40    | `x`       | `ERROR`  |
//! | CRITICAL | 50    | `X`       | `FATAL`  |
//!
//! `NOTSET` (0, `?`, `UNSET`) is the fallback entry for any value that is not
//! on the ladder.

use std::fmt;
use std::str::FromStr;

use crate::error::EchologError;
use crate::registry::{LevelRegistry, ECHO_LEVEL_NAME};

/// Distance between INFO and the custom ECHO level.
pub const ECHO_OFFSET: u32 = 5;

/// A numeric severity; higher is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(u32);

impl Level
{
    /// Unset level; lets everything through when used as a threshold
    pub const NOTSET: Level = Level(0);
    /// Detailed diagnostics
    pub const DEBUG: Level = Level(10);
    /// Normal operational messages
    pub const INFO: Level = Level(20);
    /// Custom level used by the echo primitive
    pub const ECHO: Level = Level(Self::INFO.0 + ECHO_OFFSET);
    /// Something unexpected but recoverable
    pub const WARNING: Level = Level(30);
    /// An operation failed
    pub const ERROR: Level = Level(40);
    /// The program cannot continue
    pub const CRITICAL: Level = Level(50);

    /// Create a level from its raw numeric value
    #[must_use]
    pub const fn new(value: u32) -> Self
    {
        Level(value)
    }

    /// Raw numeric value
    #[must_use]
    pub const fn value(self) -> u32
    {
        self.0
    }
}

impl From<u32> for Level
{
    fn from(value: u32) -> Self
    {
        Level(value)
    }
}

impl From<Level> for u32
{
    fn from(level: Level) -> Self
    {
        level.0
    }
}

/// Name from the process-wide registry (`Level <n>` when unnamed, which
/// includes ECHO until it has been registered)
impl fmt::Display for Level
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&LevelRegistry::global().level_name(*self))
    }
}

/// Case-insensitive name (or alias) as bound in the process-wide registry,
/// or a raw number.
///
/// Parsing `echo` registers the custom level first, so it fails with
/// `LevelConflict` when ECHO cannot be registered.
impl FromStr for Level
{
    type Err = EchologError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let trimmed = s.trim();
        if let Ok(value) = trimmed.parse::<u32>() {
            return Ok(Level(value));
        }

        let upper = trimmed.to_uppercase();
        let name = match upper.as_str() {
            "DBG" => "DEBUG",
            "WARN" => "WARNING",
            "ERR" => "ERROR",
            "FATAL" => "CRITICAL",
            other => other,
        };

        let registry = LevelRegistry::global();
        if name == ECHO_LEVEL_NAME {
            registry.ensure_custom_level_registered()?;
        }
        registry
            .level_for_name(name)
            .ok_or_else(|| EchologError::InvalidLevel(s.to_string()))
    }
}

/// Which tag set a formatter renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily
{
    /// Single punctuation characters
    Short,
    /// 4-5 character words
    Long,
}

/// One rung of the severity ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityLevel
{
    /// Canonical level name
    pub name: &'static str,
    /// Numeric severity
    pub level: Level,
    /// Tag used by the `short` format family
    pub short_tag: &'static str,
    /// Tag used by the `long` format family (unpadded)
    pub long_tag: &'static str,
}

/// The severity ladder, ordered from least to most severe.
pub const LEVEL_TABLE: [SeverityLevel; 6] = [
    SeverityLevel {
        name: "DEBUG",
        level: Level::DEBUG,
        short_tag: "/",
        long_tag: "DEBUG",
    },
    SeverityLevel {
        name: "INFO",
        level: Level::INFO,
        short_tag: "-",
        long_tag: "INFO",
    },
    SeverityLevel {
        name: "ECHO",
        level: Level::ECHO,
        short_tag: ">",
        long_tag: "ECHO",
    },
    SeverityLevel {
        name: "WARNING",
        level: Level::WARNING,
        short_tag: "!",
        long_tag: "WARN",
    },
    SeverityLevel {
        name: "ERROR",
        level: Level::ERROR,
        short_tag: "x",
        long_tag: "ERROR",
    },
    SeverityLevel {
        name: "CRITICAL",
        level: Level::CRITICAL,
        short_tag: "X",
        long_tag: "FATAL",
    },
];

/// Fallback entry for levels that are not on the ladder.
pub const NOTSET_ENTRY: SeverityLevel = SeverityLevel {
    name: "NOTSET",
    level: Level::NOTSET,
    short_tag: "?",
    long_tag: "UNSET",
};

impl SeverityLevel
{
    /// Find the ladder entry for `level`, including NOTSET.
    #[must_use]
    pub fn lookup(level: Level) -> Option<&'static SeverityLevel>
    {
        if level == Level::NOTSET {
            return Some(&NOTSET_ENTRY);
        }
        LEVEL_TABLE.iter().find(|entry| entry.level == level)
    }

    /// Raw (unpadded) tag for the given family
    #[must_use]
    pub const fn tag(&self, family: TagFamily) -> &'static str
    {
        match family {
            TagFamily::Short => self.short_tag,
            TagFamily::Long => self.long_tag,
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_ladder_is_strictly_increasing()
    {
        for pair in LEVEL_TABLE.windows(2) {
            assert!(pair[0].level < pair[1].level, "{} !< {}", pair[0].name, pair[1].name);
        }
    }

    #[test]
    fn test_echo_between_info_and_warning()
    {
        assert!(Level::INFO < Level::ECHO);
        assert!(Level::ECHO < Level::WARNING);
        assert_eq!(Level::ECHO.value(), 25);
    }

    #[test]
    fn test_level_from_str()
    {
        assert_eq!("debug".parse::<Level>().unwrap(), Level::DEBUG);
        assert_eq!("ECHO".parse::<Level>().unwrap(), Level::ECHO);
        assert_eq!("echo".parse::<Level>().unwrap(), Level::ECHO);
        assert_eq!("warn".parse::<Level>().unwrap(), Level::WARNING);
        assert_eq!("fatal".parse::<Level>().unwrap(), Level::CRITICAL);
        assert_eq!(" 17 ".parse::<Level>().unwrap(), Level::new(17));
        assert!(matches!("loud".parse::<Level>(), Err(EchologError::InvalidLevel(_))));
    }

    #[test]
    fn test_level_display_reads_registry()
    {
        assert_eq!(Level::WARNING.to_string(), "WARNING");
        assert_eq!(Level::new(17).to_string(), "Level 17");

        LevelRegistry::global().ensure_custom_level_registered().unwrap();
        assert_eq!(Level::ECHO.to_string(), "ECHO");
    }

    #[test]
    fn test_display_parse_agree_after_registration()
    {
        LevelRegistry::global().ensure_custom_level_registered().unwrap();
        for entry in &LEVEL_TABLE {
            assert_eq!(entry.level.to_string().parse::<Level>().unwrap(), entry.level);
        }
    }

    #[test]
    fn test_lookup()
    {
        assert_eq!(SeverityLevel::lookup(Level::new(33)), None);
        assert_eq!(SeverityLevel::lookup(Level::ERROR).map(|e| e.long_tag), Some("ERROR"));
        assert_eq!(SeverityLevel::lookup(Level::NOTSET).map(|e| e.short_tag), Some("?"));
    }
}
