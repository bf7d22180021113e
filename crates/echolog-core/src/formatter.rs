//! # Color Formatter
//!
//! Level-dependent, colorized line templates in four variants.
//!
//! | variant      | header                  | example                  |
//! |--------------|-------------------------|--------------------------|
//! | `short`      | `[tag]`                 | `[>]`                    |
//! | `short-time` | `time [tag]`            | `12:00:01.042 [>]`       |
//! | `long`       | `pad[tag]`              | ` [ECHO]`                |
//! | `long-time`  | `[time padtag]`         | `[12:00:01.042  ECHO]`   |
//!
//! The header is wrapped in the level's color and a reset code, then followed
//! by a space and the message. Long tags that are four characters wide get one
//! leading space so every long header has the same width.
//!
//! Tags belong to the formatter instance. Two loggers configured with
//! different variants never interfere with each other's level names, and the
//! shared level namespace is left alone.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::colors;
use crate::error::EchologError;
use crate::levels::{Level, SeverityLevel, TagFamily, LEVEL_TABLE, NOTSET_ENTRY};
use crate::logger::Record;

/// chrono format for the `-time` variants
pub const TIME_FORMAT: &str = "%H:%M:%S%.3f";

/// Long-family tags at this width get a leading space
const SHORT_LONG_TAG_WIDTH: usize = 4;

/// One of the four presentation styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatSpec
{
    /// `[>]`
    Short,
    /// `12:00:01.042 [>]` (default)
    #[default]
    ShortTime,
    /// ` [ECHO]`
    Long,
    /// `[12:00:01.042  ECHO]`
    LongTime,
}

impl FormatSpec
{
    /// Every variant, in the order the demo walks them
    pub const ALL: [FormatSpec; 4] = [FormatSpec::ShortTime, FormatSpec::Short, FormatSpec::LongTime, FormatSpec::Long];

    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str
    {
        match self {
            FormatSpec::Short => "short",
            FormatSpec::ShortTime => "short-time",
            FormatSpec::Long => "long",
            FormatSpec::LongTime => "long-time",
        }
    }

    /// Tag family used by this variant
    #[must_use]
    pub const fn family(self) -> TagFamily
    {
        match self {
            FormatSpec::Short | FormatSpec::ShortTime => TagFamily::Short,
            FormatSpec::Long | FormatSpec::LongTime => TagFamily::Long,
        }
    }

    /// Whether the header carries a timestamp
    #[must_use]
    pub const fn has_time(self) -> bool
    {
        matches!(self, FormatSpec::ShortTime | FormatSpec::LongTime)
    }
}

impl fmt::Display for FormatSpec
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatSpec
{
    type Err = EchologError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s {
            "short" => Ok(FormatSpec::Short),
            "short-time" => Ok(FormatSpec::ShortTime),
            "long" => Ok(FormatSpec::Long),
            "long-time" => Ok(FormatSpec::LongTime),
            _ => Err(EchologError::InvalidFormat(s.to_string())),
        }
    }
}

/// Color and tag for one level, fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
struct LevelStyle
{
    color: &'static str,
    pad: &'static str,
    tag: &'static str,
}

impl LevelStyle
{
    fn new(entry: &SeverityLevel, family: TagFamily) -> Self
    {
        let tag = entry.tag(family);
        let pad = if family == TagFamily::Long && tag.len() == SHORT_LONG_TAG_WIDTH {
            " "
        } else {
            ""
        };
        Self {
            color: level_color(entry.level),
            pad,
            tag,
        }
    }
}

/// Header color for each ladder level
fn level_color(level: Level) -> &'static str
{
    match level {
        Level::DEBUG => colors::BLUE,
        Level::INFO => colors::GREEN,
        Level::ECHO => colors::MAGENTA,
        Level::WARNING => colors::YELLOW,
        Level::ERROR => colors::RED,
        Level::CRITICAL => colors::BG_RED,
        _ => colors::GRAY,
    }
}

/// Renders records into colorized single lines
#[derive(Debug, Clone)]
pub struct ColorFormatter
{
    spec: FormatSpec,
    styles: BTreeMap<Level, LevelStyle>,
    fallback: LevelStyle,
    colored: bool,
}

impl ColorFormatter
{
    /// Build a colored formatter for `spec`
    #[must_use]
    pub fn new(spec: FormatSpec) -> Self
    {
        Self::with_color(spec, true)
    }

    /// Build a formatter, emitting color escapes only if `colored`
    #[must_use]
    pub fn with_color(spec: FormatSpec, colored: bool) -> Self
    {
        let family = spec.family();
        let styles = LEVEL_TABLE
            .iter()
            .map(|entry| (entry.level, LevelStyle::new(entry, family)))
            .collect();
        Self {
            spec,
            styles,
            fallback: LevelStyle::new(&NOTSET_ENTRY, family),
            colored,
        }
    }

    /// Variant this formatter renders
    #[must_use]
    pub const fn spec(&self) -> FormatSpec
    {
        self.spec
    }

    /// Whether color escapes are emitted
    #[must_use]
    pub const fn is_colored(&self) -> bool
    {
        self.colored
    }

    fn style(&self, level: Level) -> &LevelStyle
    {
        self.styles.get(&level).unwrap_or(&self.fallback)
    }

    /// Tag rendered for `level`, including alignment padding
    #[must_use]
    pub fn padded_tag(&self, level: Level) -> String
    {
        let style = self.style(level);
        format!("{}{}", style.pad, style.tag)
    }

    /// Header color for `level` (gray for levels off the ladder)
    #[must_use]
    pub fn color(&self, level: Level) -> &'static str
    {
        self.style(level).color
    }

    /// Render one record as a line of text (no trailing newline)
    #[must_use]
    pub fn render(&self, record: &Record) -> String
    {
        let style = self.style(record.level());
        let LevelStyle { pad, tag, .. } = style;
        let header = match self.spec {
            FormatSpec::Short => format!("[{tag}]"),
            FormatSpec::ShortTime => format!("{} [{tag}]", record.timestamp().format(TIME_FORMAT)),
            FormatSpec::Long => format!("{pad}[{tag}]"),
            FormatSpec::LongTime => format!("[{} {pad}{tag}]", record.timestamp().format(TIME_FORMAT)),
        };

        if self.colored {
            format!("{}{header}{} {}", style.color, colors::RESET, record.message())
        } else {
            format!("{header} {}", record.message())
        }
    }
}
