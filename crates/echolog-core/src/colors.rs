//! ANSI color escape codes (bold variants).

/// Red
pub const RED: &str = "\x1b[31;1m";
/// Green
pub const GREEN: &str = "\x1b[32;1m";
/// Yellow
pub const YELLOW: &str = "\x1b[33;1m";
/// Blue
pub const BLUE: &str = "\x1b[34;1m";
/// Magenta
pub const MAGENTA: &str = "\x1b[35;1m";
/// Cyan
pub const CYAN: &str = "\x1b[36;1m";
/// Gray (bright black)
pub const GRAY: &str = "\x1b[90;1m";
/// Red background
pub const BG_RED: &str = "\x1b[41;1m";
/// Reset all attributes
pub const RESET: &str = "\x1b[0m";

/// Wrap `text` in `color` and a reset code, or return it untouched.
#[must_use]
pub fn paint(color: &str, text: &str, enabled: bool) -> String
{
    if enabled {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}
