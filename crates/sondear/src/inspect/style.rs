//! ANSI styling for inspected output.
//!
//! Escape codes are data here: every style is an SGR on/off pair, applied
//! only when colors are requested, and stripped back out when measuring
//! line widths for wrapping decisions.

use std::sync::OnceLock;

use regex::Regex;

/// Category style tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Strings (green).
    Str,
    /// Numbers (yellow).
    Number,
    /// BigInts (yellow).
    BigInt,
    /// Booleans (yellow).
    Boolean,
    /// Undefined and hole markers (grey).
    Undefined,
    /// Null (bold).
    Null,
    /// Symbols (green).
    Symbol,
    /// Dates (magenta).
    Date,
    /// Regular expressions (red).
    RegExp,
    /// Structural markers: circular refs, placeholders, accessors (cyan).
    Special,
}

impl Style {
    /// SGR on/off pair.
    const fn codes(self) -> (&'static str, &'static str) {
        match self {
            Self::Str | Self::Symbol => ("32", "39"),
            Self::Number | Self::BigInt | Self::Boolean => ("33", "39"),
            Self::Undefined => ("90", "39"),
            Self::Null => ("1", "22"),
            Self::Date => ("35", "39"),
            Self::RegExp => ("31", "39"),
            Self::Special => ("36", "39"),
        }
    }
}

/// Diff colors used by the error-diff formatter.
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const BLUE: &str = "\x1b[34m";
pub(crate) const WHITE: &str = "\x1b[39m";

/// Wrap `text` in the style's SGR pair when `colors` is on.
#[must_use]
pub(crate) fn stylize(text: &str, style: Style, colors: bool) -> String {
    if !colors {
        return text.to_owned();
    }
    let (on, off) = style.codes();
    format!("\x1b[{on}m{text}\x1b[{off}m")
}

fn ansi_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("\u{1b}\\[[0-9;]*m").unwrap())
}

/// Visible width of a rendered entry (ANSI escapes excluded).
#[must_use]
pub(crate) fn display_width(text: &str) -> usize {
    if text.contains('\u{1b}') {
        ansi_pattern().replace_all(text, "").chars().count()
    } else {
        text.chars().count()
    }
}
