//! Inspection options.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// Single-line combining policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compact {
    /// Never combine: one entry per indented line.
    Off,
    /// Combine up to this many nesting levels' worth of short output onto
    /// one line, and allow column grouping of array output.
    Level(usize),
}

impl Compact {
    /// The numeric level (0 for [`Compact::Off`]).
    #[must_use]
    pub const fn level(self) -> usize {
        match self {
            Self::Off => 0,
            Self::Level(n) => n,
        }
    }
}

/// Which accessor kind the inspector may evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GetterPolicy {
    /// Never invoke getters; render `[Getter]` markers.
    None,
    /// Invoke every getter.
    All,
    /// Invoke only getters without a paired setter.
    Get,
    /// Invoke only getters with a paired setter.
    Set,
}

/// Key ordering for sorted output.
#[derive(Clone)]
pub enum KeySort {
    /// Plain lexicographic ordering.
    Lexicographic,
    /// Caller-supplied comparator over formatted entries.
    Custom(KeyComparator),
}

impl fmt::Debug for KeySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexicographic => f.write_str("Lexicographic"),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// A shared comparator closure.
#[derive(Clone)]
pub struct KeyComparator(Rc<dyn Fn(&str, &str) -> Ordering>);

impl KeyComparator {
    /// Wrap a comparator closure.
    pub fn new(f: impl Fn(&str, &str) -> Ordering + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Compare two formatted entries.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        (self.0)(a, b)
    }
}

/// Configuration for one [`inspect_with`](crate::inspect::inspect_with) call.
///
/// Budgets (depth, collection length, string length, line width) are what
/// keep pathological input from producing unbounded output.
#[derive(Clone, Debug)]
pub struct InspectOptions {
    /// Include non-enumerable and symbol-keyed properties.
    pub show_hidden: bool,
    /// Maximum recursion depth; `None` means unlimited.
    pub depth: Option<usize>,
    /// Wrap category-tagged substrings in ANSI escape codes.
    pub colors: bool,
    /// Maximum array/collection entries before truncation; `None` means
    /// unlimited.
    pub max_array_length: Option<usize>,
    /// Maximum rendered string length before truncation; `None` means
    /// unlimited.
    pub max_string_length: Option<usize>,
    /// Soft line-wrap width.
    pub break_length: usize,
    /// Single-line combining policy.
    pub compact: Compact,
    /// Sort formatted entries before assembly.
    pub sorted: Option<KeySort>,
    /// Accessor evaluation policy.
    pub getters: GetterPolicy,
    /// Honor a value's self-describing inspection hook.
    pub custom_inspect: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            depth: Some(2),
            colors: false,
            max_array_length: Some(100),
            max_string_length: Some(10_000),
            break_length: 128,
            compact: Compact::Level(3),
            sorted: None,
            getters: GetterPolicy::None,
            custom_inspect: true,
        }
    }
}

impl InspectOptions {
    /// Default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether hidden (non-enumerable/symbol) properties are shown.
    #[must_use]
    pub const fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    /// Set the recursion depth budget (`None` = unlimited).
    #[must_use]
    pub const fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.depth = depth;
        self
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub const fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Set the collection-length budget (`None` = unlimited).
    #[must_use]
    pub const fn with_max_array_length(mut self, max: Option<usize>) -> Self {
        self.max_array_length = max;
        self
    }

    /// Set the string-length budget (`None` = unlimited).
    #[must_use]
    pub const fn with_max_string_length(mut self, max: Option<usize>) -> Self {
        self.max_string_length = max;
        self
    }

    /// Set the soft line-wrap width.
    #[must_use]
    pub const fn with_break_length(mut self, break_length: usize) -> Self {
        self.break_length = break_length;
        self
    }

    /// Set the single-line combining policy.
    #[must_use]
    pub const fn with_compact(mut self, compact: Compact) -> Self {
        self.compact = compact;
        self
    }

    /// Sort formatted entries before assembly.
    #[must_use]
    pub fn with_sorted(mut self, sorted: Option<KeySort>) -> Self {
        self.sorted = sorted;
        self
    }

    /// Set the accessor evaluation policy.
    #[must_use]
    pub const fn with_getters(mut self, getters: GetterPolicy) -> Self {
        self.getters = getters;
        self
    }

    /// Honor or ignore self-describing inspection hooks.
    #[must_use]
    pub const fn with_custom_inspect(mut self, custom_inspect: bool) -> Self {
        self.custom_inspect = custom_inspect;
        self
    }
}
