//! Culture-specific number formatting.

use std::borrow::Cow;

/// Format provider consulted when parsing numeric text.
///
/// Only the decimal separator takes part in parsing. Group separators are
/// recorded for completeness but never accepted in input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Culture {
    name: &'static str,
    decimal_separator: char,
    group_separator: char,
}

/// Known cultures: `(name, decimal separator, group separator)`.
const KNOWN: &[(&str, char, char)] = &[
    ("en", '.', ','),
    ("en-US", '.', ','),
    ("en-GB", '.', ','),
    ("ja-JP", '.', ','),
    ("zh-CN", '.', ','),
    ("de", ',', '.'),
    ("de-DE", ',', '.'),
    ("de-AT", ',', '.'),
    ("de-CH", '.', '\''),
    ("es", ',', '.'),
    ("es-ES", ',', '.'),
    ("it", ',', '.'),
    ("it-IT", ',', '.'),
    ("nl", ',', '.'),
    ("nl-NL", ',', '.'),
    ("pt-BR", ',', '.'),
    ("fr", ',', '\u{202f}'),
    ("fr-FR", ',', '\u{202f}'),
    ("ru", ',', '\u{a0}'),
    ("ru-RU", ',', '\u{a0}'),
    ("pl-PL", ',', '\u{a0}'),
];

impl Culture {
    /// The invariant culture: `.` decimal separator, `,` group separator.
    pub const INVARIANT: Self = Self::new("", '.', ',');

    /// A culture using `,` as decimal separator (German conventions).
    pub const GERMAN: Self = Self::new("de-DE", ',', '.');

    /// Create a culture with explicit separators.
    pub const fn new(name: &'static str, decimal_separator: char, group_separator: char) -> Self {
        Self {
            name,
            decimal_separator,
            group_separator,
        }
    }

    /// Look up a culture by its BCP 47 name (`"de-DE"`, `"en"`).
    ///
    /// The empty name resolves to [`Culture::INVARIANT`]. Lookup is
    /// case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() {
            return Some(Self::INVARIANT);
        }
        KNOWN
            .iter()
            .find(|(known, _, _)| known.eq_ignore_ascii_case(name))
            .map(|&(known, decimal, group)| Self::new(known, decimal, group))
    }

    /// Culture name; empty for the invariant culture.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Character separating the integral and fractional parts.
    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    /// Character separating digit groups when formatting.
    pub fn group_separator(&self) -> char {
        self.group_separator
    }

    /// Whether this is the invariant culture.
    pub fn is_invariant(&self) -> bool {
        self.name.is_empty()
    }

    /// Rewrite the culture's decimal separator to `.`.
    ///
    /// Text that already uses `.` is borrowed unchanged.
    pub(crate) fn normalize_decimal<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.decimal_separator == '.' || !text.contains(self.decimal_separator) {
            return Cow::Borrowed(text);
        }
        Cow::Owned(text.replace(self.decimal_separator, "."))
    }
}

impl Default for Culture {
    fn default() -> Self {
        Self::INVARIANT
    }
}
