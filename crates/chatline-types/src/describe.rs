//! Debug rendering for timeline items.
//!
//! Each item describes itself as an ordered list of `key: value` lines.
//! Fragments are values, built and concatenated without touching a shared
//! buffer, so the shared block always comes first regardless of call order.
//! The text is for logs and diagnostics only; nothing parses it.

use std::fmt;

/// Ordered `key: value` lines describing an item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugFields {
    lines: Vec<(&'static str, String)>,
}

impl DebugFields {
    /// An empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn field(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.lines.push((key, value.to_string()));
        self
    }

    /// Append an optional value, rendered as `none` when absent.
    pub fn opt_field<T: fmt::Display>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.field(key, v),
            None => self.field(key, "none"),
        }
    }

    /// Append every line of another fragment.
    pub fn extend(mut self, other: DebugFields) -> Self {
        self.lines.extend(other.lines);
        self
    }

    /// Look up a value by key (first match).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lines.iter().map(|(k, _)| *k)
    }
}

impl fmt::Display for DebugFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.lines {
            writeln!(f, "  {key}: {value}")?;
        }
        Ok(())
    }
}
