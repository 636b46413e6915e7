use std::fmt;
use std::io::{self, Write};

/// Header printed above every report, even an empty one.
pub const HEADER: &str = "File Information\n================\n\n";

/// One key/value row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered, append-only collection of entries for a single inspected path.
///
/// Insertion order is display order.  Keys are not deduplicated: adding the
/// same key twice produces two rows.
#[derive(Debug, Default, Clone)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push(Entry::new(key, value));
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = Entry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First value recorded under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Width of the widest key, in chars.  0 for an empty report.
    pub fn key_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.key.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Write the header followed by one aligned `key : value` row per entry.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(HEADER)?;
        let width = self.key_width();
        for entry in &self.entries {
            writeln!(f, "{:<width$} : {}", entry.key, entry.value)?;
        }
        Ok(())
    }
}
