//! HTTP headers abstraction shared by every message kind.
//!
//! Headers are stored in an ordered map keyed by the lowercase header name,
//! so lookup, existence checks and removal are case-insensitive while
//! iteration keeps first-seen order. Each entry remembers the exact case the
//! name was last `set` with, which is what goes back on the wire.
//!
//! Names and values are checked by the [`validator`](crate::http::validator)
//! module before anything is stored; a rejected call leaves the bag as it was.

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::MessageResult;
use crate::http::cursor::{HeaderSequence, ValueSequence};
use crate::http::validator::Validator;

/// One named, multi-valued header line group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

impl HeaderEntry {
    fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            values: vec![value.to_string()],
        }
    }

    /// Name as it will be sent over the wire.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Values joined with `", "` in insertion order.
    pub fn line(&self) -> String {
        self.values.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    headers: IndexMap<String, HeaderEntry>,
}

fn canonical(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.headers.contains_key(&canonical(name))
    }

    /// Replaces all values of `name` with `value`. The display name takes
    /// the casing of this call; the header keeps its position.
    pub fn set(&mut self, name: &str, value: &str) -> MessageResult<()> {
        Validator::validate(name, value)?;

        match self.headers.entry(canonical(name)) {
            Entry::Occupied(mut entry) => {
                let entry = entry.get_mut();
                entry.name = name.to_string();
                entry.values = vec![value.to_string()];
            }
            Entry::Vacant(entry) => {
                entry.insert(HeaderEntry::new(name, value));
            }
        }
        Ok(())
    }

    /// Adds `value` after the existing values of `name`, or inserts the
    /// header if it is not present yet.
    pub fn append(&mut self, name: &str, value: &str) -> MessageResult<()> {
        Validator::validate(name, value)?;

        match self.headers.entry(canonical(name)) {
            Entry::Occupied(mut entry) => entry.get_mut().values.push(value.to_string()),
            Entry::Vacant(entry) => {
                entry.insert(HeaderEntry::new(name, value));
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) {
        self.headers.shift_remove(&canonical(name));
    }

    pub fn get(&self, name: &str) -> Option<&HeaderEntry> {
        self.headers.get(&canonical(name))
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|entry| entry.values.first())
            .map(String::as_str)
    }

    /// Comma-joined values of `name`, or an empty string when absent.
    pub fn line(&self, name: &str) -> String {
        self.get(name).map(HeaderEntry::line).unwrap_or_default()
    }

    pub fn values(&self, name: &str) -> ValueSequence {
        match self.get(name) {
            Some(entry) => ValueSequence::new(entry.values.clone()),
            None => ValueSequence::empty(),
        }
    }

    pub fn all(&self) -> HeaderSequence {
        HeaderSequence::new(self.headers.values().cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.headers.values()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

impl fmt::Display for HeaderBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.headers.values() {
            write!(f, "{}: {}\r\n", entry.name, entry.line())?;
        }
        Ok(())
    }
}
