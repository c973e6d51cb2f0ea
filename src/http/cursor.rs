//! Cursor-style traversal over header names and values.
//!
//! Both sequences own a snapshot of the data taken when they were created,
//! so mutating the originating [`HeaderBag`](crate::http::headers::HeaderBag)
//! afterwards never changes what a sequence in flight yields.
//!
//! ```
//! use rustynet_message::{HttpMessage, Message};
//!
//! let mut msg = Message::new();
//! msg.set_header("Accept", "text/html").unwrap();
//! msg.add_header("Accept", "application/json").unwrap();
//!
//! let mut headers = msg.headers();
//! while headers.next() {
//!     let mut values = headers.values().unwrap();
//!     while values.next() {
//!         println!("{}: {}", headers.name().unwrap(), values.value().unwrap());
//!     }
//! }
//! ```

use crate::error::{MessageError, MessageResult};
use crate::http::headers::HeaderEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NotStarted,
    Positioned(usize),
    Exhausted,
}

impl CursorState {
    fn advance(&mut self, len: usize) -> bool {
        let next = match *self {
            CursorState::NotStarted => 0,
            CursorState::Positioned(i) => i + 1,
            CursorState::Exhausted => return false,
        };

        if next < len {
            *self = CursorState::Positioned(next);
            true
        } else {
            *self = CursorState::Exhausted;
            false
        }
    }

    fn position(&self) -> MessageResult<usize> {
        match *self {
            CursorState::Positioned(i) => Ok(i),
            state => Err(MessageError::InvalidCursorState(state)),
        }
    }
}

/// Iterates over the values of a single header.
#[derive(Debug, Clone)]
pub struct ValueSequence {
    values: Vec<String>,
    state: CursorState,
}

impl ValueSequence {
    pub(crate) fn new(values: Vec<String>) -> Self {
        Self {
            values,
            state: CursorState::NotStarted,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Moves to the next value. Must be called at least once before
    /// [`value`](Self::value) can be read.
    pub fn next(&mut self) -> bool {
        self.state.advance(self.values.len())
    }

    pub fn reset(&mut self) {
        self.state = CursorState::NotStarted;
    }

    pub fn value(&self) -> MessageResult<&str> {
        let i = self.state.position()?;
        Ok(&self.values[i])
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Standard iterator over the snapshot; does not touch the cursor.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }
}

/// Iterates over all headers of a message in insertion order.
#[derive(Debug, Clone)]
pub struct HeaderSequence {
    entries: Vec<HeaderEntry>,
    state: CursorState,
}

impl HeaderSequence {
    pub(crate) fn new(entries: Vec<HeaderEntry>) -> Self {
        Self {
            entries,
            state: CursorState::NotStarted,
        }
    }

    /// Moves to the next header. Must be called at least once before
    /// [`name`](Self::name) or [`values`](Self::values) can be read.
    pub fn next(&mut self) -> bool {
        self.state.advance(self.entries.len())
    }

    pub fn reset(&mut self) {
        self.state = CursorState::NotStarted;
    }

    /// Name of the current header, in the case it was last set with.
    pub fn name(&self) -> MessageResult<&str> {
        let i = self.state.position()?;
        Ok(self.entries[i].name())
    }

    /// A fresh value sequence over the current header.
    pub fn values(&self) -> MessageResult<ValueSequence> {
        let i = self.state.position()?;
        Ok(ValueSequence::new(self.entries[i].values().to_vec()))
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderEntry> {
        self.entries.iter()
    }
}
