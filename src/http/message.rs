//! The parts common to requests and responses: protocol version, headers
//! and body.
//!
//! Every message kind owns a [`Message`] and exposes it through the
//! [`HttpMessage`] trait, which carries all header, body and protocol
//! operations as provided methods.
//!
//! Mutators take `&mut self`, so the borrow checker guarantees that the
//! caller holds the only handle able to observe a change. The consuming
//! `with_*` builders give the value-style form: they take the message by
//! value and return the modified one.

use tracing::debug;

use crate::config::config;
use crate::error::{MessageError, MessageResult};
use crate::http::cursor::{HeaderSequence, ValueSequence};
use crate::http::headers::HeaderBag;
use crate::http::stream::{MemoryStream, Stream};

pub struct Message {
    protocol_version: String,
    headers: HeaderBag,
    body: Box<dyn Stream>,
}

impl Message {
    /// An empty message with the configured protocol version, no headers
    /// and an empty in-memory body.
    pub fn new() -> Self {
        Self {
            protocol_version: config().protocol_version.clone(),
            headers: HeaderBag::new(),
            body: Box::new(MemoryStream::new()),
        }
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Message")
            .field("protocol_version", &self.protocol_version)
            .field("headers", &self.headers)
            .field("body_size", &self.body.size())
            .finish()
    }
}

pub trait HttpMessage {
    fn message(&self) -> &Message;
    fn message_mut(&mut self) -> &mut Message;

    /// Version number only, e.g. `"1.1"`.
    fn protocol_version(&self) -> &str {
        &self.message().protocol_version
    }

    fn set_protocol_version(&mut self, version: &str) {
        self.message_mut().protocol_version = version.to_string();
    }

    fn header_bag(&self) -> &HeaderBag {
        &self.message().headers
    }

    /// All headers in insertion order, names in the case last set.
    fn headers(&self) -> HeaderSequence {
        self.message().headers.all()
    }

    fn has_header(&self, name: &str) -> bool {
        self.message().headers.has(name)
    }

    /// Values of a header; empty when the header is absent.
    fn header(&self, name: &str) -> ValueSequence {
        self.message().headers.values(name)
    }

    /// Values of a header joined with `", "`; empty when absent.
    fn header_line(&self, name: &str) -> String {
        self.message().headers.line(name)
    }

    fn set_header(&mut self, name: &str, value: &str) -> MessageResult<()> {
        self.message_mut().headers.set(name, value)
    }

    fn add_header(&mut self, name: &str, value: &str) -> MessageResult<()> {
        self.message_mut().headers.append(name, value)
    }

    fn remove_header(&mut self, name: &str) {
        self.message_mut().headers.remove(name)
    }

    fn body(&mut self) -> &mut dyn Stream {
        self.message_mut().body.as_mut()
    }

    fn body_ref(&self) -> &dyn Stream {
        self.message().body.as_ref()
    }

    /// Takes ownership of `body`. The previous body is closed and dropped.
    fn set_body(&mut self, body: Box<dyn Stream>) -> MessageResult<()> {
        if body.is_closed() {
            return Err(MessageError::InvalidBody("stream is closed".to_string()));
        }

        let message = self.message_mut();
        let mut previous = std::mem::replace(&mut message.body, body);
        if let Err(err) = previous.close() {
            debug!(%err, "previous body failed to close cleanly");
        }
        debug!(size = ?message.body.size(), "message body replaced");
        Ok(())
    }

    fn with_protocol_version(mut self, version: &str) -> Self
    where
        Self: Sized,
    {
        self.set_protocol_version(version);
        self
    }

    fn with_header(mut self, name: &str, value: &str) -> MessageResult<Self>
    where
        Self: Sized,
    {
        self.set_header(name, value)?;
        Ok(self)
    }

    fn with_added_header(mut self, name: &str, value: &str) -> MessageResult<Self>
    where
        Self: Sized,
    {
        self.add_header(name, value)?;
        Ok(self)
    }

    fn without_header(mut self, name: &str) -> Self
    where
        Self: Sized,
    {
        self.remove_header(name);
        self
    }

    fn with_body(mut self, body: Box<dyn Stream>) -> MessageResult<Self>
    where
        Self: Sized,
    {
        self.set_body(body)?;
        Ok(self)
    }
}

impl HttpMessage for Message {
    fn message(&self) -> &Message {
        self
    }

    fn message_mut(&mut self) -> &mut Message {
        self
    }
}
