use crate::http::message::{HttpMessage, Message};
use crate::http::uri::Uri;

/// An outgoing or incoming HTTP request: method and target over a
/// [`Message`].
#[derive(Debug)]
pub struct Request {
    method: String,
    uri: Uri,
    message: Message,
}

impl Request {
    pub fn new(method: &str, uri: Uri) -> Self {
        Self {
            method: method.to_string(),
            uri,
            message: Message::new(),
        }
    }

    /// Method exactly as given; methods are case-sensitive.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn set_method(&mut self, method: &str) {
        self.method = method.to_string();
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: Uri) {
        self.uri = uri;
    }

    /// Origin-form target: path plus `?query`, `/` when the path is empty.
    pub fn request_target(&self) -> String {
        let path = match self.uri.path() {
            "" => "/",
            path => path,
        };

        match self.uri.query() {
            "" => path.to_string(),
            query => format!("{path}?{query}"),
        }
    }
}

impl HttpMessage for Request {
    fn message(&self) -> &Message {
        &self.message
    }

    fn message_mut(&mut self) -> &mut Message {
        &mut self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_target_from_uri() {
        let req = Request::new("GET", Uri::new("http://example.com?x=1"));
        assert_eq!(req.request_target(), "/?x=1");

        let req = Request::new("GET", Uri::new("/a/b"));
        assert_eq!(req.request_target(), "/a/b");
    }

    #[test]
    fn request_carries_message_operations() {
        let mut req = Request::new("post", Uri::new("/"))
            .with_header("Host", "example.com")
            .unwrap();
        assert_eq!(req.method(), "post");
        req.set_method("POST");
        assert_eq!(req.method(), "POST");
        assert_eq!(req.header_line("host"), "example.com");
        assert_eq!(req.protocol_version(), "1.1");
    }
}
