//! HTTP message model: requests, responses and the server-side request.
//!
//! Messages own their headers and body. Headers are looked up without
//! regard to case but keep the exact case they were set with; the body is
//! any seekable [`Stream`]. A [`ServerRequest`] adds the tables a server
//! derives from an incoming request (server params, cookies, query and body
//! parameters, uploaded files and attributes).
//!
//! ```
//! use rustynet_message::{HttpMessage, ServerRequest, Uri};
//!
//! let mut req = ServerRequest::new("GET", Uri::new("/users?page=2"), [("REMOTE_ADDR", "10.0.0.1")]);
//! req.set_header("Accept", "text/html").unwrap();
//! req.add_header("accept", "application/json").unwrap();
//! req.parse_query_string();
//!
//! assert_eq!(req.header_line("ACCEPT"), "text/html, application/json");
//! assert_eq!(req.query_param("page"), "2");
//! assert_eq!(req.attribute("user", "anonymous"), "anonymous");
//! ```

pub mod config;
pub mod error;
pub mod http;

pub use config::{MessageConfig, config, set_config};
pub use error::{MessageError, MessageResult};
pub use http::ParamTable;
pub use http::cursor::{CursorState, HeaderSequence, ValueSequence};
pub use http::headers::{HeaderBag, HeaderEntry};
pub use http::message::{HttpMessage, Message};
pub use http::request::Request;
pub use http::response::Response;
pub use http::server_request::ServerRequest;
pub use http::status::HttpStatus;
pub use http::stream::{FileStream, MemoryStream, Stream};
pub use http::uploaded_file::{UploadStatus, UploadedFile};
pub use http::uri::Uri;
