//! Server-side view of an incoming request.
//!
//! On top of a [`Request`], a [`ServerRequest`] carries what the server
//! knows about the request: the server parameters it was constructed with,
//! cookie and query parameters, body parameters, uploaded files and
//! application-defined attributes.
//!
//! Construction stores method, URI and server parameters verbatim. The
//! other tables start empty and are filled either by hand through the
//! setters or by the explicit `parse_*` calls.
//!
//! Body parameters and uploaded files are gated on the request: they are
//! only exposed for `POST` requests whose *current* Content-Type media type
//! allows them. The gate is evaluated on every read, so changing the
//! Content-Type header after the tables were filled hides or reveals them
//! accordingly. The tables themselves are never cleared by the gate.

use std::collections::HashMap;
use std::io::{Seek, SeekFrom};

use tracing::debug;

use crate::config::{MessageConfig, config};
use crate::error::{MessageError, MessageResult};
use crate::http::form::{self, FORM_URLENCODED, MULTIPART_FORM_DATA};
use crate::http::message::{HttpMessage, Message};
use crate::http::multipart;
use crate::http::request::Request;
use crate::http::stream::Stream;
use crate::http::uploaded_file::UploadedFile;
use crate::http::uri::Uri;
use crate::http::ParamTable;

const POST: &str = "POST";

#[derive(Debug)]
pub struct ServerRequest {
    request: Request,
    server_params: ParamTable,
    cookie_params: ParamTable,
    query_params: ParamTable,
    uploaded_files: HashMap<String, UploadedFile>,
    body_params: ParamTable,
    attributes: ParamTable,
}

fn lookup<'a>(table: &'a ParamTable, name: &str) -> &'a str {
    table.get(name).map(String::as_str).unwrap_or("")
}

impl ServerRequest {
    /// Server parameters are taken exactly as given; neither the method nor
    /// the URI is derived from them.
    pub fn new<I, K, V>(method: &str, uri: Uri, server_params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            request: Request::new(method, uri),
            server_params: server_params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            cookie_params: ParamTable::new(),
            query_params: ParamTable::new(),
            uploaded_files: HashMap::new(),
            body_params: ParamTable::new(),
            attributes: ParamTable::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn method(&self) -> &str {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn request_target(&self) -> String {
        self.request.request_target()
    }

    // Server params

    pub fn server_param(&self, name: &str) -> &str {
        lookup(&self.server_params, name)
    }

    pub fn server_params(&self) -> &ParamTable {
        &self.server_params
    }

    // Cookies

    pub fn cookie_param(&self, name: &str) -> &str {
        lookup(&self.cookie_params, name)
    }

    pub fn cookie_params(&self) -> &ParamTable {
        &self.cookie_params
    }

    pub fn set_cookie_params(&mut self, cookies: ParamTable) {
        self.cookie_params = cookies;
    }

    /// Fills the cookie table from the current `Cookie` header(s).
    pub fn parse_cookie_header(&mut self) {
        let header = self
            .header_bag()
            .get("Cookie")
            .map(|entry| entry.values().join("; "))
            .unwrap_or_default();
        self.cookie_params = form::parse_cookies(&header);
    }

    // Query

    /// Decoded query parameter. May disagree with `uri().query()` when the
    /// table was set by hand.
    pub fn query_param(&self, name: &str) -> &str {
        lookup(&self.query_params, name)
    }

    pub fn query_params(&self) -> &ParamTable {
        &self.query_params
    }

    pub fn set_query_params(&mut self, query: ParamTable) {
        self.query_params = query;
    }

    /// Fills the query table from the URI's query string.
    pub fn parse_query_string(&mut self) {
        self.query_params = form::parse_query(self.request.uri().query());
    }

    // Body

    fn content_media_type(&self) -> String {
        self.header_bag()
            .first("Content-Type")
            .map(form::media_type)
            .unwrap_or_default()
    }

    fn exposes_body_params(&self) -> bool {
        self.method() == POST
            && matches!(
                self.content_media_type().as_str(),
                FORM_URLENCODED | MULTIPART_FORM_DATA
            )
    }

    fn exposes_uploaded_files(&self) -> bool {
        self.method() == POST && self.content_media_type() == MULTIPART_FORM_DATA
    }

    /// Body parameter, or `""` unless this is a `POST` with an urlencoded or
    /// multipart Content-Type.
    pub fn body_param(&self, name: &str) -> &str {
        if !self.exposes_body_params() {
            return "";
        }
        lookup(&self.body_params, name)
    }

    /// The body table under the same gate as [`body_param`](Self::body_param).
    pub fn body_params(&self) -> Option<&ParamTable> {
        self.exposes_body_params().then_some(&self.body_params)
    }

    pub fn set_body_params(&mut self, params: ParamTable) {
        self.body_params = params;
    }

    /// Uploaded file, or `None` unless this is a multipart `POST`.
    pub fn uploaded_file(&self, name: &str) -> Option<&UploadedFile> {
        if !self.exposes_uploaded_files() {
            return None;
        }
        self.uploaded_files.get(name)
    }

    pub fn uploaded_file_mut(&mut self, name: &str) -> Option<&mut UploadedFile> {
        if !self.exposes_uploaded_files() {
            return None;
        }
        self.uploaded_files.get_mut(name)
    }

    pub fn uploaded_files(&self) -> Option<&HashMap<String, UploadedFile>> {
        self.exposes_uploaded_files().then_some(&self.uploaded_files)
    }

    pub fn set_uploaded_files(&mut self, files: HashMap<String, UploadedFile>) {
        self.uploaded_files = files;
    }

    /// Parses the body stream with the process-wide config.
    pub fn parse_body(&mut self) -> MessageResult<()> {
        self.parse_body_with(config())
    }

    /// Decodes the body into body parameters (and uploaded files for
    /// multipart) when the request passes the gate; otherwise does nothing.
    /// The body is rewound afterwards. On error the tables are unchanged.
    pub fn parse_body_with(&mut self, cfg: &MessageConfig) -> MessageResult<()> {
        if !self.exposes_body_params() {
            debug!(method = %self.method(), "body not parsed, request not a form post");
            return Ok(());
        }

        let content_type = self
            .header_bag()
            .first("Content-Type")
            .unwrap_or_default()
            .to_string();
        let limit = cfg.max_body_size;

        let body = self.body();
        if body.size().is_some_and(|size| size > limit as u64) {
            return Err(MessageError::BodyTooLarge { limit });
        }
        body.seek(SeekFrom::Start(0))?;
        let bytes = body.read_bytes(limit.saturating_add(1))?;
        body.seek(SeekFrom::Start(0))?;
        if bytes.len() > limit {
            return Err(MessageError::BodyTooLarge { limit });
        }

        if form::media_type(&content_type) == FORM_URLENCODED {
            self.body_params = form::parse_form_body(&bytes);
            self.uploaded_files = HashMap::new();
            debug!(params = self.body_params.len(), "urlencoded body parsed");
            return Ok(());
        }

        let boundary = multipart::boundary(&content_type).ok_or_else(|| {
            MessageError::MalformedMultipart("missing boundary parameter".to_string())
        })?;
        let parsed = multipart::parse(&bytes, &boundary, cfg)?;
        self.body_params = parsed.fields;
        self.uploaded_files = parsed.files;
        debug!(
            params = self.body_params.len(),
            files = self.uploaded_files.len(),
            "multipart body parsed"
        );
        Ok(())
    }

    // Attributes

    /// Attribute value, or `default` when it was never set.
    pub fn attribute<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attributes
            .get(name)
            .map(String::as_str)
            .unwrap_or(default)
    }

    pub fn attributes(&self) -> &ParamTable {
        &self.attributes
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn without_attribute(mut self, name: &str) -> Self {
        self.remove_attribute(name);
        self
    }
}

impl HttpMessage for ServerRequest {
    fn message(&self) -> &Message {
        self.request.message()
    }

    fn message_mut(&mut self) -> &mut Message {
        self.request.message_mut()
    }
}
