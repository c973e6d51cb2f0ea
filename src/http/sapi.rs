//! Builds a [`ServerRequest`] from a flat table of server (CGI-style)
//! parameters, the way a gateway hands them to an application.
//!
//! This is the transport adapter that sits in front of
//! [`ServerRequest::new`]: it works out the method, URI, protocol version
//! and headers from the table, then passes the table on untouched.

use tracing::{debug, warn};

use crate::http::message::HttpMessage;
use crate::http::server_request::ServerRequest;
use crate::http::uri::Uri;
use crate::http::ParamTable;

const DEFAULT_METHOD: &str = "GET";

/// `HTTP_ACCEPT_LANGUAGE` -> `Accept-Language`
fn header_name(var: &str) -> String {
    var.split('_')
        .map(|word| {
            let lower = word.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn request_uri(params: &ParamTable) -> String {
    if let Some(uri) = params.get("REQUEST_URI").filter(|u| !u.is_empty()) {
        return uri.clone();
    }

    let script = params.get("SCRIPT_NAME").map(String::as_str).unwrap_or("");
    let path_info = params.get("PATH_INFO").map(String::as_str).unwrap_or("");
    let mut uri = format!("{script}{path_info}");
    if uri.is_empty() {
        uri.push('/');
    }

    match params.get("QUERY_STRING").filter(|q| !q.is_empty()) {
        Some(query) => format!("{uri}?{query}"),
        None => uri,
    }
}

/// Derives a request from server parameters and fills its cookie and query
/// tables. Headers that fail validation are skipped with a warning.
/// Headers are added sorted by name, not in the server's order.
pub fn from_server_params(params: ParamTable) -> ServerRequest {
    let method = params
        .get("REQUEST_METHOD")
        .filter(|m| !m.is_empty())
        .cloned()
        .unwrap_or_else(|| DEFAULT_METHOD.to_string());
    let uri = Uri::new(&request_uri(&params));

    let protocol_version = params
        .get("SERVER_PROTOCOL")
        .and_then(|p| p.strip_prefix("HTTP/"))
        .map(str::to_string);

    // Sorted so the header order does not depend on hash iteration order.
    let mut headers: Vec<(String, &String)> = params
        .iter()
        .filter_map(|(key, value)| match key.as_str() {
            "CONTENT_TYPE" => Some(("Content-Type".to_string(), value)),
            "CONTENT_LENGTH" => Some(("Content-Length".to_string(), value)),
            _ => key
                .strip_prefix("HTTP_")
                .filter(|name| !name.is_empty())
                .map(|name| (header_name(name), value)),
        })
        .filter(|(_, value)| !value.is_empty())
        .collect();
    headers.sort();

    let headers: Vec<(String, String)> = headers
        .into_iter()
        .map(|(name, value)| (name, value.clone()))
        .collect();

    let mut req = ServerRequest::new(&method, uri, params);
    if let Some(version) = protocol_version {
        req.set_protocol_version(&version);
    }
    for (name, value) in &headers {
        if let Err(err) = req.set_header(name, value) {
            warn!(%name, %err, "server param header skipped");
        }
    }

    req.parse_cookie_header();
    req.parse_query_string();
    debug!(method = %req.method(), uri = %req.uri(), headers = headers.len(), "server request built");
    req
}
