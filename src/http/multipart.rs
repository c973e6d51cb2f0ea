//! `multipart/form-data` body decoding.
//!
//! The decoder is lenient about framing: it skips any preamble and
//! epilogue, accepts bare LF line breaks and keeps the last part of a body
//! that ends without its closing delimiter (a file in that part is marked
//! [`UploadStatus::Partial`]). It is strict about content: every
//! named part lands in exactly one table, byte for byte.

use std::collections::HashMap;

use tracing::warn;

use crate::config::MessageConfig;
use crate::error::{MessageError, MessageResult};
use crate::http::ParamTable;
use crate::http::form::media_type_param;
use crate::http::stream::MemoryStream;
use crate::http::uploaded_file::{UploadStatus, UploadedFile};

const DEFAULT_PART_TYPE: &str = "text/plain";

#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: ParamTable,
    pub files: HashMap<String, UploadedFile>,
}

/// Boundary parameter of a Content-Type value, if present and non-empty.
pub fn boundary(content_type: &str) -> Option<String> {
    media_type_param(content_type, "boundary").filter(|b| !b.is_empty())
}

struct Part<'a> {
    name: Option<String>,
    filename: Option<String>,
    content_type: Option<String>,
    content: &'a [u8],
    complete: bool,
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Skips a CRLF or LF at `pos`.
fn skip_line_break(body: &[u8], pos: usize) -> Option<usize> {
    match body.get(pos..) {
        Some([b'\r', b'\n', ..]) => Some(pos + 2),
        Some([b'\n', ..]) => Some(pos + 1),
        _ => None,
    }
}

/// Parameters of a Content-Disposition value, honouring quoted strings.
fn disposition_params(value: &str) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut rest = match value.split_once(';') {
        Some((_, rest)) => rest,
        None => return params,
    };

    loop {
        rest = rest.trim_start_matches(|c: char| matches!(c, ' ' | '\t' | ';'));
        let Some((name, after)) = rest.split_once('=') else {
            break;
        };
        let name = name.trim().to_ascii_lowercase();
        let after = after.trim_start();

        let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
            let mut value = String::new();
            let mut chars = quoted.char_indices();
            let mut end = quoted.len();
            while let Some((i, c)) = chars.next() {
                match c {
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => {
                        end = i + 1;
                        break;
                    }
                    c => value.push(c),
                }
            }
            (value, &quoted[end..])
        } else {
            match after.split_once(';') {
                Some((v, remaining)) => (v.trim().to_string(), remaining),
                None => (after.trim().to_string(), ""),
            }
        };

        params.push((name, value));
        rest = remaining;
    }

    params
}

fn parse_part_headers(part: &mut Part<'_>, head: &[u8]) {
    let head = String::from_utf8_lossy(head);

    for line in head.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        if name.trim().eq_ignore_ascii_case("content-disposition") {
            for (param, v) in disposition_params(value) {
                match param.as_str() {
                    "name" => part.name = Some(v),
                    "filename" => part.filename = Some(v),
                    _ => {}
                }
            }
        } else if name.trim().eq_ignore_ascii_case("content-type") {
            part.content_type = Some(value.to_string());
        }
    }
}

fn split_parts<'a>(body: &'a [u8], boundary: &str) -> MessageResult<Vec<Part<'a>>> {
    let delimiter = format!("--{boundary}").into_bytes();
    let inner_delimiter = [b"\n".as_slice(), &delimiter].concat();

    let mut pos = if body.starts_with(&delimiter) {
        delimiter.len()
    } else {
        match find(body, &inner_delimiter, 0) {
            Some(i) => i + inner_delimiter.len(),
            None => {
                return Err(MessageError::MalformedMultipart(
                    "opening boundary not found".to_string(),
                ));
            }
        }
    };

    let mut parts = Vec::new();
    loop {
        if body[pos..].starts_with(b"--") {
            break;
        }

        while matches!(body.get(pos), Some(b' ') | Some(b'\t')) {
            pos += 1;
        }
        if pos == body.len() {
            break;
        }
        pos = skip_line_break(body, pos).ok_or_else(|| {
            MessageError::MalformedMultipart("boundary not followed by a line break".to_string())
        })?;

        let (head, content_start) = match skip_line_break(body, pos) {
            // A part without headers.
            Some(start) => (&body[pos..pos], start),
            None => {
                let head_end = find(body, b"\n\r\n", pos)
                    .map(|i| (i, i + 3))
                    .into_iter()
                    .chain(find(body, b"\n\n", pos).map(|i| (i, i + 2)))
                    .min_by_key(|(i, _)| *i)
                    .ok_or_else(|| {
                        MessageError::MalformedMultipart("unterminated part headers".to_string())
                    })?;
                (&body[pos..head_end.0], head_end.1)
            }
        };

        let mut part = Part {
            name: None,
            filename: None,
            content_type: None,
            content: &[],
            complete: true,
        };
        parse_part_headers(&mut part, head);

        // Empty body: the blank line after the headers already ended the part.
        if body[content_start..].starts_with(&delimiter) {
            parts.push(part);
            pos = content_start + delimiter.len();
            continue;
        }

        match find(body, &inner_delimiter, content_start) {
            Some(i) => {
                let end = if i > content_start && body[i - 1] == b'\r' {
                    i - 1
                } else {
                    i
                };
                part.content = &body[content_start..end];
                parts.push(part);
                pos = i + inner_delimiter.len();
            }
            None => {
                let mut content = &body[content_start..];
                content = content.strip_suffix(b"\n").unwrap_or(content);
                content = content.strip_suffix(b"\r").unwrap_or(content);
                part.content = content;
                part.complete = false;
                parts.push(part);
                break;
            }
        }
    }

    Ok(parts)
}

/// Decodes `body` into form fields and uploaded files.
pub fn parse(body: &[u8], boundary: &str, cfg: &MessageConfig) -> MessageResult<MultipartForm> {
    let mut form = MultipartForm::default();
    if body.is_empty() {
        return Ok(form);
    }

    for part in split_parts(body, boundary)? {
        let Some(name) = part.name else {
            continue;
        };

        let Some(filename) = part.filename else {
            let value = String::from_utf8_lossy(part.content).into_owned();
            form.fields.insert(name, value);
            continue;
        };

        // An empty file input is sent as a part with no filename and no bytes.
        if filename.is_empty() && part.content.is_empty() {
            continue;
        }

        if form.files.len() >= cfg.max_file_count && !form.files.contains_key(&name) {
            warn!(%name, limit = cfg.max_file_count, "uploaded file dropped, too many files");
            continue;
        }

        let media_type = part.content_type.as_deref().unwrap_or(DEFAULT_PART_TYPE);
        let file = if part.content.len() > cfg.max_file_size {
            warn!(%name, size = part.content.len(), limit = cfg.max_file_size, "uploaded file too large");
            UploadedFile::new(
                &filename,
                media_type,
                Box::new(MemoryStream::new()),
                UploadStatus::ExceedsSizeLimit,
            )
        } else {
            let status = if part.complete {
                UploadStatus::Ok
            } else {
                UploadStatus::Partial
            };
            UploadedFile::new(
                &filename,
                media_type,
                Box::new(MemoryStream::from(part.content.to_vec())),
                status,
            )
        };
        form.files.insert(name, file);
    }

    Ok(form)
}
