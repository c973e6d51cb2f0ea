//! Decoders for query strings, cookie headers and urlencoded bodies, plus
//! the Content-Type media type helper used to gate body parsing.

use tracing::warn;

use crate::http::ParamTable;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Decodes an `application/x-www-form-urlencoded` string. A leading `?` is
/// ignored; on duplicate keys the last value wins.
pub fn parse_query(raw: &str) -> ParamTable {
    let raw = raw.strip_prefix('?').unwrap_or(raw);

    match serde_urlencoded::from_str::<Vec<(String, String)>>(raw) {
        Ok(pairs) => pairs.into_iter().collect(),
        Err(err) => {
            warn!(%err, "undecodable form data ignored");
            ParamTable::new()
        }
    }
}

pub fn parse_form_body(body: &[u8]) -> ParamTable {
    match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
        Ok(pairs) => pairs.into_iter().collect(),
        Err(err) => {
            warn!(%err, "undecodable form body ignored");
            ParamTable::new()
        }
    }
}

/// Splits a `Cookie` header into name/value pairs.
///
/// Values are not percent-decoded. Surrounding double quotes are removed.
/// When a name repeats, the first occurrence wins since user agents send
/// the cookie with the most specific path first.
pub fn parse_cookies(header: &str) -> ParamTable {
    let mut cookies = ParamTable::new();

    for pair in header.split(';') {
        let Some((name, value)) = pair.split_once('=') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);

        cookies
            .entry(name.to_string())
            .or_insert_with(|| value.to_string());
    }

    cookies
}

/// Media type of a Content-Type value: parameters stripped, trimmed and
/// lowercased.
pub fn media_type(content_type: &str) -> String {
    let essence = match content_type.split_once(';') {
        Some((essence, _)) => essence,
        None => content_type,
    };
    essence.trim().to_ascii_lowercase()
}

/// Value of a Content-Type parameter, unquoted. Parameter names compare
/// case-insensitively.
pub fn media_type_param(content_type: &str, param: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|p| {
        let (name, value) = p.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case(param) {
            return None;
        }

        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        Some(value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_decoded() {
        let params = parse_query("?name=J%C3%BCrgen+M&empty=&flag");
        assert_eq!(params["name"], "Jürgen M");
        assert_eq!(params["empty"], "");
        assert_eq!(params["flag"], "");
    }

    #[test]
    fn last_query_value_wins() {
        let params = parse_query("a=1&a=2&b=3");
        assert_eq!(params["a"], "2");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn form_body_decodes_like_query() {
        let params = parse_form_body(b"city=New+York&zip=10001");
        assert_eq!(params["city"], "New York");
        assert_eq!(params["zip"], "10001");
    }

    #[test]
    fn cookie_pairs_are_split() {
        let cookies = parse_cookies("session=abc123; theme=\"dark\";lang=en; broken; =nameless");
        assert_eq!(cookies["session"], "abc123");
        assert_eq!(cookies["theme"], "dark");
        assert_eq!(cookies["lang"], "en");
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn first_cookie_wins() {
        let cookies = parse_cookies("id=specific; id=general");
        assert_eq!(cookies["id"], "specific");
    }

    #[test]
    fn media_type_ignores_parameters_and_case() {
        assert_eq!(
            media_type("Multipart/Form-Data; boundary=xyz"),
            MULTIPART_FORM_DATA
        );
        assert_eq!(media_type(" application/x-www-form-urlencoded "), FORM_URLENCODED);
        assert_eq!(media_type(""), "");
    }

    #[test]
    fn media_type_param_unquotes() {
        let ct = "multipart/form-data; charset=utf-8; Boundary=\"----abc\"";
        assert_eq!(media_type_param(ct, "boundary").as_deref(), Some("----abc"));
        assert_eq!(media_type_param(ct, "missing"), None);
    }
}
