//! Header field validation applied by [`HeaderBag`](crate::http::headers::HeaderBag)
//! before any mutation.
//!
//! Names may not be empty and must be plain ASCII without control
//! characters, whitespace or a colon. Values may carry obsolete line
//! folding (CRLF followed by SP or HTAB) but no other CR or LF, and no NUL.

use crate::error::{MessageError, MessageResult};

pub struct Validator;

impl Validator {
    pub fn validate_name(name: &str) -> MessageResult<()> {
        if name.is_empty() {
            return Err(MessageError::header(name, "empty name"));
        }

        for b in name.bytes() {
            if !b.is_ascii() {
                return Err(MessageError::header(name, "non-ASCII byte in name"));
            }
            if b.is_ascii_control() {
                return Err(MessageError::header(name, "control character in name"));
            }
            if b == b' ' {
                return Err(MessageError::header(name, "whitespace in name"));
            }
            if b == b':' {
                return Err(MessageError::header(name, "colon in name"));
            }
        }

        Ok(())
    }

    pub fn validate_value(name: &str, value: &str) -> MessageResult<()> {
        let bytes = value.as_bytes();
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\0' => return Err(MessageError::header(name, "NUL in value")),
                b'\r' => {
                    // Only CRLF followed by SP / HTAB (obs-fold) is accepted.
                    let folded = bytes.get(i + 1) == Some(&b'\n')
                        && matches!(bytes.get(i + 2), Some(b' ') | Some(b'\t'));
                    if !folded {
                        return Err(MessageError::header(name, "bare CR or LF in value"));
                    }
                    i += 3;
                    continue;
                }
                b'\n' => return Err(MessageError::header(name, "bare CR or LF in value")),
                _ => {}
            }
            i += 1;
        }

        Ok(())
    }

    pub fn validate(name: &str, value: &str) -> MessageResult<()> {
        Self::validate_name(name)?;
        Self::validate_value(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for name in ["Host", "X-Custom-Header", "content-type", "X_Under.score~1"] {
            assert!(Validator::validate_name(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["", "Bad Name", "Bad:Name", "Tab\tName", "Nul\0", "Caf\u{e9}"] {
            assert!(
                matches!(
                    Validator::validate_name(name),
                    Err(MessageError::InvalidHeader { .. })
                ),
                "{name:?}"
            );
        }
    }

    #[test]
    fn folded_values_are_accepted() {
        assert!(Validator::validate_value("X", "first\r\n second").is_ok());
        assert!(Validator::validate_value("X", "first\r\n\tsecond").is_ok());
        assert!(Validator::validate_value("X", "").is_ok());
    }

    #[test]
    fn bare_line_breaks_are_rejected() {
        for value in ["a\rb", "a\nb", "a\r\nb", "trailing\r\n", "a\0b"] {
            assert!(Validator::validate_value("X", value).is_err(), "{value:?}");
        }
    }
}
