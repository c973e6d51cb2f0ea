use std::time::SystemTime;

use crate::error::{MessageError, MessageResult};
use crate::http::message::{HttpMessage, Message};
use crate::http::status::HttpStatus;

/// A response: status code and reason phrase over a [`Message`].
///
/// No reason phrase is inferred from the code; an empty phrase is valid.
#[derive(Debug)]
pub struct Response {
    status: u16,
    reason_phrase: String,
    message: Message,
}

impl Response {
    pub fn new() -> Self {
        Self {
            status: HttpStatus::Ok.into(),
            reason_phrase: String::new(),
            message: Message::new(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason_phrase
    }

    pub fn set_status(&mut self, code: impl Into<u16>, reason_phrase: &str) -> MessageResult<()> {
        let code = code.into();
        if !(100..=599).contains(&code) {
            return Err(MessageError::InvalidStatus(code));
        }

        self.status = code;
        self.reason_phrase = reason_phrase.to_string();
        Ok(())
    }

    pub fn with_status(mut self, code: impl Into<u16>, reason_phrase: &str) -> MessageResult<Self> {
        self.set_status(code, reason_phrase)?;
        Ok(self)
    }

    /// Sets the `Date` header to `time` in IMF-fixdate form.
    pub fn set_date(&mut self, time: SystemTime) -> MessageResult<()> {
        self.set_header("Date", &httpdate::fmt_http_date(time))
    }

    // HTTP/<version> <status> <reason>
    pub fn status_line(&self) -> String {
        format!(
            "HTTP/{} {} {}",
            self.protocol_version(),
            self.status,
            self.reason_phrase
        )
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMessage for Response {
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
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn defaults_to_ok() {
        let res = Response::new();
        assert_eq!(res.status(), 200);
        assert_eq!(res.reason_phrase(), "");
        assert_eq!(res.status_line(), "HTTP/1.1 200 ");
    }

    #[test]
    fn out_of_range_status_is_rejected_without_change() {
        let mut res = Response::new().with_status(HttpStatus::NotFound, "Not Found").unwrap();
        assert!(matches!(
            res.set_status(600u16, "Nope"),
            Err(MessageError::InvalidStatus(600))
        ));
        assert!(res.set_status(99u16, "").is_err());
        assert_eq!(res.status_line(), "HTTP/1.1 404 Not Found");
    }

    #[test]
    fn date_header_uses_imf_fixdate() {
        let mut res = Response::new();
        res.set_date(UNIX_EPOCH + Duration::from_secs(784111777)).unwrap();
        assert_eq!(res.header_line("date"), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
