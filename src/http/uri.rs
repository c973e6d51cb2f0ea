//! Opaque request URI.
//!
//! No normalisation is performed: the URI is kept as given and only split
//! far enough to hand out its path and raw query string.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    raw: String,
}

impl Uri {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn without_fragment(&self) -> &str {
        match self.raw.split_once('#') {
            Some((before, _)) => before,
            None => &self.raw,
        }
    }

    /// Raw query string without the leading `?`; empty when there is none.
    pub fn query(&self) -> &str {
        match self.without_fragment().split_once('?') {
            Some((_, query)) => query,
            None => "",
        }
    }

    /// Path component. For absolute URIs the scheme and authority are
    /// skipped.
    pub fn path(&self) -> &str {
        let s = self.without_fragment();
        let s = match s.split_once('?') {
            Some((before, _)) => before,
            None => s,
        };

        match s.find("://") {
            Some(i) => {
                let rest = &s[i + 3..];
                match rest.find('/') {
                    Some(j) => &rest[j..],
                    None => "",
                }
            }
            None => s,
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Uri {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Uri::new(s))
    }
}

impl From<&str> for Uri {
    fn from(s: &str) -> Self {
        Uri::new(s)
    }
}
