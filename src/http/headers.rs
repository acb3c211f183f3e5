//! Header collection and the line-at-a-time header parser.
//!
//! Field names are stored lower-cased, so lookups are case-insensitive.
//! A name that appears more than once keeps a single entry whose value is
//! the arrival-ordered values joined with `", "`.

use std::collections::HashMap;

use crate::http::parser::ParseError;

const CRLF: &[u8] = b"\r\n";

/// Case-insensitive HTTP header map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses at most one header line from the front of `buf`.
    ///
    /// Returns `(consumed, done)`:
    ///
    /// - `(0, false)` when no CRLF is present yet; the caller must supply more bytes
    /// - `(2, true)` when `buf` starts with the blank line ending the header section
    /// - `(line_len + 2, false)` after storing one `name: value` field
    ///
    /// Value bytes that are not valid UTF-8 are kept, replaced by U+FFFD.
    ///
    /// # Example
    ///
    /// ```
    /// # use httpwire::http::headers::Headers;
    /// let mut headers = Headers::new();
    /// let (n, done) = headers.parse_line(b"Host: localhost:32020\r\n\r\n").unwrap();
    /// assert_eq!((n, done), (23, false));
    /// assert_eq!(headers.get("host"), Some("localhost:32020"));
    /// ```
    pub fn parse_line(&mut self, buf: &[u8]) -> Result<(usize, bool), ParseError> {
        let Some(line_end) = find_crlf(buf) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        // Split at the byte level: values may carry obs-text (0x80-0xFF).
        let line = &buf[..line_end];
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(ParseError::InvalidHeader)?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        let name_start = name.iter().take_while(|&&b| b == b' ').count();
        let name = &name[name_start..];
        if !is_valid_field_name(name) {
            return Err(ParseError::InvalidFieldName);
        }
        let name = std::str::from_utf8(name).map_err(|_| ParseError::InvalidFieldName)?;

        self.append(name, &String::from_utf8_lossy(value.trim_ascii()));

        Ok((line_end + CRLF.len(), false))
    }

    /// Adds a value, joining it onto any existing value for the same name.
    pub fn append(&mut self, name: &str, value: &str) {
        self.fields
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    /// Sets a value, replacing whatever was stored under the same name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.fields.remove(&name.to_ascii_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub(crate) fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

/// RFC 9110 token: ALPHA / DIGIT / one of ``!#$%&'*+-.^_`|~``.
pub(crate) fn is_valid_field_name(name: &[u8]) -> bool {
    !name.is_empty() && name.iter().copied().all(is_token_char)
}

pub(crate) fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
