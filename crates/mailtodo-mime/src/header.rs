//! MIME header handling.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// Collection of email headers.
///
/// Names are case-insensitive; repeated headers keep every value in the
/// order they appeared.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    headers: HashMap<String, Vec<String>>,
}

impl Headers {
    /// Creates a new empty header collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_lowercase();
        let value = value.into();
        self.headers.entry(name).or_default().push(value);
    }

    /// Gets the first value for a header.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|v| v.first().map(String::as_str))
    }

    /// Gets all values for a header.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get(&name.to_lowercase())
            .map(|v| v.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the number of distinct header names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if no headers are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Parses headers from raw text.
    ///
    /// Headers are in the format:
    /// ```text
    /// Header-Name: value
    ///  folded continuation
    /// ```
    ///
    /// Parsing stops at the first empty line. A leading mbox `From ` line
    /// is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a line is neither a header nor a continuation.
    pub fn parse(text: &str) -> Result<Self> {
        let mut errors = Vec::new();
        let headers = Self::parse_lenient(text, &mut errors);
        errors.into_iter().next().map_or(Ok(headers), Err)
    }

    /// Parses headers like [`Headers::parse`], skipping malformed lines.
    ///
    /// Each skipped line is pushed onto `errors`, together with any
    /// continuation lines that follow it.
    pub fn parse_lenient(text: &str, errors: &mut Vec<Error>) -> Self {
        let mut headers = Self::new();
        let mut current_name: Option<String> = None;
        let mut current_value = String::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                break;
            }
            if index == 0 && line.starts_with("From ") {
                continue;
            }

            // Continuation line (starts with space or tab)
            if line.starts_with(' ') || line.starts_with('\t') {
                if current_name.is_some() {
                    current_value.push(' ');
                    current_value.push_str(line.trim());
                }
                continue;
            }

            if let Some(name) = current_name.take() {
                headers.add(name, current_value.trim());
                current_value.clear();
            }

            match line.split_once(':') {
                Some((name, value))
                    if !name.trim().is_empty() && !name.trim().contains(char::is_whitespace) =>
                {
                    current_name = Some(name.trim().to_string());
                    current_value = value.trim().to_string();
                }
                _ => errors.push(Error::InvalidHeader(line.to_string())),
            }
        }

        if let Some(name) = current_name {
            headers.add(name, current_value.trim());
        }

        headers
    }
}

/// Parses an RFC 2822 `Date` header value.
///
/// A trailing comment such as `(UTC)` or `(PDT)` is ignored.
///
/// # Errors
///
/// Returns an error if the value is not a valid RFC 2822 date.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value
        .find('(')
        .map_or(value, |idx| &value[..idx])
        .trim();
    DateTime::parse_from_rfc2822(value).map_err(|e| Error::InvalidDate(format!("{value}: {e}")))
}
