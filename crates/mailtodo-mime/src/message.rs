//! MIME message structure and parsing.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::{Headers, parse_date};
use chrono::{DateTime, FixedOffset};
use encoding_rs::{Encoding, UTF_8};

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit binary.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit, // Default (includes "7bit")
        }
    }
}

/// MIME entity: headers, raw body and, for multiparts, child parts.
#[derive(Debug, Clone, Default)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body (raw bytes, transfer encoding not yet removed).
    pub body: Vec<u8>,
    /// Child parts of a `multipart/*` entity, in document order.
    pub parts: Vec<Part>,
}

impl Part {
    /// Creates a new leaf part.
    #[must_use]
    pub const fn new(headers: Headers, body: Vec<u8>) -> Self {
        Self {
            headers,
            body,
            parts: Vec::new(),
        }
    }

    /// Parses an entity (headers, blank line, body), recursing into
    /// multipart bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if the headers are malformed or a multipart body
    /// has no usable boundary.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut errors = Vec::new();
        let part = Self::parse_lenient(data, &mut errors);
        errors.into_iter().next().map_or(Ok(part), Err)
    }

    /// Parses an entity like [`Part::parse`], keeping whatever is usable.
    ///
    /// Malformed header lines are skipped. A multipart whose body cannot be
    /// split keeps its raw body and gets no children. Every problem is
    /// pushed onto `errors` in document order.
    pub fn parse_lenient(data: &[u8], errors: &mut Vec<Error>) -> Self {
        let (head, body) = split_entity(data);
        let headers = Headers::parse_lenient(&String::from_utf8_lossy(head), errors);
        let mut part = Self::new(headers, body.to_vec());

        if let Ok(ct) = part.content_type()
            && ct.is_multipart()
        {
            let segments = ct
                .boundary()
                .ok_or(Error::MissingBoundary)
                .and_then(|boundary| split_multipart(body, boundary));
            match segments {
                Ok(segments) => {
                    part.parts = segments
                        .into_iter()
                        .map(|segment| Self::parse_lenient(segment, errors))
                        .collect();
                }
                Err(e) => errors.push(e),
            }
        }

        part
    }

    /// Gets the content type, defaulting to `text/plain` when absent.
    ///
    /// # Errors
    ///
    /// Returns an error if content type header is invalid.
    pub fn content_type(&self) -> Result<ContentType> {
        self.headers
            .get("content-type")
            .map_or_else(|| Ok(ContentType::text_plain()), ContentType::parse)
    }

    /// Returns the lowercased `type/subtype`, or `None` if the
    /// `Content-Type` header cannot be parsed.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type().ok().map(|ct| ct.media_type())
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&self.body),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&self.body),
            _ => Ok(self.body.clone()),
        }
    }

    /// Gets the decoded body as text.
    ///
    /// Falls back to the raw bytes when the transfer encoding cannot be
    /// undone. The declared `charset` is honoured; without one, or for an
    /// unknown label, the body is read as UTF-8 with invalid sequences
    /// replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        let bytes = self.decode_body().unwrap_or_else(|_| self.body.clone());
        let (text, _, _) = self.charset().decode(&bytes);
        text.into_owned()
    }

    /// Character encoding declared by the `Content-Type` header.
    ///
    /// `us-ascii` is read as UTF-8 since mislabelled 8-bit bodies are
    /// common and ASCII is a subset of it.
    fn charset(&self) -> &'static Encoding {
        self.headers
            .get("content-type")
            .and_then(|value| ContentType::parse(value).ok())
            .and_then(|ct| {
                ct.charset()
                    .filter(|label| !label.eq_ignore_ascii_case("us-ascii"))
                    .and_then(|label| Encoding::for_label(label.as_bytes()))
            })
            .unwrap_or(UTF_8)
    }
}

/// Parsed email message.
#[derive(Debug, Clone, Default)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a raw message (RFC 5322 with optional MIME structure).
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, a header line is malformed,
    /// or a multipart body cannot be split.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let (message, errors) = Self::parse_lenient(raw);
        errors.into_iter().next().map_or(Ok(message), Err)
    }

    /// Parses a raw message, keeping every header and part that could be
    /// read.
    ///
    /// Returns the partial message together with the problems found. Empty
    /// input yields an empty message and [`Error::Empty`].
    #[must_use]
    pub fn parse_lenient(raw: &[u8]) -> (Self, Vec<Error>) {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return (Self::default(), vec![Error::Empty]);
        }
        let mut errors = Vec::new();
        let root = Part::parse_lenient(raw, &mut errors);
        (Self { root }, errors)
    }

    /// Top-level message headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// The root entity.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.root.headers.get("subject")
    }

    /// Gets the raw Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.root.headers.get("date")
    }

    /// Parses the Date header.
    ///
    /// Returns `None` if the header is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the header is present but unparseable.
    pub fn date_time(&self) -> Option<Result<DateTime<FixedOffset>>> {
        self.date().map(parse_date)
    }

    /// Iterates over every part depth-first in document order, starting
    /// with the root itself.
    #[must_use]
    pub fn parts(&self) -> Parts<'_> {
        Parts {
            stack: vec![&self.root],
        }
    }
}

/// Depth-first iterator over a message's parts.
#[derive(Debug)]
pub struct Parts<'a> {
    stack: Vec<&'a Part>,
}

impl<'a> Iterator for Parts<'a> {
    type Item = &'a Part;

    fn next(&mut self) -> Option<Self::Item> {
        let part = self.stack.pop()?;
        self.stack.extend(part.parts.iter().rev());
        Some(part)
    }
}

/// Splits an entity at the first empty line into header and body bytes.
fn split_entity(data: &[u8]) -> (&[u8], &[u8]) {
    if data.starts_with(b"\r\n") {
        return (&[], &data[2..]);
    }
    if data.starts_with(b"\n") {
        return (&[], &data[1..]);
    }

    let mut pos = 0;
    while let Some(offset) = data[pos..].iter().position(|&b| b == b'\n') {
        let next = pos + offset + 1;
        let rest = &data[next..];
        if rest.starts_with(b"\r\n") {
            return (&data[..next], &rest[2..]);
        }
        if rest.starts_with(b"\n") {
            return (&data[..next], &rest[1..]);
        }
        pos = next;
    }

    (data, &[])
}

/// Splits a multipart body into its encapsulated entities.
///
/// The line break before each delimiter belongs to the delimiter. A body
/// missing its closing delimiter ends at the end of input.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Result<Vec<&'a [u8]>> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();

    let mut segments = Vec::new();
    let mut current: Option<usize> = None;
    let mut line_start = 0;

    while line_start < body.len() {
        let line_end = body[line_start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(body.len(), |i| line_start + i + 1);
        let line = trim_line_end(&body[line_start..line_end]);

        if let Some(rest) = line.strip_prefix(delimiter) {
            let rest = trim_padding(rest);
            let closing = rest == b"--";
            if rest.is_empty() || closing {
                if let Some(start) = current.take() {
                    segments.push(strip_trailing_newline(&body[start..line_start]));
                }
                if closing {
                    return Ok(segments);
                }
                current = Some(line_end);
            }
        }

        line_start = line_end;
    }

    match current {
        Some(start) => {
            segments.push(&body[start.min(body.len())..]);
            Ok(segments)
        }
        None if segments.is_empty() => Err(Error::InvalidMultipart(format!(
            "no delimiter line for boundary {boundary:?}"
        ))),
        None => Ok(segments),
    }
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn trim_padding(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

fn strip_trailing_newline(segment: &[u8]) -> &[u8] {
    segment
        .strip_suffix(b"\r\n")
        .or_else(|| segment.strip_suffix(b"\n"))
        .unwrap_or(segment)
}
