//! Subject header decoding.
//!
//! This is a heuristic, not an RFC 2047 decoder. Only one encoded word at
//! the very start of the header is recognised; its charset and encoding
//! letter are ignored and the payload is treated as quoted-printable text.
//! Multiple encoded words, base64 payloads and non ASCII-compatible
//! charsets come out wrong.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)]
static ENCODED_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=\?[a-zA-Z0-9_\-]*\?.\?(.*)\?=").expect("valid encoded-word regex")
});

#[allow(clippy::expect_used)]
static HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=([A-F0-9][A-F0-9])").expect("valid hex escape regex"));

/// Decodes a `Subject` header value into display text.
///
/// Values without a leading encoded word are returned unchanged.
#[must_use]
pub fn decode_subject(raw: &str) -> Cow<'_, str> {
    let unwrapped = ENCODED_WORD.replace(raw, "$1");
    if unwrapped == raw {
        return Cow::Borrowed(raw);
    }

    let percent_encoded = HEX_ESCAPE.replace_all(&unwrapped, "%$1");
    let bytes = urlencoding::decode_binary(percent_encoded.as_bytes());
    Cow::Owned(String::from_utf8_lossy(&bytes).into_owned())
}

/// Escapes the characters HTML treats specially.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            '"' => escaped.push_str("&#34;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Produces the task summary from a raw `Subject` header.
///
/// The result is decoded, HTML-escaped and kept on a single line.
#[must_use]
pub fn summary(raw: &str) -> String {
    let decoded = decode_subject(raw);
    escape_html(&decoded)
        .replace("\r\n", " ")
        .replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_subject_unchanged() {
        assert_eq!(decode_subject("Weekly sync notes"), "Weekly sync notes");
        assert!(matches!(decode_subject("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_quoted_printable_word() {
        assert_eq!(decode_subject("=?UTF-8?Q?Hello=20World?="), "Hello World");
    }

    #[test]
    fn test_multibyte_utf8() {
        assert_eq!(decode_subject("=?utf-8?Q?Caf=C3=A9_au_lait?="), "Café_au_lait");
    }

    #[test]
    fn test_charset_and_encoding_ignored() {
        // Base64 payloads are not decoded
        assert_eq!(decode_subject("=?UTF-8?B?SGVsbG8=?="), "SGVsbG8=");
    }

    #[test]
    fn test_lowercase_hex_not_decoded() {
        assert_eq!(decode_subject("=?UTF-8?Q?a=3db?="), "a=3db");
    }

    #[test]
    fn test_text_after_word_kept() {
        assert_eq!(decode_subject("=?UTF-8?Q?Re:=20?= status"), "Re:  status");
    }

    #[test]
    fn test_word_not_at_start_unchanged() {
        let raw = "Re: =?UTF-8?Q?Hello=20World?=";
        assert_eq!(decode_subject(raw), raw);
    }

    #[test]
    fn test_literal_percent_kept() {
        assert_eq!(decode_subject("=?UTF-8?Q?100%_done?="), "100%_done");
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        assert_eq!(decode_subject("=?iso-8859-1?Q?caf=E9?="), "caf\u{fffd}");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&#34;x&#34;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_summary_decodes_then_escapes() {
        assert_eq!(summary("=?UTF-8?Q?Fish=20=26=20Chips?="), "Fish &amp; Chips");
        assert_eq!(summary("line one\r\nline two"), "line one line two");
    }

    proptest! {
        #[test]
        fn prop_subject_without_encoded_word_passes_through(s in "[A-Za-z0-9 ,.:!-]{0,64}") {
            prop_assert_eq!(decode_subject(&s), s.as_str());
        }
    }
}
