//! Description body selection.

use mailtodo_mime::Message;
use tracing::debug;

use crate::config::MediaType;
use crate::render::{HtmlRenderer, RenderError};

/// Body picked for the task description.
#[derive(Debug, Default)]
pub struct Selection {
    /// Description text with newlines escaped as `\n`.
    pub description: String,
    /// Renderer failures met while visiting HTML parts.
    pub errors: Vec<RenderError>,
}

/// Picks the description body from a message.
///
/// Parts are visited depth-first in document order. Every `text/html` part
/// is rendered and every `text/plain` part recorded, the last of each kind
/// winning; the first non-empty one of either kind becomes the running
/// choice. Afterwards the preferred kind replaces the running choice if a
/// non-empty part of that kind was seen. Other media types are ignored.
pub fn select_body(
    message: &Message,
    preferred: &MediaType,
    renderer: &dyn HtmlRenderer,
) -> Selection {
    let mut selected = String::new();
    let mut plain = String::new();
    let mut html = String::new();
    let mut errors = Vec::new();

    for (index, part) in message.parts().enumerate() {
        let Some(media_type) = part.media_type() else {
            debug!(index, "Skipping part with unparseable content type");
            continue;
        };

        match media_type.as_str() {
            "text/html" => {
                let rendered = renderer.render(&part.body_text());
                if let Some(error) = rendered.error {
                    errors.push(error);
                }
                html = rendered.text;
                if selected.is_empty() {
                    selected.clone_from(&html);
                }
            }
            "text/plain" => {
                plain = part.body_text();
                if selected.is_empty() {
                    selected.clone_from(&plain);
                }
            }
            other => debug!(index, media_type = other, "Ignoring part"),
        }
    }

    if !html.is_empty() && *preferred == MediaType::TextHtml {
        selected = html;
    } else if !plain.is_empty() && *preferred == MediaType::TextPlain {
        selected = plain;
    }

    Selection {
        description: escape_newlines(&selected),
        errors,
    }
}

/// Replaces line breaks with the two characters `\n`.
///
/// A CRLF pair counts as one line break. Nothing else is escaped.
#[must_use]
pub fn escape_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\\n")
}
