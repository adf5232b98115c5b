//! Notes about conversion steps that degraded instead of failing.

use thiserror::Error;

use crate::render::RenderError;

/// A degraded step.
///
/// The conversion still produced a task; the affected field fell back to
/// an empty or default value. Callers may log these or drop them.
#[derive(Debug, Error)]
pub enum Diagnostic {
    /// Part of the message could not be parsed; whatever did parse was used.
    #[error("Message partly unreadable: {0}")]
    MessageParse(#[source] mailtodo_mime::Error),

    /// The message has no `Date` header.
    #[error("Message has no Date header")]
    MissingDate,

    /// The `Date` header could not be parsed.
    #[error("Date header ignored: {0}")]
    InvalidDate(#[source] mailtodo_mime::Error),

    /// The HTML renderer failed; its partial output was used.
    #[error("HTML renderer failed: {0}")]
    Render(#[from] RenderError),
}
