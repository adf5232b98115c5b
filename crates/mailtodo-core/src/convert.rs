//! Email to task conversion pipeline.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mailtodo_mime::Message;
use tracing::debug;

use crate::body::select_body;
use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::render::HtmlRenderer;
use crate::subject::summary;
use crate::uid::Uid;
use crate::vtodo::TodoRecord;

/// Outcome of converting one message.
#[derive(Debug)]
pub struct Conversion {
    /// The derived task.
    pub record: TodoRecord,
    /// The serialized calendar document.
    pub document: String,
    /// Steps that degraded along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts email messages into tasks.
pub struct Converter<'a> {
    config: &'a Config,
    renderer: Box<dyn HtmlRenderer>,
}

impl<'a> Converter<'a> {
    /// Creates a converter using the renderer described by `config`.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            renderer: config.renderer(),
        }
    }

    /// Creates a converter with an explicit renderer.
    #[must_use]
    pub fn with_renderer(config: &'a Config, renderer: impl HtmlRenderer + 'static) -> Self {
        Self {
            config,
            renderer: Box::new(renderer),
        }
    }

    /// Reads and converts a stored message.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or no identifier can be
    /// generated.
    pub fn convert_file(&self, path: &Path) -> Result<Conversion> {
        let raw = fs::read(path).map_err(|source| Error::ReadMessage {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Read email file");
        self.convert_bytes(&raw)
    }

    /// Converts raw message bytes with a fresh identifier and the current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if no identifier can be generated.
    pub fn convert_bytes(&self, raw: &[u8]) -> Result<Conversion> {
        let uid = Uid::generate()?;
        Ok(self.convert_with(raw, uid, Utc::now()))
    }

    /// Converts raw message bytes with a given identifier and creation
    /// time.
    ///
    /// Never fails: parse problems, a missing date and renderer failures
    /// are recorded in [`Conversion::diagnostics`].
    #[must_use]
    pub fn convert_with(&self, raw: &[u8], uid: Uid, created: DateTime<Utc>) -> Conversion {
        let mut diagnostics = Vec::new();

        let (message, errors) = Message::parse_lenient(raw);
        for e in errors {
            debug!(error = %e, "Message partly unreadable, continuing with what parsed");
            diagnostics.push(Diagnostic::MessageParse(e));
        }

        let selection = select_body(&message, &self.config.preferred_type, self.renderer.as_ref());
        diagnostics.extend(selection.errors.into_iter().map(Diagnostic::Render));

        let dtstamp = match message.date_time() {
            Some(Ok(date)) => Some(date.with_timezone(&Utc)),
            Some(Err(e)) => {
                diagnostics.push(Diagnostic::InvalidDate(e));
                None
            }
            None => {
                diagnostics.push(Diagnostic::MissingDate);
                None
            }
        };

        let record = TodoRecord {
            uid,
            summary: summary(message.subject().unwrap_or_default()),
            description: selection.description,
            dtstamp,
            created,
        };
        debug!(uid = %record.uid, summary = %record.summary, "Composed task");

        Conversion {
            document: record.to_ics(),
            record,
            diagnostics,
        }
    }
}

/// Writes a converted task to `<dir>/<uid>.ics` and returns the path.
///
/// On Unix the file is created with mode `0o777` before the umask.
///
/// # Errors
///
/// Returns [`Error::WriteTodo`] if the file cannot be written.
pub fn write_todo(dir: &Path, conversion: &Conversion) -> Result<PathBuf> {
    let path = dir.join(conversion.record.uid.file_name());

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o777);
    }

    options
        .open(&path)
        .and_then(|mut file| file.write_all(conversion.document.as_bytes()))
        .map_err(|source| Error::WriteTodo {
            path: path.clone(),
            source,
        })?;

    debug!(path = %path.display(), "Wrote task");
    Ok(path)
}
