//! # mailtodo-core
//!
//! Turns a stored email into an iCalendar VTODO task.
//!
//! This crate provides:
//! - Task identifiers shaped like UUIDs
//! - Subject decoding for a leading MIME encoded word
//! - Description selection across multipart bodies
//! - Pluggable HTML to text rendering via an external command
//! - VTODO serialization and the `.ics` file writer
//!
//! ```no_run
//! use std::path::Path;
//! use mailtodo_core::{Config, Converter, write_todo};
//!
//! let config = Config::default();
//! let conversion = Converter::new(&config).convert_file(Path::new("message.eml"))?;
//! let path = write_todo(Path::new("/home/me/calendar"), &conversion)?;
//! println!("{}", path.display());
//! # Ok::<(), mailtodo_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod body;
mod config;
mod convert;
mod diagnostic;
mod error;
mod render;
mod subject;
mod uid;
mod vtodo;

pub use body::{Selection, escape_newlines, select_body};
pub use config::{Config, ConfigBuilder, DEFAULT_HTML_COMMAND, MediaType};
pub use convert::{Conversion, Converter, write_todo};
pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use render::{
    CommandRenderer, HtmlRenderer, PATH_PLACEHOLDER, Passthrough, RenderError, Rendered,
};
pub use subject::{decode_subject, escape_html, summary};
pub use uid::Uid;
pub use vtodo::{PRODUCT_VERSION, TodoRecord, ZERO_TIMESTAMP, format_timestamp};
