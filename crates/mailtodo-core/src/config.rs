//! Conversion configuration.
//!
//! A [`Config`] is built once and handed by reference to every step that
//! needs it; nothing reads configuration from global state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::render::{CommandRenderer, HtmlRenderer, Passthrough};

/// Renderer command used when none is configured.
///
/// `%s` is replaced with the path of a temporary file holding the HTML.
pub const DEFAULT_HTML_COMMAND: &str = "w3m -T text/html %s";

/// Body media type the selector prefers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MediaType {
    /// `text/plain`.
    #[default]
    TextPlain,
    /// `text/html`.
    TextHtml,
    /// Any other `type/subtype`; never matches a body part.
    Other(String),
}

impl MediaType {
    /// Returns the lowercase `type/subtype` form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TextPlain => "text/plain",
            Self::TextHtml => "text/html",
            Self::Other(other) => other,
        }
    }
}

impl FromStr for MediaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        match lower.split_once('/') {
            Some(("text", "plain")) => Ok(Self::TextPlain),
            Some(("text", "html")) => Ok(Self::TextHtml),
            Some((main, sub)) if !main.is_empty() && !sub.is_empty() => Ok(Self::Other(lower)),
            _ => Err(Error::Config(format!(
                "media type must look like type/subtype, got {s:?}"
            ))),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Body media type to prefer when the message carries several.
    pub preferred_type: MediaType,
    /// Shell command template for HTML rendering; empty disables rendering.
    pub html_command: String,
    /// Upper bound on a renderer run. `None` waits indefinitely.
    pub html_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preferred_type: MediaType::TextPlain,
            html_command: DEFAULT_HTML_COMMAND.to_string(),
            html_timeout: None,
        }
    }
}

impl Config {
    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Builds the HTML renderer this configuration describes.
    #[must_use]
    pub fn renderer(&self) -> Box<dyn HtmlRenderer> {
        if self.html_command.trim().is_empty() {
            Box::new(Passthrough)
        } else {
            Box::new(CommandRenderer::new(&self.html_command).timeout(self.html_timeout))
        }
    }
}

/// Builder for conversion configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Sets the preferred body media type.
    #[must_use]
    pub fn preferred_type(mut self, media_type: MediaType) -> Self {
        self.config.preferred_type = media_type;
        self
    }

    /// Sets the HTML renderer command template.
    #[must_use]
    pub fn html_command(mut self, command: impl Into<String>) -> Self {
        self.config.html_command = command.into();
        self
    }

    /// Sets the renderer timeout.
    #[must_use]
    pub const fn html_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.html_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
