//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mailtodo_core::{Config, DEFAULT_HTML_COMMAND, MediaType};

/// Convert an email file into a VTODO task in a calendar folder.
#[derive(Debug, Parser)]
#[command(name = "mailtodo", version, about)]
pub struct Cli {
    /// Path to calendar folder
    #[arg(short = 'p', long = "path", value_name = "DIR", env = "MAILTODO_PATH")]
    pub cal_path: PathBuf,

    /// Path to email file
    #[arg(short = 'f', long, value_name = "FILE", env = "MAILTODO_EMAIL_FILE")]
    pub email_file: PathBuf,

    /// Preferred message MIME type for the description
    #[arg(
        short = 't',
        long = "type",
        value_name = "MIME",
        default_value = "text/plain",
        env = "MAILTODO_TYPE"
    )]
    pub media_type: MediaType,

    /// HTML render command; %s is replaced by the HTML file path, empty disables rendering
    #[arg(
        short = 'H',
        long,
        value_name = "CMD",
        default_value = DEFAULT_HTML_COMMAND,
        env = "MAILTODO_HTML_CMD"
    )]
    pub html_cmd: String,

    /// Kill the HTML render command after this many seconds
    #[arg(long, value_name = "SECONDS", env = "MAILTODO_HTML_TIMEOUT")]
    pub html_timeout: Option<u64>,

    /// Show verbose debug information
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Conversion settings described by the arguments.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::builder()
            .preferred_type(self.media_type.clone())
            .html_command(self.html_cmd.clone())
            .html_timeout(self.html_timeout.map(Duration::from_secs))
            .build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mailtodo", "-p", "/cal", "-f", "/mail/1.eml"]).unwrap();
        assert_eq!(cli.cal_path, PathBuf::from("/cal"));
        assert_eq!(cli.email_file, PathBuf::from("/mail/1.eml"));
        assert!(!cli.verbose);

        let config = cli.config();
        assert_eq!(config.preferred_type, MediaType::TextPlain);
        assert_eq!(config.html_command, "w3m -T text/html %s");
        assert_eq!(config.html_timeout, None);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "mailtodo",
            "--path",
            "/cal",
            "--email-file",
            "/mail/1.eml",
            "--type",
            "text/html",
            "--html-cmd",
            "",
            "--html-timeout",
            "3",
            "-v",
        ])
        .unwrap();

        let config = cli.config();
        assert!(cli.verbose);
        assert_eq!(config.preferred_type, MediaType::TextHtml);
        assert_eq!(config.html_command, "");
        assert_eq!(config.html_timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_required_arguments() {
        assert!(Cli::try_parse_from(["mailtodo", "-p", "/cal"]).is_err());
        assert!(Cli::try_parse_from(["mailtodo", "-f", "/mail/1.eml"]).is_err());
    }

    #[test]
    fn test_invalid_type_rejected() {
        let result = Cli::try_parse_from(["mailtodo", "-p", "/c", "-f", "/m", "-t", "plain"]);
        assert!(result.is_err());
    }
}
