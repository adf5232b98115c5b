//! HTML to plain text rendering.
//!
//! Rendering is delegated to an external program chosen by the user (for
//! example `w3m` or `lynx`). Rendering never fails a conversion: whatever
//! the program printed is used, and what went wrong is reported alongside
//! as a [`RenderError`].

use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tempfile::NamedTempFile;
use tracing::debug;

/// Placeholder in a command template replaced by the HTML file path.
pub const PATH_PLACEHOLDER: &str = "%s";

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How long to wait for stdout to close after a timed out renderer was
/// killed. Grandchildren of the shell can keep the pipe open.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

/// Ways a renderer run can go wrong.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The temporary HTML file could not be created or written.
    #[error("Cannot prepare temporary file: {0}")]
    TempFile(#[source] io::Error),

    /// The shell could not be started.
    #[error("Cannot start renderer: {0}")]
    Spawn(#[source] io::Error),

    /// Waiting for the renderer failed.
    #[error("Cannot wait for renderer: {0}")]
    Wait(#[source] io::Error),

    /// Reading the renderer output failed.
    #[error("Cannot read renderer output: {0}")]
    Output(#[source] io::Error),

    /// The renderer exited unsuccessfully.
    #[error("Renderer exited with {0}")]
    Exit(ExitStatus),

    /// The renderer ran longer than allowed and was killed.
    #[error("Renderer killed after {0:?}")]
    Timeout(Duration),
}

/// Result of rendering one HTML body.
#[derive(Debug, Default)]
pub struct Rendered {
    /// Rendered text, possibly partial or empty when `error` is set.
    pub text: String,
    /// What went wrong, if anything.
    pub error: Option<RenderError>,
}

impl Rendered {
    /// Successful rendering.
    #[must_use]
    pub const fn ok(text: String) -> Self {
        Self { text, error: None }
    }

    /// Degraded rendering with whatever output was captured.
    #[must_use]
    pub const fn degraded(text: String, error: RenderError) -> Self {
        Self {
            text,
            error: Some(error),
        }
    }
}

/// Converts HTML into plain text.
pub trait HtmlRenderer {
    /// Renders one HTML document.
    fn render(&self, html: &str) -> Rendered;
}

/// Renderer that leaves HTML untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl HtmlRenderer for Passthrough {
    fn render(&self, html: &str) -> Rendered {
        Rendered::ok(html.to_string())
    }
}

/// Renderer that runs a shell command on a temporary copy of the HTML.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    template: String,
    timeout: Option<Duration>,
}

impl CommandRenderer {
    /// Creates a renderer from a command template containing `%s`.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            timeout: None,
        }
    }

    /// Bounds how long the command may run.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the shell command line for an HTML file.
    ///
    /// The first `%s` is replaced by the path; a template without one gets
    /// the path appended.
    #[must_use]
    pub fn command_line(&self, path: &Path) -> String {
        let path = path.display().to_string();
        if self.template.contains(PATH_PLACEHOLDER) {
            self.template.replacen(PATH_PLACEHOLDER, &path, 1)
        } else {
            format!("{} {path}", self.template)
        }
    }

    fn write_temp(html: &str) -> io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("mailtodo-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}

impl HtmlRenderer for CommandRenderer {
    fn render(&self, html: &str) -> Rendered {
        // Dropping the handle removes the file on every return path
        let file = match Self::write_temp(html) {
            Ok(file) => file,
            Err(e) => return Rendered::degraded(String::new(), RenderError::TempFile(e)),
        };

        let command = self.command_line(file.path());
        debug!(%command, "Running HTML renderer");
        let rendered = run_shell(&command, self.timeout);
        drop(file);
        rendered
    }
}

/// Runs `sh -c <command>` and captures its standard output.
fn run_shell(command: &str, timeout: Option<Duration>) -> Rendered {
    let mut child = match Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return Rendered::degraded(String::new(), RenderError::Spawn(e)),
    };

    let Some(mut stdout) = child.stdout.take() else {
        stop(&mut child);
        return Rendered::degraded(
            String::new(),
            RenderError::Output(io::Error::other("stdout not captured")),
        );
    };

    // Drain stdout on a helper thread so a full pipe cannot stall the child
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let result = stdout.read_to_end(&mut buf);
        let _ = tx.send((buf, result));
    });

    let waited = match timeout {
        Some(limit) => wait_with_timeout(&mut child, limit),
        None => child.wait().map(Some),
    };

    let (output, read_result) = match waited {
        Ok(Some(_)) => rx.recv().unwrap_or_else(|_| (Vec::new(), Ok(0))),
        _ => rx
            .recv_timeout(DRAIN_GRACE)
            .unwrap_or_else(|_| (Vec::new(), Ok(0))),
    };
    let text = String::from_utf8_lossy(&output).into_owned();

    let error = match (waited, read_result) {
        (Err(e), _) => Some(RenderError::Wait(e)),
        (Ok(None), _) => timeout.map(RenderError::Timeout),
        (Ok(Some(_)), Err(e)) => Some(RenderError::Output(e)),
        (Ok(Some(status)), Ok(_)) if !status.success() => Some(RenderError::Exit(status)),
        (Ok(Some(_)), Ok(_)) => None,
    };

    match error {
        Some(error) => {
            debug!(%error, "HTML renderer degraded");
            Rendered::degraded(text, error)
        }
        None => Rendered::ok(text),
    }
}

/// Polls the child until it exits or the limit passes, killing it in the
/// latter case. Returns `None` on timeout.
fn wait_with_timeout(child: &mut Child, limit: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + limit;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) if Instant::now() >= deadline => {
                stop(child);
                return Ok(None);
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                stop(child);
                return Err(e);
            }
        }
    }
}

/// Kills the child and reaps it, ignoring failures.
fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_passthrough() {
        let rendered = Passthrough.render("<p>hi</p>");
        assert_eq!(rendered.text, "<p>hi</p>");
        assert!(rendered.error.is_none());
    }

    #[test]
    fn test_command_line_substitutes_first_placeholder() {
        let renderer = CommandRenderer::new("w3m -T text/html %s");
        let path = PathBuf::from("/tmp/mailtodo-x.html");
        assert_eq!(
            renderer.command_line(&path),
            "w3m -T text/html /tmp/mailtodo-x.html"
        );

        let renderer = CommandRenderer::new("render %s --title %s");
        assert_eq!(
            renderer.command_line(&path),
            "render /tmp/mailtodo-x.html --title %s"
        );
    }

    #[test]
    fn test_command_line_without_placeholder_appends_path() {
        let renderer = CommandRenderer::new("lynx -dump");
        let path = PathBuf::from("/tmp/a.html");
        assert_eq!(renderer.command_line(&path), "lynx -dump /tmp/a.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_renderer_captures_stdout() {
        let rendered = CommandRenderer::new("cat %s").render("<p>hi</p>");
        assert_eq!(rendered.text, "<p>hi</p>");
        assert!(rendered.error.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_renderer_removes_temp_file() {
        // The command prints the path it was given
        let rendered = CommandRenderer::new("echo %s").render("<p>x</p>");
        let path = PathBuf::from(rendered.text.trim());
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_removes_temp_file() {
        let rendered = CommandRenderer::new("echo %s; exit 1").render("<p>x</p>");
        let path = PathBuf::from(rendered.text.trim());
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(!path.exists());
        assert!(matches!(rendered.error, Some(RenderError::Exit(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_timed_out_command_removes_temp_file() {
        let rendered = CommandRenderer::new("echo %s; exec sleep 5")
            .timeout(Some(Duration::from_millis(200)))
            .render("<p>x</p>");
        let path = PathBuf::from(rendered.text.trim());
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(!path.exists());
        assert!(matches!(rendered.error, Some(RenderError::Timeout(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_stop_reaps_child() {
        let mut child = Command::new("sleep").arg("5").spawn().unwrap();
        stop(&mut child);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_keeps_partial_output() {
        let rendered = CommandRenderer::new("cat %s; exit 3").render("partial");
        assert_eq!(rendered.text, "partial");
        assert!(matches!(rendered.error, Some(RenderError::Exit(status)) if status.code() == Some(3)));
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_program_degrades_to_empty() {
        let rendered = CommandRenderer::new("mailtodo-no-such-renderer %s").render("<p>x</p>");
        assert_eq!(rendered.text, "");
        assert!(matches!(rendered.error, Some(RenderError::Exit(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_renderer() {
        let started = Instant::now();
        let rendered = CommandRenderer::new("exec sleep 5 # %s")
            .timeout(Some(Duration::from_millis(100)))
            .render("<p>x</p>");
        assert!(started.elapsed() < Duration::from_secs(4));
        assert!(matches!(rendered.error, Some(RenderError::Timeout(_))));
    }
}
