//! Terminal rendering of layout, manifest and target-conflict problems.
//!
//! A [`Diagnostic`] is one headline plus the path it concerns, any notes
//! about where the problem came from, and `help:` lines naming what to
//! change:
//!
//! ```text
//! error: source folder does not exist: /cache/app/my_src
//!   at /cache/app/my_src
//!   help: Check `source` in the [layout] section of Berth.toml
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The command failed.
    Error,
    /// Reported, processing continued.
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Error => "1;31",
            Severity::Warning => "1;33",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Folder or file the message is about
    pub path: Option<PathBuf>,
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

impl Diagnostic {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            message: message.into(),
            path: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Attach the path the problem concerns.
    pub fn at(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Add a `help:` line telling the user what to change.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Render for the terminal, with ANSI colours when `color` is set.
    pub fn format(&self, color: bool) -> String {
        let paint = |code: &str, text: &str| {
            if color {
                format!("\x1b[{}m{}\x1b[0m", code, text)
            } else {
                text.to_string()
            }
        };

        let mut out = format!(
            "{}: {}\n",
            paint(self.severity.ansi(), self.severity.label()),
            self.message
        );
        if let Some(path) = &self.path {
            out.push_str(&format!("  at {}\n", path.display()));
        }
        for note in &self.notes {
            out.push_str(&format!("  {}: {}\n", paint("1;36", "note"), note));
        }
        for help in &self.help {
            out.push_str(&format!("  {}: {}\n", paint("1;32", "help"), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_folder_rendering() {
        let diag = Diagnostic::error("source folder does not exist: /cache/app/my_src")
            .at("/cache/app/my_src")
            .help("Check `source` in the [layout] section of Berth.toml")
            .help("Make sure the exported sources or archive contain that folder");

        assert_eq!(
            diag.format(false),
            "error: source folder does not exist: /cache/app/my_src\n\
             \x20 at /cache/app/my_src\n\
             \x20 help: Check `source` in the [layout] section of Berth.toml\n\
             \x20 help: Make sure the exported sources or archive contain that folder\n"
        );
    }

    #[test]
    fn test_conflict_warning_notes() {
        let diag = Diagnostic::warning("Target name 'core' already exists.")
            .note("first declared by `zlib`")
            .note("declaration from `app` skipped");

        let output = diag.to_string();
        assert!(output.starts_with("warning: Target name 'core'"));
        assert!(output.contains("  note: first declared by `zlib`\n  note: declaration"));
        assert!(!output.contains("help:"));
        assert!(!output.contains("  at "));
    }

    #[test]
    fn test_colored_severity() {
        let error = Diagnostic::error("boom").format(true);
        assert!(error.starts_with("\x1b[1;31merror\x1b[0m: boom"));

        let warning = Diagnostic::warning("careful").help("fix it").format(true);
        assert!(warning.starts_with("\x1b[1;33mwarning\x1b[0m: careful"));
        assert!(warning.contains("\x1b[1;32mhelp\x1b[0m: fix it"));
    }
}
