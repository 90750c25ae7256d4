//! Terminal output.
//!
//! Status messages go to stderr; command results (listings, JSON) go to
//! stdout so they can be piped.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    data: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            data: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Write a line of command output to stdout.
    pub(crate) fn data(&self, line: &str) -> std::io::Result<()> {
        self.data.write_line(line)
    }

    /// Write `key: value` to stdout with the key dimmed.
    pub(crate) fn field(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.data
            .write_line(&format!("{} {value}", self.dim.apply_to(format!("{key}:"))))
    }
}
