//! Terminal rendering for the storefront tool.
//!
//! In `--json` mode nothing but machine-readable documents reach stdout;
//! every decorated line is suppressed.

use console::{style, StyledObject};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Json,
    Human { verbose: bool },
}

#[derive(Debug, Clone, Copy)]
enum Mark {
    Info,
    Ok,
    Warn,
    Fail,
    Trace,
}

impl Mark {
    fn glyph(self) -> StyledObject<&'static str> {
        match self {
            Mark::Info => style("ℹ").blue(),
            Mark::Ok => style("✓").green(),
            Mark::Warn => style("⚠").yellow(),
            Mark::Fail => style("✗").red(),
            Mark::Trace => style("→").dim(),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Mark::Warn | Mark::Fail | Mark::Trace)
    }
}

/// Writes command results for humans or for scripts.
#[derive(Debug, Clone)]
pub struct Output {
    mode: Mode,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        let mode = if json {
            Mode::Json
        } else {
            Mode::Human { verbose }
        };
        Self { mode }
    }

    pub fn is_json(&self) -> bool {
        self.mode == Mode::Json
    }

    fn marked(&self, mark: Mark, text: String) {
        if self.is_json() {
            return;
        }
        let line = format!("{} {}", mark.glyph(), text);
        if mark.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn plain(&self, line: String) {
        if !self.is_json() {
            println!("{line}");
        }
    }

    pub fn info(&self, msg: &str) {
        self.marked(Mark::Info, msg.to_string());
    }

    pub fn success(&self, msg: &str) {
        self.marked(Mark::Ok, msg.to_string());
    }

    pub fn warn(&self, msg: &str) {
        self.marked(Mark::Warn, msg.to_string());
    }

    /// Report a fatal error. Scripts get `{"error": ...}` on stderr.
    pub fn error(&self, msg: &str) {
        match self.mode {
            Mode::Json => eprintln!("{}", serde_json::json!({ "error": msg })),
            Mode::Human { .. } => self.marked(Mark::Fail, style(msg).red().to_string()),
        }
    }

    /// Only shown with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if let Mode::Human { verbose: true } = self.mode {
            self.marked(Mark::Trace, style(msg).dim().to_string());
        }
    }

    pub fn header(&self, title: &str) {
        self.plain(format!("\n{}", style(title).bold().underlined()));
    }

    /// One numbered line of a session transcript.
    pub fn step(&self, num: usize, total: usize, msg: &str) {
        let counter = style(format!("[{num}/{total}]")).dim();
        self.plain(format!("{counter} {msg}"));
    }

    pub fn kv(&self, key: &str, value: &str) {
        self.plain(format!("  {}: {}", style(key).dim(), value));
    }

    pub fn list_item(&self, item: &str) {
        self.plain(format!("  {} {}", style("•").dim(), item));
    }

    /// Pretty-printed document on stdout, printed in either mode.
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(doc) => println!("{doc}"),
            Err(e) => tracing::warn!(error = %e, "could not serialize output"),
        }
    }
}

/// Colored label for an analytics event name.
pub fn event_badge(event: &str) -> String {
    let styled = match event {
        "scAdd" => style(event).green(),
        "scRemove" => style(event).red(),
        "scOpen" => style(event).cyan(),
        "productClick" => style(event).yellow(),
        _ => return event.to_string(),
    };
    styled.to_string()
}
