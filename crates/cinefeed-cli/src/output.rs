use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageKind {
    Success,
    Info,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Success, msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Info, msg.as_ref());
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message(MessageKind::Warning, msg.as_ref());
    }

    /// Print a data document. Quiet mode suppresses it for human output only.
    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format == OutputFormat::Human {
            return;
        }
        println!("{}", self.to_json(data));
    }

    fn message(&self, kind: MessageKind, msg: &str) {
        if self.quiet {
            return;
        }
        match self.render(kind, msg) {
            (Stream::Stdout, line) => println!("{}", line),
            (Stream::Stderr, line) => eprintln!("{}", line),
        }
    }

    /// Warnings go to stderr in every format, so JSON stdout holds only
    /// the documents a command prints.
    fn render(&self, kind: MessageKind, msg: &str) -> (Stream, String) {
        let stream = match kind {
            MessageKind::Warning => Stream::Stderr,
            MessageKind::Success | MessageKind::Info => Stream::Stdout,
        };
        let line = match (self.format, kind) {
            (OutputFormat::Human, MessageKind::Success) => format!("{} {}", "✓".green(), msg),
            (OutputFormat::Human, MessageKind::Info) => msg.to_string(),
            (OutputFormat::Human, MessageKind::Warning) => format!("{} {}", "⚠".yellow(), msg),
            (OutputFormat::Json | OutputFormat::JsonPretty, _) => {
                let label = match kind {
                    MessageKind::Success => "success",
                    MessageKind::Info => "info",
                    MessageKind::Warning => "warning",
                };
                self.to_json(&json!({"type": label, "message": msg}))
            }
        };
        (stream, line)
    }

    fn to_json(&self, data: &serde_json::Value) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string(data).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data).unwrap_or_default(),
            OutputFormat::Human => data.to_string(),
        }
    }
}
