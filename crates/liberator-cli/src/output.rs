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

/// Terminal messages in the chosen format. Errors are shown even when quiet.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.message("success", msg.as_ref()),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.message("error", msg.as_ref()),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.message("info", msg.as_ref()),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.message("warning", msg.as_ref()),
        }
    }

    /// Plain line in human mode; dropped in JSON modes
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", msg.as_ref());
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && !self.is_human() {
            return;
        }
        self.print_json(data);
    }

    /// Diagnostic the user has to read before a prompt. Goes to stderr and is
    /// shown even when quiet.
    pub fn notice(&self, lines: &[String], data: &serde_json::Value) {
        match self.format {
            OutputFormat::Human => {
                for line in lines {
                    eprintln!("{}", line);
                }
            }
            _ => eprintln!("{}", self.render_json(data)),
        }
    }

    fn message(&self, kind: &str, msg: &str) {
        self.print_json(&json!({
            "type": kind,
            "message": msg,
        }));
    }

    fn render_json(&self, data: &serde_json::Value) -> String {
        let text = match self.format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(data),
            _ => serde_json::to_string(data),
        };
        text.unwrap_or_default()
    }

    fn print_json(&self, data: &serde_json::Value) {
        println!("{}", self.render_json(data));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_follows_format() {
        let data = json!({"type": "info", "message": "hi"});

        let compact = Output::new(OutputFormat::Json, true).render_json(&data);
        assert_eq!(compact, r#"{"message":"hi","type":"info"}"#);

        let pretty = Output::new(OutputFormat::JsonPretty, false).render_json(&data);
        assert!(pretty.contains('\n'));
    }
}
