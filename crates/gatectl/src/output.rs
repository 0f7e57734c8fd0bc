//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output` (or the config
//! default). Table mode prints a two-column key/value grid with `tabled`,
//! structured formats use serde, plain emits bare values for scripting.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

/// Resolved presentation settings for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, color: ColorMode, quiet: bool) -> Self {
        Self {
            format,
            color: should_color(color),
            quiet,
        }
    }

    /// Render a record: `rows` for table mode, `plain` for plain mode,
    /// serde for everything else.
    pub fn record<T: serde::Serialize + ?Sized>(
        &self,
        data: &T,
        rows: impl FnOnce(&T) -> Vec<(&'static str, String)>,
        plain: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        let rendered = match self.format {
            OutputFormat::Table => render_detail(&rows(data)),
            OutputFormat::Plain => plain(data),
            _ => self.structured(data)?,
        };
        print_output(&rendered, self.quiet);
        Ok(())
    }

    /// Render a document: `text` for table and plain modes, serde otherwise.
    pub fn document<T: serde::Serialize + ?Sized>(
        &self,
        data: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        let rendered = match self.format {
            OutputFormat::Table | OutputFormat::Plain => text(data),
            _ => self.structured(data)?,
        };
        print_output(&rendered, self.quiet);
        Ok(())
    }

    /// Render a free-form value (raw responses, backups, telnet state).
    pub fn value(&self, data: &serde_json::Value) -> Result<(), CliError> {
        let rendered = match (self.format, data) {
            (OutputFormat::Plain, serde_json::Value::String(s)) => s.clone(),
            (OutputFormat::Table | OutputFormat::Json | OutputFormat::Plain, _) => {
                render_json(data, false)?
            }
            _ => self.structured(data)?,
        };
        print_output(&rendered, self.quiet);
        Ok(())
    }

    fn structured<T: serde::Serialize + ?Sized>(&self, data: &T) -> Result<String, CliError> {
        match self.format {
            OutputFormat::Yaml => render_yaml(data),
            OutputFormat::JsonCompact => render_json(data, true),
            _ => render_json(data, false),
        }
    }

    /// Success line on stderr, suppressed by `--quiet`.
    pub fn notice(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            eprintln!("{} {message}", "✓".green());
        } else {
            eprintln!("{message}");
        }
    }
}

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Two-column key/value table for single-record views.
pub fn render_detail(rows: &[(&'static str, String)]) -> String {
    let mut builder = Builder::default();
    for (key, value) in rows {
        builder.push_record([(*key).to_owned(), value.clone()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)?
    } else {
        serde_json::to_string_pretty(data)?
    };
    Ok(rendered)
}

pub fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_yaml::to_string(data)?)
}
