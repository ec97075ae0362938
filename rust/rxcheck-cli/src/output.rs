//! Rendering of diagnostics and resolved enum tables.

use clap::ValueEnum;
use rxcheck_checker::{Diagnostic, MemberEntry, Resolution};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Plain,
    Json,
}

// ANSI color helpers
pub fn red(s: &str) -> String {
    format!("\x1b[31m{}\x1b[0m", s)
}
pub fn green(s: &str) -> String {
    format!("\x1b[32m{}\x1b[0m", s)
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}
pub fn gray(s: &str) -> String {
    format!("\x1b[90m{}\x1b[0m", s)
}

pub fn render_diagnostics(
    file: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => serde_json::to_string_pretty(diagnostics),
        Format::Plain => {
            if diagnostics.is_empty() {
                return Ok(format!("{} {} {}\n", green("✓"), bold(file), gray("(no findings)")));
            }
            let mut out = String::new();
            for d in diagnostics {
                let _ = write!(out, "{}:{}", file, d.render_plain());
            }
            let _ = writeln!(
                out,
                "{} {} finding(s) in {}",
                red("error:"),
                diagnostics.len(),
                bold(file)
            );
            Ok(out)
        }
    }
}

#[derive(Serialize)]
struct TableView<'a> {
    class: &'a str,
    members: &'a [MemberEntry],
    findings: Vec<String>,
}

pub fn render_tables(tables: &[&Resolution], format: Format) -> Result<String, serde_json::Error> {
    match format {
        Format::Json => {
            let views: Vec<TableView<'_>> = tables
                .iter()
                .map(|r| TableView {
                    class: &r.class,
                    members: &r.table,
                    findings: r.errors.iter().map(|e| e.to_string()).collect(),
                })
                .collect();
            serde_json::to_string_pretty(&views)
        }
        Format::Plain => {
            let mut out = String::new();
            for r in tables {
                let _ = writeln!(out, "{}", bold(&r.class));
                for m in &r.table {
                    let origin = gray(&format!("(from {})", m.origin));
                    let _ = writeln!(out, "  {} {} = {} {}", m.ty, m.name, m.value, origin);
                }
                for e in &r.errors {
                    let _ = writeln!(out, "  {} {}", red("error:"), e);
                }
            }
            Ok(out)
        }
    }
}
