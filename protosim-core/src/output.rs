//! Output sinks.
//!
//! Validators and projectors never write to the terminal directly; they report
//! through an [`Output`] passed in by the caller.

use crate::table::Table;
use colored::Colorize;

/// Destination for diagnostics, headings and tables.
pub trait Output {
    /// Emits a section heading.
    fn heading(&mut self, text: &str);

    /// Emits a diagnostic, e.g. label `Error` with the failure detail.
    fn error(&mut self, label: &str, detail: &str);

    /// Emits free-form text.
    fn text(&mut self, text: &str);

    /// Emits a rendered table.
    fn table(&mut self, table: &Table);
}

/// Writes styled output to the terminal. Diagnostics go to stderr.
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl ConsoleOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Output for ConsoleOutput {
    fn heading(&mut self, text: &str) {
        println!("{}", text.bold().cyan());
    }

    fn error(&mut self, label: &str, detail: &str) {
        eprintln!("{}: {}", label.bold().red(), detail);
    }

    fn text(&mut self, text: &str) {
        println!("{}", text.italic().green());
    }

    fn table(&mut self, table: &Table) {
        println!("{}", table.render(true));
    }
}

/// An item recorded by [`CapturedOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitted {
    Heading(String),
    Error { label: String, detail: String },
    Text(String),
    Table(Table),
}

/// Records everything emitted, in order.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    items: Vec<Emitted>,
}

impl CapturedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Emitted] {
        &self.items
    }

    /// Returns the details of all emitted diagnostics.
    pub fn errors(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Emitted::Error { detail, .. } => Some(detail.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn headings(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Emitted::Heading(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Emitted::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }
}

impl Output for CapturedOutput {
    fn heading(&mut self, text: &str) {
        self.items.push(Emitted::Heading(text.to_string()));
    }

    fn error(&mut self, label: &str, detail: &str) {
        self.items.push(Emitted::Error {
            label: label.to_string(),
            detail: detail.to_string(),
        });
    }

    fn text(&mut self, text: &str) {
        self.items.push(Emitted::Text(text.to_string()));
    }

    fn table(&mut self, table: &Table) {
        self.items.push(Emitted::Table(table.clone()));
    }
}
