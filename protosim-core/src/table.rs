//! Table model used by the projectors.

use colored::Colorize;

/// A table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    /// Render the column's cells dimmed on a styled console.
    pub dim: bool,
}

impl Column {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            dim: false,
        }
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }
}

/// Rows of string cells under a fixed set of columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Short rows are padded with empty cells and extra cells dropped.
    /// Control characters are escaped so every row stays on one line.
    pub fn add_row(&mut self, row: Vec<String>) {
        let mut row: Vec<String> = row.iter().map(|cell| escape_controls(cell)).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    /// Returns the cell at `row`, `col`.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Returns the row whose first cell equals `key`.
    pub fn row_by_key(&self, key: &str) -> Option<&[String]> {
        self.rows
            .iter()
            .find(|r| r.first().map(String::as_str) == Some(key))
            .map(Vec::as_slice)
    }

    /// Returns the display width of each column.
    pub fn widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                self.rows
                    .iter()
                    .map(|r| r.get(i).map_or(0, |cell| cell.chars().count()))
                    .chain(std::iter::once(col.header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// Renders the table as a bordered grid, optionally with terminal styling.
    pub fn render(&self, styled: bool) -> String {
        let widths = self.widths();
        let border = {
            let mut line = String::from("+");
            for w in &widths {
                line.push_str(&"-".repeat(w + 2));
                line.push('+');
            }
            line
        };

        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');

        out.push('|');
        for (col, w) in self.columns.iter().zip(&widths) {
            let cell = format!("{:<width$}", col.header, width = w);
            if styled {
                out.push_str(&format!(" {} |", cell.bold().cyan()));
            } else {
                out.push_str(&format!(" {} |", cell));
            }
        }
        out.push('\n');
        out.push_str(&border);
        out.push('\n');

        for row in &self.rows {
            out.push('|');
            for ((text, col), w) in row.iter().zip(&self.columns).zip(&widths) {
                let cell = format!("{:<width$}", text, width = w);
                if styled && col.dim {
                    out.push_str(&format!(" {} |", cell.dimmed()));
                } else {
                    out.push_str(&format!(" {} |", cell));
                }
            }
            out.push('\n');
        }
        if !self.rows.is_empty() {
            out.push_str(&border);
        }

        out
    }
}

fn escape_controls(cell: &str) -> String {
    if !cell.contains(char::is_control) {
        return cell.to_string();
    }
    cell.chars()
        .map(|c| {
            if c.is_control() {
                c.escape_default().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}
