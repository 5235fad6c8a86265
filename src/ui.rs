//! Terminal UI utilities.
//!
//! A small auto-sizing table with Unicode box-drawing borders, used by
//! `cxflags explain` to show where each flag came from.

use colored::*;
use console::{measure_text_width, truncate_str};

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        print!("{}", self.render(term_width as usize));
    }

    /// Render to a string no wider than `max_width` where possible.
    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&flatten(cell)));
            }
        }

        // shrink the widest column until the table fits, down to 8 chars
        let overhead = 1 + 3 * self.headers.len();
        while overhead + widths.iter().sum::<usize>() > max_width {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= 8 {
                break;
            }
            widths[idx] -= 1;
        }

        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{}{}{}\n", left, segments.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| {
            let mut out = String::from("│");
            for (cell, &width) in cells.iter().zip(&widths) {
                let text = truncate_str(&flatten(cell), width, "...").into_owned();
                let padding = width.saturating_sub(measure_text_width(&text));
                let text = if bold { text.bold().to_string() } else { text };
                out.push_str(&format!(" {}{} │", text, " ".repeat(padding)));
            }
            out.push('\n');
            out
        };

        let mut out = border("┌", "┬", "┐");
        out.push_str(&line(&self.headers, true));
        out.push_str(&border("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row, false));
        }
        out.push_str(&border("└", "┴", "┘"));
        out
    }
}

fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fits_content() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Source", "Flags"]);
        table.add_row(vec!["system".to_string(), "-isystem /usr/include".to_string()]);
        table.add_row(vec!["bad row".to_string()]);

        let out = table.render(200);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[3].contains("-isystem /usr/include"));
        assert!(lines.iter().all(|l| measure_text_width(l) == measure_text_width(lines[0])));
    }

    #[test]
    fn test_render_truncates_wide_cells() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Source", "Flags"]);
        table.add_row(vec!["compdb".to_string(), "-D".repeat(100)]);

        let out = table.render(40);
        assert!(out.contains("..."));
        assert!(out.lines().all(|l| measure_text_width(l) <= 40));
    }
}
