//! Plain-text tables for the installation plan.

/// Column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A borderless table: header, rule, rows.
#[derive(Debug)]
pub struct Table {
    columns: Vec<(String, Align)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given left-aligned headers.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            columns: headers.iter().map(|h| (h.to_string(), Align::Left)).collect(),
            rows: Vec::new(),
        }
    }

    /// Change the alignment of one column.
    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(col) = self.columns.get_mut(column) {
            col.1 = align;
        }
        self
    }

    /// Add a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) {
        self.rows
            .push(row.iter().map(|c| c.as_ref().to_string()).collect());
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Render as text, one line per row, no trailing newline.
    pub fn render(&self) -> String {
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let headers: Vec<String> = self.columns.iter().map(|(h, _)| h.clone()).collect();
        let rule_len = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);

        let mut lines = vec![self.render_row(&headers, &widths), "─".repeat(rule_len)];
        lines.extend(self.rows.iter().map(|r| self.render_row(r, &widths)));
        lines.join("\n")
    }

    fn render_row(&self, row: &[String], widths: &[usize]) -> String {
        let cells: Vec<String> = self
            .columns
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, ((_, align), width))| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                match align {
                    Align::Left => format!("{:<width$}", cell, width = *width),
                    Align::Right => format!("{:>width$}", cell, width = *width),
                }
            })
            .collect();
        cells.join("  ").trim_end().to_string()
    }
}
