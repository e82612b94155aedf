use std::{fmt, io::Write};

use crate::ledger::format_amount;

/// A single output cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    /// Rendered with two decimals.
    Amount(f64),
    /// A spreadsheet formula such as `=SUM(D3:D9)`.
    Formula(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Cell::Formula(_))
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) | Cell::Formula(value) => f.write_str(value),
            Cell::Amount(value) => f.write_str(&format_amount(*value)),
        }
    }
}

/// One output line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportRow {
    cells: Vec<Cell>,
}

impl ReportRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn push(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    pub fn extend(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.cells.extend(cells);
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.cells.iter().map(Cell::to_string).collect()
    }

    /// The row as one tab-separated line, without the line break.
    pub fn to_tsv_line(&self) -> String {
        self.to_strings().join("\t")
    }
}

impl FromIterator<Cell> for ReportRow {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// A rendered report. Rows are numbered from 1 as in a spreadsheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row and returns its 1-based row number.
    pub fn push(&mut self, row: ReportRow) -> usize {
        self.rows.push(row);
        self.rows.len()
    }

    /// Number of the last row written, 0 for an empty report.
    pub fn last_row(&self) -> usize {
        self.rows.len()
    }

    /// Number the next pushed row will get.
    pub fn next_row(&self) -> usize {
        self.rows.len() + 1
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Row by its 1-based number.
    pub fn row(&self, number: usize) -> Option<&ReportRow> {
        number.checked_sub(1).and_then(|index| self.rows.get(index))
    }

    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(ReportRow::to_strings).collect()
    }

    /// Writes the report as tab-separated lines, one row per line.
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for row in &self.rows {
            writeln!(writer, "{}", row.to_tsv_line())?;
        }
        writer.flush()
    }

    pub fn to_tsv(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.to_tsv_line() + "\n")
            .collect()
    }
}
