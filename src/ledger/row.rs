use serde::{Deserialize, Serialize};

/// Zero-based column positions of the fields read from a huvudbok export.
///
/// These follow the export file format and cannot be inferred from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub account: usize,
    pub name: usize,
    pub cost_center: usize,
    pub date: usize,
    pub debit: usize,
    pub credit: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            account: 0,
            name: 1,
            cost_center: 2,
            date: 4,
            debit: 7,
            credit: 9,
        }
    }
}

/// One tab-separated line of the export, split but not yet interpreted.
#[derive(Debug, Clone)]
pub struct LedgerRow<'a> {
    cells: Vec<&'a str>,
    layout: ColumnLayout,
}

impl<'a> LedgerRow<'a> {
    pub fn split(line: &'a str, layout: ColumnLayout) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        Self {
            cells: line.split('\t').map(str::trim).collect(),
            layout,
        }
    }

    fn cell(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).copied()
    }

    /// The account code, when this row opens an account block.
    pub fn account_code(&self) -> Option<&'a str> {
        self.cell(self.layout.account)
            .filter(|code| code.parse::<i64>().is_ok())
    }

    pub fn name(&self) -> &'a str {
        self.cell(self.layout.name).unwrap_or_default()
    }

    /// The transaction date, or `None` when the column is absent or blank.
    pub fn date(&self) -> Option<&'a str> {
        self.cell(self.layout.date).filter(|date| !date.is_empty())
    }

    /// Whether the row carries a transaction dated in `year`.
    pub fn is_in_year(&self, year: &str) -> bool {
        self.date().is_some_and(|date| date.starts_with(year))
    }

    /// The cost-center cell; `Some("")` when present but blank.
    pub fn cost_center(&self) -> Option<&'a str> {
        self.cell(self.layout.cost_center)
    }

    pub fn debit(&self) -> Option<&'a str> {
        self.cell(self.layout.debit)
    }

    pub fn credit(&self) -> Option<&'a str> {
        self.cell(self.layout.credit)
    }
}
