/// Spreadsheet column name for a 0-based column index: A..Z, AA, AB, ...
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index + 1;
    while remaining > 0 {
        let offset = (remaining - 1) % 26;
        letters.push(b'A' + offset as u8);
        remaining = (remaining - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Letters of the columns holding cost-center amounts, which follow a fixed
/// number of leading label columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataColumns {
    letters: Vec<String>,
}

impl DataColumns {
    pub fn new(leading_columns: usize, data_columns: usize) -> Self {
        Self {
            letters: (leading_columns..leading_columns + data_columns)
                .map(column_letter)
                .collect(),
        }
    }

    pub fn letters(&self) -> &[String] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// `=SUM(D7:F7)` across every data column of `row`.
    pub fn row_sum(&self, row: usize) -> Option<String> {
        let (first, last) = (self.letters.first()?, self.letters.last()?);
        Some(format!("=SUM({first}{row}:{last}{row})"))
    }
}

/// `=SUM(D3:D9)` down one column.
pub fn column_sum(column: &str, first_row: usize, last_row: usize) -> String {
    format!("=SUM({column}{first_row}:{column}{last_row})")
}

/// `=D12+D20+D31` over explicit rows of one column.
pub fn cell_list_sum(column: &str, rows: &[usize]) -> String {
    let cells: Vec<String> = rows.iter().map(|row| format!("{column}{row}")).collect();
    format!("={}", cells.join("+"))
}
