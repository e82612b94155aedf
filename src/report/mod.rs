//! Turning an aggregated [`Ledger`](crate::ledger::Ledger) into output rows.

pub mod cell;
pub mod columns;
pub mod flat;
pub mod sectioned;
pub mod sections;

pub use cell::{Cell, Report, ReportRow};
pub use columns::{column_letter, DataColumns};
pub use flat::render_flat;
pub use sectioned::{render_sectioned, SectionedOptions};
pub use sections::{Section, SectionId, SectionPlan, SumLine, SumLineId, SumTerm};

use crate::{config::CenterNames, ledger::Ledger};

/// Label columns written before the cost-center columns: account, name, total.
pub const LABEL_COLUMNS: usize = 3;

/// The two header rows shared by both layouts: cost-center codes, then the
/// column titles with cost-center labels.
pub(crate) fn header_rows(
    ledger: &Ledger,
    names: &CenterNames,
    leading_columns: usize,
) -> [ReportRow; 2] {
    let padding = leading_columns.saturating_sub(LABEL_COLUMNS);

    let mut codes: ReportRow = std::iter::repeat(Cell::Empty)
        .take(LABEL_COLUMNS + padding)
        .collect();
    codes.extend(ledger.cost_centers().iter().map(Cell::text));

    let mut titles = ReportRow::new()
        .with(Cell::text("account"))
        .with(Cell::text("name"))
        .with(Cell::text("total"));
    titles.extend(std::iter::repeat(Cell::Empty).take(padding));
    titles.extend(
        ledger
            .cost_centers()
            .iter()
            .map(|code| Cell::text(names.label(code))),
    );

    [codes, titles]
}
