use std::collections::BTreeMap;

use super::{header_rows, Cell, Report, ReportRow, LABEL_COLUMNS};
use crate::{config::CenterNames, ledger::Ledger};

/// Renders one literal row per non-empty account followed by a totals row.
pub fn render_flat(ledger: &Ledger, names: &CenterNames) -> Report {
    let mut report = Report::new();
    for row in header_rows(ledger, names, LABEL_COLUMNS) {
        report.push(row);
    }

    let mut sums: BTreeMap<&str, f64> = ledger
        .cost_centers()
        .iter()
        .map(|center| (center.as_str(), 0.0))
        .collect();

    for (code, account) in ledger.accounts() {
        if account.is_empty() {
            continue;
        }

        let mut row = ReportRow::new()
            .with(Cell::text(code.as_str()))
            .with(Cell::text(account.name.as_str()))
            .with(Cell::Amount(account.total()));
        for center in ledger.cost_centers() {
            let value = account.amount(center);
            if let Some(sum) = sums.get_mut(center.as_str()) {
                *sum += value;
            }
            row.push(Cell::Amount(value));
        }
        report.push(row);
    }

    report.push(ReportRow::blank());
    let mut totals = ReportRow::new()
        .with(Cell::Empty)
        .with(Cell::text("Total"))
        .with(Cell::Empty);
    totals.extend(sums.values().map(|sum| Cell::Amount(*sum)));
    report.push(totals);

    report
}
