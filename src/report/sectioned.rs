//! The sectioned layout: accounts grouped by code range, each group closed by
//! a subtotal row of `=SUM(..)` formulas, with sum lines adding up earlier
//! subtotals.
//!
//! Formulas refer to rows by number, so the renderer tracks where every
//! section started and ended while it writes.

use tracing::warn;

use super::{
    columns::{cell_list_sum, column_sum, DataColumns},
    header_rows,
    sections::{SectionId, SectionPlan, SumLineId, SumTerm},
    Cell, Report, ReportRow, LABEL_COLUMNS,
};
use crate::{
    config::CenterNames,
    errors::{HuvudbokError, Result},
    ledger::{Account, AccountCode, Ledger},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionedOptions {
    /// Columns before the first cost-center column; at least the three labels.
    pub leading_columns: usize,
    /// Open and close the sections after the last account so that their
    /// headers, subtotals and sum lines are written too.
    pub flush_trailing_sections: bool,
}

impl Default for SectionedOptions {
    fn default() -> Self {
        Self {
            leading_columns: LABEL_COLUMNS,
            flush_trailing_sections: false,
        }
    }
}

/// Rows of one opened section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SectionRows {
    /// Row the first account of the section goes to.
    first: usize,
    /// Last row written before the section closed.
    end: Option<usize>,
}

struct RenderContext<'a> {
    plan: &'a SectionPlan,
    centers: Vec<&'a str>,
    columns: DataColumns,
    padding: usize,
    flush_trailing_sections: bool,
    report: Report,
    current: Option<SectionId>,
    /// First section not yet opened.
    next: usize,
    started: bool,
    section_rows: Vec<Option<SectionRows>>,
    sum_line_rows: Vec<Option<usize>>,
}

impl<'a> RenderContext<'a> {
    fn new(ledger: &'a Ledger, plan: &'a SectionPlan, options: &SectionedOptions) -> Self {
        let leading = options.leading_columns.max(LABEL_COLUMNS);
        let centers: Vec<&str> = ledger.cost_centers().iter().map(String::as_str).collect();
        Self {
            plan,
            columns: DataColumns::new(leading, centers.len()),
            centers,
            padding: leading - LABEL_COLUMNS,
            flush_trailing_sections: options.flush_trailing_sections,
            report: Report::new(),
            current: None,
            next: 0,
            started: false,
            section_rows: vec![None; plan.sections().len()],
            sum_line_rows: vec![None; plan.sum_lines().len()],
        }
    }

    fn push(&mut self, row: ReportRow) -> usize {
        self.report.push(row)
    }

    /// The three label cells plus padding up to the first data column.
    fn label_row(&self, first: Cell, second: Cell, row: usize) -> ReportRow {
        let total = match self.columns.row_sum(row) {
            Some(formula) => Cell::Formula(formula),
            None => Cell::Amount(0.0),
        };
        let mut cells = ReportRow::new().with(first).with(second).with(total);
        cells.extend(std::iter::repeat(Cell::Empty).take(self.padding));
        cells
    }

    fn is_hidden(&self) -> bool {
        self.current
            .is_some_and(|id| self.plan.section(id).hidden)
    }

    /// Moves the section cursor to the section holding `code`, closing the
    /// current one and passing through any sections in between.
    fn enter(&mut self, code: i64) -> Result<()> {
        if let Some(current) = self.current {
            if self.plan.section(current).contains(code) {
                return Ok(());
            }
            self.close(current)?;
            self.current = None;
        }

        let plan = self.plan;
        let sections = plan.sections();
        while self.next < sections.len() && sections[self.next].ends_before(code) {
            let passed = SectionId(self.next);
            // Sections below the very first account are not part of the report.
            if self.started {
                self.open(passed);
                self.close(passed)?;
            }
            self.next += 1;
        }

        if self.next < sections.len() && sections[self.next].contains(code) {
            let id = SectionId(self.next);
            self.open(id);
            self.current = Some(id);
            self.next += 1;
        }
        Ok(())
    }

    fn open(&mut self, id: SectionId) {
        let plan = self.plan;
        let section = plan.section(id);
        if !section.hidden {
            self.push(ReportRow::new().with(Cell::text(section.name.as_str())));
        }
        self.section_rows[id.0] = Some(SectionRows {
            first: self.report.next_row(),
            end: None,
        });
        self.started = true;
    }

    fn close(&mut self, id: SectionId) -> Result<()> {
        let end = self.report.last_row();
        let first = match self.section_rows[id.0].as_mut() {
            Some(rows) => {
                rows.end = Some(end);
                rows.first
            }
            None => {
                return Err(HuvudbokError::SectionRange(format!(
                    "section `{}` closed before it was opened",
                    self.plan.section(id).name
                )))
            }
        };

        let plan = self.plan;
        let section = plan.section(id);
        let mut wrote = false;
        if !section.hidden {
            let row = self.report.next_row();
            let mut subtotal = self.label_row(
                Cell::text(format!("Summa {}", section.name)),
                Cell::Empty,
                row,
            );
            for column in self.columns.letters() {
                subtotal.push(if end >= first {
                    Cell::Formula(column_sum(column, first, end))
                } else {
                    Cell::Amount(0.0)
                });
            }
            self.push(subtotal);
            wrote = true;
        }

        let hosted: Vec<SumLineId> = plan.sum_lines_after(id).collect();
        for line in hosted {
            self.write_sum_line(line)?;
            wrote = true;
        }

        if wrote {
            self.push(ReportRow::blank());
        }
        Ok(())
    }

    /// Row holding the subtotal of a closed section: one past its end.
    fn sum_row(&self, id: SectionId) -> Result<Option<usize>> {
        let section = self.plan.section(id);
        if section.hidden {
            return Err(HuvudbokError::SectionRange(format!(
                "hidden section `{}` has no subtotal row",
                section.name
            )));
        }
        Ok(self.section_rows[id.0]
            .and_then(|rows| rows.end)
            .map(|end| end + 1))
    }

    fn term_row(&self, term: SumTerm) -> Result<Option<usize>> {
        match term {
            SumTerm::Section(id) => self.sum_row(id),
            SumTerm::SumLine(id) => Ok(self.sum_line_rows[id.0]),
        }
    }

    fn term_name(&self, term: SumTerm) -> &str {
        match term {
            SumTerm::Section(id) => &self.plan.section(id).name,
            SumTerm::SumLine(id) => &self.plan.sum_line(id).name,
        }
    }

    fn write_sum_line(&mut self, id: SumLineId) -> Result<()> {
        let plan = self.plan;
        let line = plan.sum_line(id);

        let mut rows = Vec::with_capacity(line.terms.len());
        for term in &line.terms {
            match self.term_row(*term)? {
                Some(row) => rows.push(row),
                None => warn!(
                    sum_line = %line.name,
                    term = %self.term_name(*term),
                    "term has no subtotal in this report, leaving it out"
                ),
            }
        }

        let row = self.report.next_row();
        let mut cells = self.label_row(Cell::text(line.name.as_str()), Cell::Empty, row);
        for column in self.columns.letters() {
            cells.push(if rows.is_empty() {
                Cell::Amount(0.0)
            } else {
                Cell::Formula(cell_list_sum(column, &rows))
            });
        }
        let written = self.push(cells);
        self.sum_line_rows[id.0] = Some(written);
        Ok(())
    }

    fn write_account(&mut self, code: &AccountCode, account: &Account) {
        let row = self.report.next_row();
        let mut cells = self.label_row(
            Cell::text(code.as_str()),
            Cell::text(account.name.as_str()),
            row,
        );
        cells.extend(
            self.centers
                .iter()
                .map(|center| Cell::Amount(account.amount(center))),
        );
        self.push(cells);
    }

    fn finish(mut self) -> Result<Report> {
        if let Some(current) = self.current.take() {
            self.close(current)?;
        }
        if self.flush_trailing_sections {
            while self.next < self.plan.sections().len() {
                let id = SectionId(self.next);
                self.open(id);
                self.close(id)?;
                self.next += 1;
            }
        }
        Ok(self.report)
    }
}

/// Renders the sectioned report.
///
/// Accounts with only zero amounts are left out. Accounts outside every
/// section are written without a subtotal. The whole report is built in
/// memory, so an error means nothing is written.
pub fn render_sectioned(
    ledger: &Ledger,
    names: &CenterNames,
    plan: &SectionPlan,
    options: &SectionedOptions,
) -> Result<Report> {
    let mut context = RenderContext::new(ledger, plan, options);
    for row in header_rows(ledger, names, options.leading_columns.max(LABEL_COLUMNS)) {
        context.push(row);
    }

    for (code, account) in ledger.accounts() {
        if account.is_empty() {
            continue;
        }
        context.enter(code.value())?;
        if context.is_hidden() {
            continue;
        }
        context.write_account(code, account);
    }

    context.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Section;

    fn ledger(accounts: Vec<(&str, &str, Vec<(&str, f64)>)>) -> Ledger {
        let mut ledger = Ledger::new();
        for (code, name, amounts) in accounts {
            let mut account = Account::new(name);
            for (center, value) in amounts {
                account.add(center, value);
            }
            ledger.insert_account(AccountCode::parse(code).expect("code"), account);
        }
        ledger
    }

    fn render(ledger: &Ledger, plan: &SectionPlan) -> Vec<Vec<String>> {
        render_sectioned(ledger, &CenterNames::default(), plan, &SectionedOptions::default())
            .expect("render")
            .to_strings()
    }

    #[test]
    fn account_rows_sum_their_own_row() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0), ("P2", 5.0)]),
            ("3020", "Fees", vec![("P1", 1.0)]),
        ]);
        let plan = SectionPlan::new(vec![Section::new("Intäkter", 3000, 4000)]).expect("plan");

        let rows = render(&ledger, &plan);
        assert_eq!(rows[2], vec!["Intäkter"]);
        assert_eq!(rows[3], vec!["3010", "Sales", "=SUM(D4:E4)", "10.00", "5.00"]);
        assert_eq!(rows[4], vec!["3020", "Fees", "=SUM(D5:E5)", "1.00", "0.00"]);
        assert_eq!(
            rows[5],
            vec!["Summa Intäkter", "", "=SUM(D6:E6)", "=SUM(D4:D5)", "=SUM(E4:E5)"]
        );
        assert!(rows[6].is_empty());
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn hidden_sections_consume_accounts() {
        let ledger = ledger(vec![
            ("1930", "Bank", vec![("P1", 99.0)]),
            ("3010", "Sales", vec![("P1", 10.0)]),
        ]);
        let plan = SectionPlan::new(vec![
            Section::new("Balans", 1000, 3000).hidden(),
            Section::new("Intäkter", 3000, 4000),
        ])
        .expect("plan");

        let rows = render(&ledger, &plan);
        assert!(rows.iter().all(|row| row.first().map(String::as_str) != Some("1930")));
        assert_eq!(rows[2], vec!["Intäkter"]);
        assert_eq!(rows[3][0], "3010");
    }

    #[test]
    fn zero_width_section_is_passed_through_with_zero_subtotal() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0)]),
            ("3950", "Other", vec![("P1", 2.0)]),
        ]);
        let plan = SectionPlan::new(vec![
            Section::new("A", 3000, 3900),
            Section::new("Zero", 3900, 3900),
            Section::new("B", 3900, 4000),
        ])
        .expect("plan");

        let rows = render(&ledger, &plan);
        let zero_header = rows
            .iter()
            .position(|row| row == &vec!["Zero".to_string()])
            .expect("zero-width header written");
        assert_eq!(rows[zero_header + 1][0], "Summa Zero");
        assert_eq!(rows[zero_header + 1][3], "0.00");
        assert_eq!(rows[zero_header + 3], vec!["B"]);
    }

    #[test]
    fn zero_width_section_hosts_sum_lines() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0)]),
            ("3950", "Other", vec![("P1", 2.0)]),
        ]);
        let mut plan = SectionPlan::new(vec![
            Section::new("A", 3000, 3900),
            Section::new("Zero", 3900, 3900),
            Section::new("B", 3900, 4000),
        ])
        .expect("plan");
        plan.add_sum_line("Hittills", "Zero", &["A"])
            .expect("sum line");

        let rows = render(&ledger, &plan);
        // 3 A, 4 3010, 5 subtotal, 6 blank, 7 Zero, 8 subtotal, 9 Hittills, 10 blank, 11 B
        assert_eq!(rows[4][0], "Summa A");
        assert_eq!(rows[6], vec!["Zero"]);
        assert_eq!(rows[7], vec!["Summa Zero", "", "=SUM(D8:D8)", "0.00"]);
        assert_eq!(rows[8], vec!["Hittills", "", "=SUM(D9:D9)", "=D5"]);
        assert!(rows[9].is_empty());
        assert_eq!(rows[10], vec!["B"]);
    }

    #[test]
    fn accounts_netting_to_zero_are_left_out() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0)]),
            ("3020", "Refunded", vec![("P1", 250.0), ("P1", -250.0)]),
        ]);
        let plan = SectionPlan::new(vec![Section::new("Intäkter", 3000, 4000)]).expect("plan");

        let rows = render(&ledger, &plan);
        assert!(rows.iter().all(|row| row.first().map(String::as_str) != Some("3020")));
        assert_eq!(rows[3][0], "3010");
        assert_eq!(
            rows[4],
            vec!["Summa Intäkter", "", "=SUM(D5:D5)", "=SUM(D4:D4)"]
        );
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn sum_lines_reference_subtotal_rows() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0)]),
            ("4010", "Goods", vec![("P1", -4.0)]),
        ]);
        let mut plan = SectionPlan::new(vec![
            Section::new("Intäkter", 3000, 4000),
            Section::new("Kostnader", 4000, 5000),
        ])
        .expect("plan");
        plan.add_sum_line("Resultat", "Kostnader", &["Intäkter", "Kostnader"])
            .expect("sum line");

        let rows = render(&ledger, &plan);
        // 1-2 headers, 3 Intäkter, 4 3010, 5 subtotal, 6 blank,
        // 7 Kostnader, 8 4010, 9 subtotal, 10 Resultat, 11 blank
        assert_eq!(rows[4][0], "Summa Intäkter");
        assert_eq!(rows[8][0], "Summa Kostnader");
        assert_eq!(rows[9], vec!["Resultat", "", "=SUM(D10:D10)", "=D5+D9"]);
        assert!(rows[10].is_empty());
    }

    #[test]
    fn accounts_outside_sections_render_unsectioned() {
        let ledger = ledger(vec![
            ("3010", "Sales", vec![("P1", 10.0)]),
            ("9999", "Odd", vec![("P1", 1.0)]),
        ]);
        let plan = SectionPlan::new(vec![Section::new("Intäkter", 3000, 4000)]).expect("plan");

        let rows = render(&ledger, &plan);
        assert_eq!(rows[4][0], "Summa Intäkter");
        assert_eq!(rows[6], vec!["9999", "Odd", "=SUM(D7:D7)", "1.00"]);
        assert_eq!(rows.len(), 7);
    }

    #[test]
    fn leading_columns_pad_before_data() {
        let ledger = ledger(vec![("3010", "Sales", vec![("P1", 10.0)])]);
        let plan = SectionPlan::default();
        let options = SectionedOptions {
            leading_columns: 4,
            flush_trailing_sections: false,
        };

        let rows = render_sectioned(&ledger, &CenterNames::default(), &plan, &options)
            .expect("render")
            .to_strings();
        assert_eq!(rows[0], vec!["", "", "", "", "P1"]);
        assert_eq!(rows[2], vec!["3010", "Sales", "=SUM(E3:E3)", "", "10.00"]);
    }

    #[test]
    fn flushing_writes_trailing_sections() {
        let ledger = ledger(vec![("3010", "Sales", vec![("P1", 10.0)])]);
        let plan = SectionPlan::new(vec![
            Section::new("Intäkter", 3000, 4000),
            Section::new("Kostnader", 4000, 5000),
        ])
        .expect("plan");
        let options = SectionedOptions {
            flush_trailing_sections: true,
            ..SectionedOptions::default()
        };

        let rows = render_sectioned(&ledger, &CenterNames::default(), &plan, &options)
            .expect("render")
            .to_strings();
        assert_eq!(rows[6], vec!["Kostnader"]);
        assert_eq!(rows[7], vec!["Summa Kostnader", "", "=SUM(D8:D8)", "0.00"]);
    }

    #[test]
    fn hidden_section_has_no_sum_row() {
        let ledger = ledger(vec![]);
        let plan = SectionPlan::new(vec![Section::new("Balans", 1000, 3000).hidden()])
            .expect("plan");
        let context = RenderContext::new(&ledger, &plan, &SectionedOptions::default());
        assert!(matches!(
            context.sum_row(SectionId(0)),
            Err(HuvudbokError::SectionRange(_))
        ));
    }
}
