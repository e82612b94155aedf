use std::collections::{BTreeMap, BTreeSet};

use tracing::{info, trace};

use super::{
    account::{Account, AccountCode},
    amount::parse_amount,
    row::{ColumnLayout, LedgerRow},
};
use crate::errors::{HuvudbokError, Result};

/// Cost center used for rows that do not name one.
pub const DEFAULT_COST_CENTER: &str = "saknar ks";

/// Accounts and cost centers accumulated from one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    accounts: BTreeMap<AccountCode, Account>,
    cost_centers: BTreeSet<String>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts in ascending code order.
    pub fn accounts(&self) -> impl Iterator<Item = (&AccountCode, &Account)> {
        self.accounts.iter()
    }

    pub fn account(&self, code: &str) -> Option<&Account> {
        let code = AccountCode::parse(code)?;
        self.accounts.get(&code)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Returns the account for `code`, creating an unnamed one if needed.
    pub fn account_entry(&mut self, code: AccountCode) -> &mut Account {
        self.accounts.entry(code).or_default()
    }

    pub fn insert_account(&mut self, code: AccountCode, account: Account) -> Option<Account> {
        for (center, _) in account.amounts() {
            self.cost_centers.insert(center.to_string());
        }
        self.accounts.insert(code, account)
    }

    pub(crate) fn remove_account(&mut self, code: &AccountCode) -> Option<Account> {
        self.accounts.remove(code)
    }

    /// Every cost center seen, sorted.
    pub fn cost_centers(&self) -> &BTreeSet<String> {
        &self.cost_centers
    }

    pub fn register_cost_center(&mut self, center: &str) {
        if !self.cost_centers.contains(center) {
            self.cost_centers.insert(center.to_string());
        }
    }

    /// Per cost-center sum across all accounts.
    pub fn cost_center_totals(&self) -> BTreeMap<String, f64> {
        let mut totals: BTreeMap<String, f64> = self
            .cost_centers
            .iter()
            .map(|center| (center.clone(), 0.0))
            .collect();
        for account in self.accounts.values() {
            for (center, value) in account.amounts() {
                *totals.entry(center.to_string()).or_insert(0.0) += value;
            }
        }
        totals
    }
}

/// Options controlling how export rows are read.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    pub layout: ColumnLayout,
    pub default_cost_center: String,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            default_cost_center: DEFAULT_COST_CENTER.to_string(),
        }
    }
}

/// Streaming parse state: rows must be pushed in file order since detail
/// rows without an account code book onto the last account seen.
#[derive(Debug)]
pub struct Aggregator {
    year: String,
    options: AggregateOptions,
    ledger: Ledger,
    current: Option<AccountCode>,
    rows_read: usize,
    rows_booked: usize,
}

impl Aggregator {
    pub fn new(year: impl Into<String>, options: AggregateOptions) -> Self {
        Self {
            year: year.into(),
            options,
            ledger: Ledger::new(),
            current: None,
            rows_read: 0,
            rows_booked: 0,
        }
    }

    /// Reads the next line of the export.
    pub fn push_line(&mut self, line: &str) -> Result<()> {
        self.rows_read += 1;
        let index = self.rows_read;
        let row = LedgerRow::split(line, self.options.layout);

        // An account row starts the record over, even for a code seen before.
        if let Some(code) = row.account_code().and_then(AccountCode::parse) {
            *self.ledger.account_entry(code.clone()) = Account::new(row.name());
            self.current = Some(code);
        }

        if !row.is_in_year(&self.year) {
            trace!(row = index, "skipping row outside target year");
            return Ok(());
        }

        let Some(code) = self.current.clone() else {
            return Err(HuvudbokError::row_parse(
                index,
                line,
                "transaction row before any account",
            ));
        };

        let center = match row.cost_center() {
            Some("") => self.options.default_cost_center.as_str(),
            Some(center) => center,
            None => {
                return Err(HuvudbokError::row_parse(
                    index,
                    line,
                    "missing cost center column",
                ))
            }
        };
        let debit = amount_cell(index, line, "debit", row.debit())?;
        let credit = amount_cell(index, line, "credit", row.credit())?;

        self.ledger.register_cost_center(center);
        self.ledger.account_entry(code).add(center, credit - debit);
        self.rows_booked += 1;
        Ok(())
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn finish(self) -> Ledger {
        info!(
            rows = self.rows_read,
            booked = self.rows_booked,
            accounts = self.ledger.account_count(),
            cost_centers = self.ledger.cost_centers().len(),
            year = %self.year,
            "aggregated huvudbok"
        );
        self.ledger
    }
}

fn amount_cell(index: usize, line: &str, label: &str, cell: Option<&str>) -> Result<f64> {
    let cell = cell.ok_or_else(|| {
        HuvudbokError::row_parse(index, line, format!("missing {label} column"))
    })?;
    parse_amount(cell).ok_or_else(|| {
        HuvudbokError::row_parse(index, line, format!("invalid {label} amount `{cell}`"))
    })
}

/// Aggregates every line of an export for `year`.
///
/// Stops at the first malformed row; a partial ledger is never returned.
pub fn aggregate<'a, I>(lines: I, year: &str, options: &AggregateOptions) -> Result<Ledger>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregator = Aggregator::new(year, options.clone());
    for line in lines {
        aggregator.push_line(line)?;
    }
    Ok(aggregator.finish())
}
