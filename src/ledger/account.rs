use std::{cmp::Ordering, collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// A ledger account code such as `3010`.
///
/// Codes sort by numeric value; equal values fall back to the text so that
/// `"0100"` and `"100"` stay distinct accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountCode {
    text: String,
    value: i64,
}

impl AccountCode {
    /// Parses a code, returning `None` unless it is an integer.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let value = text.parse().ok()?;
        Some(Self {
            text: text.to_string(),
            value,
        })
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Ord for AccountCode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .cmp(&other.value)
            .then_with(|| self.text.cmp(&other.text))
    }
}

impl PartialOrd for AccountCode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AccountCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl TryFrom<String> for AccountCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("`{value}` is not a numeric account code"))
    }
}

impl From<AccountCode> for String {
    fn from(code: AccountCode) -> Self {
        code.text
    }
}

/// Accumulated amounts for one account, keyed by cost center.
///
/// Amounts are signed as credit minus debit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Account {
    pub name: String,
    amounts: BTreeMap<String, f64>,
}

impl Account {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amounts: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, cost_center: &str, amount: f64) {
        *self.amounts.entry(cost_center.to_string()).or_insert(0.0) += amount;
    }

    /// Amount booked on `cost_center`, zero when nothing was booked.
    pub fn amount(&self, cost_center: &str) -> f64 {
        self.amounts.get(cost_center).copied().unwrap_or(0.0)
    }

    pub fn amounts(&self) -> impl Iterator<Item = (&str, f64)> {
        self.amounts.iter().map(|(center, value)| (center.as_str(), *value))
    }

    pub fn total(&self) -> f64 {
        self.amounts.values().sum()
    }

    /// True when every cost-center amount is exactly zero.
    pub fn is_empty(&self) -> bool {
        self.amounts.values().all(|value| *value == 0.0)
    }

    /// Adds every amount of `other` into this account.
    pub fn absorb(&mut self, other: &Account) {
        for (center, value) in other.amounts() {
            self.add(center, value);
        }
    }
}
