//! Reading a huvudbok export into per account, per cost-center sums.

pub mod account;
pub mod aggregate;
pub mod amount;
pub mod merge;
pub mod row;

pub use account::{Account, AccountCode};
pub use aggregate::{aggregate, AggregateOptions, Aggregator, Ledger, DEFAULT_COST_CENTER};
pub use amount::{format_amount, parse_amount};
pub use merge::MergeTable;
pub use row::{ColumnLayout, LedgerRow};
