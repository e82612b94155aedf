use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{account::AccountCode, aggregate::Ledger};
use crate::errors::{HuvudbokError, Result};

/// Corrections that fold deprecated accounts into their replacements.
///
/// A code is never both a source and a target, so the order in which pairs
/// are applied cannot change the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeTable {
    pairs: BTreeMap<AccountCode, AccountCode>,
}

impl MergeTable {
    pub fn new<I, S, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut parsed = BTreeMap::new();
        for (old, new) in pairs {
            let old = parse_code(old.as_ref())?;
            let new = parse_code(new.as_ref())?;
            if old == new {
                return Err(HuvudbokError::InvalidMergeTable(format!(
                    "account {old} is merged into itself"
                )));
            }
            if parsed.insert(old.clone(), new).is_some() {
                return Err(HuvudbokError::InvalidMergeTable(format!(
                    "account {old} is merged more than once"
                )));
            }
        }

        let targets: BTreeSet<&AccountCode> = parsed.values().collect();
        if let Some(chained) = parsed.keys().find(|old| targets.contains(old)) {
            return Err(HuvudbokError::InvalidMergeTable(format!(
                "account {chained} is both merged away and a merge target"
            )));
        }

        Ok(Self { pairs: parsed })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&AccountCode, &AccountCode)> {
        self.pairs.iter()
    }
}

fn parse_code(code: &str) -> Result<AccountCode> {
    AccountCode::parse(code).ok_or_else(|| {
        HuvudbokError::InvalidMergeTable(format!("`{code}` is not a numeric account code"))
    })
}

impl Ledger {
    /// Folds every source account of `table` into its target.
    ///
    /// A target without a record takes over the source record unchanged.
    /// Otherwise the amounts are added and the target keeps its own name,
    /// adopting the source name only when it had none.
    pub fn apply_merges(&mut self, table: &MergeTable) {
        for (old, new) in table.pairs() {
            let Some(source) = self.remove_account(old) else {
                debug!(from = %old, to = %new, "merge source not in ledger");
                continue;
            };

            let target = self.account_entry(new.clone());
            target.absorb(&source);
            if target.name.is_empty() {
                target.name = source.name;
            }
            debug!(from = %old, to = %new, "merged account");
        }
    }
}
