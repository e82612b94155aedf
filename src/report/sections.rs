//! Section and sum-line layout of the sectioned report.
//!
//! Sections and sum lines live in two vectors and refer to each other by
//! index. A sum line may only refer to sections and sum lines that are
//! complete by the time it is written, which is checked once when the plan
//! is built so rendering never meets a dangling reference.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::{HuvudbokError, Result};

/// A half-open range `[start, end)` of account codes reported together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start: i64,
    pub end: i64,
    /// Hidden sections consume their accounts without writing anything.
    #[serde(default)]
    pub hidden: bool,
}

impl Section {
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            hidden: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn contains(&self, code: i64) -> bool {
        (self.start..self.end).contains(&code)
    }

    /// Whether every account of this section sorts before `code`.
    pub fn ends_before(&self, code: i64) -> bool {
        self.end <= code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SumLineId(pub usize);

/// Something whose subtotal row a sum line adds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SumTerm {
    Section(SectionId),
    SumLine(SumLineId),
}

/// A total over other subtotals, written right after the subtotal of the
/// section it follows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SumLine {
    pub name: String,
    pub after: SectionId,
    pub terms: Vec<SumTerm>,
}

/// Ordered sections plus the sum lines hung off them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionPlan {
    sections: Vec<Section>,
    sum_lines: Vec<SumLine>,
}

impl SectionPlan {
    /// Builds a plan, rejecting inverted, overlapping or unordered ranges.
    pub fn new(sections: Vec<Section>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for (index, section) in sections.iter().enumerate() {
            if section.start > section.end {
                return Err(HuvudbokError::SectionRange(format!(
                    "section `{}` starts at {} after its end {}",
                    section.name, section.start, section.end
                )));
            }
            if let Some(previous) = index.checked_sub(1).map(|prev| &sections[prev]) {
                if section.start < previous.end {
                    return Err(HuvudbokError::SectionRange(format!(
                        "section `{}` ({}..{}) overlaps or precedes `{}` ({}..{})",
                        section.name,
                        section.start,
                        section.end,
                        previous.name,
                        previous.start,
                        previous.end
                    )));
                }
            }
            if !names.insert(section.name.as_str()) {
                return Err(HuvudbokError::SectionRange(format!(
                    "duplicate section name `{}`",
                    section.name
                )));
            }
        }

        Ok(Self {
            sections,
            sum_lines: Vec::new(),
        })
    }

    /// Adds a sum line written after section `after`, adding up the named
    /// sections and earlier sum lines.
    pub fn add_sum_line<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        after: &str,
        terms: &[S],
    ) -> Result<SumLineId> {
        let name = name.into();
        if self.find_section(&name).is_some() || self.find_sum_line(&name).is_some() {
            return Err(HuvudbokError::SectionRange(format!(
                "duplicate sum line name `{name}`"
            )));
        }
        let host = self.find_section(after).ok_or_else(|| {
            HuvudbokError::SectionRange(format!(
                "sum line `{name}` follows unknown section `{after}`"
            ))
        })?;

        let mut resolved = Vec::with_capacity(terms.len());
        for term in terms {
            let term = term.as_ref();
            resolved.push(self.resolve_term(&name, host, term)?);
        }

        self.sum_lines.push(SumLine {
            name,
            after: host,
            terms: resolved,
        });
        Ok(SumLineId(self.sum_lines.len() - 1))
    }

    fn resolve_term(&self, name: &str, host: SectionId, term: &str) -> Result<SumTerm> {
        if let Some(id) = self.find_section(term) {
            if self.section(id).hidden {
                return Err(HuvudbokError::SectionRange(format!(
                    "sum line `{name}` refers to hidden section `{term}`"
                )));
            }
            if id > host {
                return Err(HuvudbokError::SectionRange(format!(
                    "sum line `{name}` refers to section `{term}` which closes after it"
                )));
            }
            return Ok(SumTerm::Section(id));
        }
        if let Some(id) = self.find_sum_line(term) {
            // Earlier sum lines with an earlier or equal host are already written.
            if self.sum_line(id).after > host {
                return Err(HuvudbokError::SectionRange(format!(
                    "sum line `{name}` refers to `{term}` which is written after it"
                )));
            }
            return Ok(SumTerm::SumLine(id));
        }
        Err(HuvudbokError::SectionRange(format!(
            "sum line `{name}` refers to unknown `{term}`"
        )))
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sum_lines(&self) -> &[SumLine] {
        &self.sum_lines
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.0]
    }

    pub fn sum_line(&self, id: SumLineId) -> &SumLine {
        &self.sum_lines[id.0]
    }

    pub fn find_section(&self, name: &str) -> Option<SectionId> {
        self.sections
            .iter()
            .position(|section| section.name == name)
            .map(SectionId)
    }

    pub fn find_sum_line(&self, name: &str) -> Option<SumLineId> {
        self.sum_lines
            .iter()
            .position(|line| line.name == name)
            .map(SumLineId)
    }

    /// Sum lines written after `section` closes, in definition order.
    pub fn sum_lines_after(&self, section: SectionId) -> impl Iterator<Item = SumLineId> + '_ {
        self.sum_lines
            .iter()
            .enumerate()
            .filter(move |(_, line)| line.after == section)
            .map(|(index, _)| SumLineId(index))
    }
}
