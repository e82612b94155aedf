//! Report configuration and cost-center labels, both stored as JSON.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::{HuvudbokError, Result},
    ledger::{AggregateOptions, ColumnLayout, MergeTable, DEFAULT_COST_CENTER},
    report::{Section, SectionPlan, SectionedOptions},
};

const CONFIG_DIR_NAME: &str = "huvudbok";
const CONFIG_FILE_NAME: &str = "config.json";

/// Human readable names for cost-center codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CenterNames(BTreeMap<String, String>);

impl CenterNames {
    /// Reads a flat JSON object of code to label.
    ///
    /// A missing file yields [`HuvudbokError::ConfigurationMissing`], which
    /// callers may treat as "no labels".
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HuvudbokError::ConfigurationMissing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Label for `code`, empty when unmapped.
    pub fn label(&self, code: &str) -> &str {
        self.0.get(code).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CenterNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(code, label)| (code.into(), label.into()))
                .collect(),
        )
    }
}

/// A sum line as written in the configuration file, by names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumLineConfig {
    pub name: String,
    /// Section after whose subtotal the line is written.
    pub after: String,
    /// Sections and earlier sum lines to add up.
    pub terms: Vec<String>,
}

impl SumLineConfig {
    fn new(name: &str, after: &str, terms: &[&str]) -> Self {
        Self {
            name: name.into(),
            after: after.into(),
            terms: terms.iter().map(|term| term.to_string()).collect(),
        }
    }
}

/// Everything about a run that is not a command-line argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub columns: ColumnLayout,
    pub default_cost_center: String,
    /// Label columns before the first cost-center column in the sectioned report.
    pub leading_columns: usize,
    /// Account corrections keyed by the year they apply to.
    pub merge_tables: BTreeMap<String, BTreeMap<String, String>>,
    pub sections: Vec<Section>,
    pub sum_lines: Vec<SumLineConfig>,
    /// Also write sections that follow the last reported account.
    pub flush_trailing_sections: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            default_cost_center: DEFAULT_COST_CENTER.into(),
            leading_columns: SectionedOptions::default().leading_columns,
            merge_tables: BTreeMap::from([("2018".to_string(), Self::merge_table_2018())]),
            sections: Self::default_sections(),
            sum_lines: Self::default_sum_lines(),
            flush_trailing_sections: false,
        }
    }
}

impl ReportConfig {
    /// 2018 was booked against several deprecated accounts.
    fn merge_table_2018() -> BTreeMap<String, String> {
        [
            ("3890", "3010"), // medlemsavgift privat
            ("3891", "3011"), // medlemsavgift juridisk person
            ("3869", "3018"), // donationer övriga
            ("3860", "3012"), // donationer privat
            ("3861", "3013"), // donationer juridisk person
            ("4610", "4910"), // projektkonsulter
            ("6212", "6211"), // mobiltelefon
            ("7632", "7631"), // personalrepresentation, ej avdragsgill
        ]
        .into_iter()
        .map(|(old, new)| (old.to_string(), new.to_string()))
        .collect()
    }

    fn default_sections() -> Vec<Section> {
        vec![
            Section::new("Balanskonton", 1000, 3000).hidden(),
            Section::new("Verksamhetsintäkter", 3000, 3900),
            // Försäljningsintäkter are really 3520-3740, inside the range above.
            Section::new("Försäljningsintäkter", 3900, 3900),
            Section::new("Övriga intäkter", 3900, 4000),
            Section::new("Kostnader", 4000, 5000),
            Section::new("Övriga externa kostnader", 5000, 7000),
            Section::new("Personalkostnader", 7000, 8000),
            Section::new("Finansiella intäkter", 8000, 8400),
            Section::new("Finansiella kostnader", 8400, 8500),
        ]
    }

    fn default_sum_lines() -> Vec<SumLineConfig> {
        vec![
            SumLineConfig::new(
                "Summa intäkter",
                "Övriga intäkter",
                &["Verksamhetsintäkter", "Övriga intäkter"],
            ),
            SumLineConfig::new(
                "Summa kostnader",
                "Personalkostnader",
                &["Kostnader", "Övriga externa kostnader", "Personalkostnader"],
            ),
            SumLineConfig::new(
                "Verksamhetens över-/underskott",
                "Personalkostnader",
                &["Summa intäkter", "Summa kostnader"],
            ),
            SumLineConfig::new(
                "Resultat",
                "Finansiella kostnader",
                &[
                    "Summa intäkter",
                    "Summa kostnader",
                    "Finansiella intäkter",
                    "Finansiella kostnader",
                ],
            ),
        ]
    }

    /// `<config dir>/huvudbok/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HuvudbokError::ConfigurationMissing(path.to_path_buf()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Loads `explicit`, or the per-user file if one exists, or the defaults.
    ///
    /// Unlike the per-user file, an explicit path must exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "using per-user configuration");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            layout: self.columns,
            default_cost_center: self.default_cost_center.clone(),
        }
    }

    /// The merge table for `year`; empty when the year has none.
    pub fn merge_table(&self, year: &str) -> Result<MergeTable> {
        match self.merge_tables.get(year) {
            Some(pairs) => MergeTable::new(pairs),
            None => Ok(MergeTable::default()),
        }
    }

    pub fn section_plan(&self) -> Result<SectionPlan> {
        let mut plan = SectionPlan::new(self.sections.clone())?;
        for line in &self.sum_lines {
            plan.add_sum_line(line.name.clone(), &line.after, line.terms.as_slice())?;
        }
        Ok(plan)
    }

    pub fn sectioned_options(&self) -> SectionedOptions {
        SectionedOptions {
            leading_columns: self.leading_columns,
            flush_trailing_sections: self.flush_trailing_sections,
        }
    }
}
