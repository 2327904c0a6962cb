//! Business-focus index: coarse focus categories mapped to the industry
//! substrings they stand for.

use crate::error::{FitError, Result};
use crate::loader::Table;
use log::debug;
use std::collections::BTreeMap;

/// The only focus categories ever offered, normalized.
pub const FOCUS_CATEGORIES: [&str; 5] = [
    "professional services",
    "retail",
    "green & eco friendly",
    "health",
    "home and family",
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusIndex {
    industries_by_focus: BTreeMap<String, Vec<String>>,
}

impl FocusIndex {
    /// Builds the index from a `business_type` / `industry` mapping table.
    pub fn build(table: &Table) -> Result<Self> {
        let type_col = table.column_index("business_type");
        let industry_col = table.column_index("industry");

        let (type_col, industry_col) = match (type_col, industry_col) {
            (Some(t), Some(i)) => (t, i),
            _ => {
                return Err(FitError::Config(
                    "mapping table must have columns 'business_type' and 'industry'".to_string(),
                ))
            }
        };

        let index = Self::from_pairs(
            table
                .rows
                .iter()
                .map(|row| (row[type_col].as_str(), row[industry_col].as_str())),
        );

        debug!(
            "Focus index built with {} categories from {} mapping rows",
            index.industries_by_focus.len(),
            table.len()
        );
        Ok(index)
    }

    /// Groups `(business_type, industry)` pairs, keeping source order and
    /// dropping anything outside [`FOCUS_CATEGORIES`] or with a blank industry.
    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut industries_by_focus: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (business_type, industry) in pairs {
            let label = normalize(business_type.as_ref());
            if !FOCUS_CATEGORIES.contains(&label.as_str()) {
                continue;
            }
            let industry = industry.as_ref().trim();
            if industry.is_empty() {
                continue;
            }
            industries_by_focus
                .entry(label)
                .or_default()
                .push(industry.to_string());
        }

        Self { industries_by_focus }
    }

    /// Focus options to present, sorted.
    pub fn labels(&self) -> Vec<&str> {
        self.industries_by_focus.keys().map(String::as_str).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.industries_by_focus.contains_key(&normalize(label))
    }

    pub fn industries(&self, label: &str) -> Option<&[String]> {
        self.industries_by_focus
            .get(&normalize(label))
            .map(Vec::as_slice)
    }

    /// True when any mapped industry for `label` is a case-insensitive
    /// substring of any of the row's normalized industry tokens.
    pub fn is_satisfied_by(&self, label: &str, industry_tokens: &[String]) -> bool {
        let Some(industries) = self.industries(label) else {
            return false;
        };

        industries.iter().any(|industry| {
            let needle = industry.to_lowercase();
            industry_tokens.iter().any(|token| token.contains(&needle))
        })
    }

    pub fn len(&self) -> usize {
        self.industries_by_focus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.industries_by_focus.is_empty()
    }
}

fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}
