use crate::error::{FitError, Result};
use crate::focus::FocusIndex;
use crate::loader::Table;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Placeholder left in a dropdown the user never touched.
pub const PLEASE_SELECT: &str = "Please select";

/// Most focus categories a single submission may pick.
pub const MAX_FOCUS_SELECTIONS: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub catalog_file: String,
    pub mapping_file: String,
    pub result_limit: Option<usize>,
    pub output_directory: Option<String>,
    pub preferences: PreferenceForm,
}

/// Raw selections as they come off the form, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceForm {
    #[serde(default)]
    pub focus: Vec<String>,
    pub liquid_capital: String,
    #[serde(default)]
    pub finance: bool,
    pub hands_on_time: String,
    #[serde(default)]
    pub industry_interests: Vec<String>,
    pub customer_type: String,
}

impl Default for PreferenceForm {
    fn default() -> Self {
        Self {
            focus: Vec::new(),
            liquid_capital: PLEASE_SELECT.to_string(),
            finance: false,
            hands_on_time: PLEASE_SELECT.to_string(),
            industry_interests: Vec::new(),
            customer_type: PLEASE_SELECT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: "ifpg_dataset.xlsx".to_string(),
            mapping_file: "industry to business type.xlsx".to_string(),
            result_limit: None,
            output_directory: None,
            preferences: PreferenceForm::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CapitalBracket {
    Under50k,
    From50kTo99k,
    From100kTo249k,
    Over250k,
}

impl CapitalBracket {
    /// Cash ceiling for the bracket. The top bracket is open-ended and uses
    /// a nominal 1,000,000.
    pub fn ceiling(self) -> f64 {
        match self {
            CapitalBracket::Under50k => 50_000.0,
            CapitalBracket::From50kTo99k => 99_000.0,
            CapitalBracket::From100kTo249k => 249_000.0,
            CapitalBracket::Over250k => 1_000_000.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CapitalBracket::Under50k => "Under $50k",
            CapitalBracket::From50kTo99k => "$50k-$99k",
            CapitalBracket::From100kTo249k => "$100k-$249k",
            CapitalBracket::Over250k => "$250k+",
        }
    }
}

impl FromStr for CapitalBracket {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "under $50k" => Ok(CapitalBracket::Under50k),
            "$50k-$99k" => Ok(CapitalBracket::From50kTo99k),
            "$100k-$249k" => Ok(CapitalBracket::From100kTo249k),
            "$250k+" => Ok(CapitalBracket::Over250k),
            _ => Err(unselected_or_unknown("liquid capital", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeCommitment {
    FullTime,
    SemiAbsentee,
    Passive,
}

impl FromStr for TimeCommitment {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "full-time owner-operator" | "full-time" | "full time" => Ok(TimeCommitment::FullTime),
            "5-20 hrs/week (semi-absentee)" | "semi-absentee" => Ok(TimeCommitment::SemiAbsentee),
            "<5 hrs/week (passive)" | "passive" => Ok(TimeCommitment::Passive),
            _ => Err(unselected_or_unknown("hands-on time", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerType {
    Business,
    Consumer,
    Either,
}

impl FromStr for CustomerType {
    type Err = FitError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "businesses (b2b)" | "b2b" => Ok(CustomerType::Business),
            "consumers (b2c)" | "b2c" => Ok(CustomerType::Consumer),
            "both" | "either" | "either/both" => Ok(CustomerType::Either),
            _ => Err(unselected_or_unknown("customer type", s)),
        }
    }
}

fn unselected_or_unknown(field: &str, value: &str) -> FitError {
    if value.trim().is_empty() || value.trim().eq_ignore_ascii_case(PLEASE_SELECT) {
        FitError::Validation(format!("please complete the {} selection", field))
    } else {
        FitError::Validation(format!("unknown {} option: '{}'", field, value))
    }
}

/// One validated submission. Focus labels are stored normalized (trimmed, lowercase).
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub focus: Vec<String>,
    pub capital: CapitalBracket,
    pub finance: bool,
    pub time_commitment: TimeCommitment,
    pub industry_interests: Vec<String>,
    pub customer_type: CustomerType,
}

impl Preferences {
    /// Validates a raw form against the focus labels the index offers.
    pub fn from_form(form: &PreferenceForm, focus_index: &FocusIndex) -> Result<Self> {
        let mut focus: Vec<String> = Vec::with_capacity(form.focus.len());
        for label in form.focus.iter().map(|label| label.trim().to_lowercase()) {
            if !label.is_empty() && !focus.contains(&label) {
                focus.push(label);
            }
        }

        if focus.is_empty() {
            return Err(FitError::Validation(
                "please pick at least one business focus".to_string(),
            ));
        }
        if focus.len() > MAX_FOCUS_SELECTIONS {
            return Err(FitError::Validation(format!(
                "pick at most {} business focus categories (got {})",
                MAX_FOCUS_SELECTIONS,
                focus.len()
            )));
        }
        if let Some(unknown) = focus.iter().find(|label| !focus_index.contains(label.as_str())) {
            return Err(FitError::Validation(format!(
                "'{}' is not an available business focus",
                unknown
            )));
        }

        Ok(Self {
            focus,
            capital: form.liquid_capital.parse()?,
            finance: form.finance,
            time_commitment: form.hands_on_time.parse()?,
            industry_interests: form
                .industry_interests
                .iter()
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect(),
            customer_type: form.customer_type.parse()?,
        })
    }

    /// Capital ceiling, doubled when the user will finance beyond cash on hand.
    pub fn capital_ceiling(&self) -> f64 {
        let multiplier = if self.finance { 2.0 } else { 1.0 };
        self.capital.ceiling() * multiplier
    }
}

/// A yes/no catalog column. `Absent` means the column is not in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
    Absent,
}

impl Flag {
    pub fn from_cell(cell: Option<&str>) -> Self {
        match cell {
            None => Flag::Absent,
            Some(value) if value.trim().eq_ignore_ascii_case("yes") => Flag::Yes,
            Some(_) => Flag::No,
        }
    }

    /// Whether a filter on this flag lets the row through.
    pub fn permits(self) -> bool {
        !matches!(self, Flag::No)
    }

    pub fn as_display(self) -> Option<&'static str> {
        match self {
            Flag::Yes => Some("Yes"),
            Flag::No => Some("No"),
            Flag::Absent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRow {
    pub name: String,
    pub industry: String,
    pub cash_required: Option<String>,
    pub franchise_fee: Option<String>,
    pub semi_absentee: Flag,
    pub passive: Flag,
    pub home_based: Flag,
    pub b2b: Flag,
    pub b2c: Flag,
    pub veteran_discount: Option<String>,
    pub industry_ranking: Option<f64>,
    pub units_open: Option<String>,
    pub support: Option<String>,
    pub url: Option<String>,
    pub business_summary: Option<String>,
}

impl CatalogRow {
    /// A row with only the required fields set; every flag column absent.
    ///
    /// `Flag::Absent` stands for a column missing from the whole catalog, so
    /// when rows are built by hand a flag must be set for every row or for
    /// none. A column mixing `Absent` and `No` lets the `Absent` rows through
    /// its filter.
    pub fn new(name: &str, industry: &str) -> Self {
        Self {
            name: name.to_string(),
            industry: industry.to_string(),
            cash_required: None,
            franchise_fee: None,
            semi_absentee: Flag::Absent,
            passive: Flag::Absent,
            home_based: Flag::Absent,
            b2b: Flag::Absent,
            b2c: Flag::Absent,
            veteran_discount: None,
            industry_ranking: None,
            units_open: None,
            support: None,
            url: None,
            business_summary: None,
        }
    }

    /// Trimmed, lowercased comma-separated industry tokens.
    pub fn industry_tokens(&self) -> Vec<String> {
        self.industry
            .split(',')
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Low end of the cash requirement: the first run of digits, thousands
    /// separators allowed. `None` when the field has no number in it.
    pub fn cash_required_low(&self) -> Option<f64> {
        lazy_static::lazy_static! {
            static ref LEADING_AMOUNT_RE: Regex = Regex::new(r"\d[\d,]*").unwrap();
        }

        let raw = self.cash_required.as_deref()?;
        LEADING_AMOUNT_RE
            .find(raw)
            .and_then(|m| m.as_str().replace(',', "").parse::<f64>().ok())
    }
}

/// The loaded catalog. Rows are read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rows: Vec<CatalogRow>,
}

impl Catalog {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }

    /// Resolves every column once and builds typed rows. `franchise name`
    /// and `industry` are required; every other column is optional.
    pub fn from_table(table: &Table) -> Result<Self> {
        let required = |name: &str| {
            table.column_index(name).ok_or_else(|| {
                FitError::Config(format!("catalog is missing the '{}' column", name))
            })
        };
        let name_col = required("franchise name")?;
        let industry_col = required("industry")?;

        let cash_col = table.column_index("cash required");
        let fee_col = table.column_with_prefix("franchise fee");
        let semi_col = table.column_index("semi-absentee ownership");
        let passive_col = table.column_index("passive franchise");
        let home_col = table.column_index("home based franchise");
        let b2b_col = table.column_index("b2b");
        let b2c_col = table.column_index("b2c");
        let veteran_col = table.column_index("veteran discount");
        let ranking_col = table.column_index("industry_ranking");
        let units_col = table.column_index("number of units open");
        let support_col = table.column_index("support");
        let url_col = table.column_index("url");
        let summary_col = table.column_index("business summary");

        let rows = table
            .rows
            .iter()
            .map(|cells| {
                let text = |col: Option<usize>| {
                    col.map(|i| cells[i].trim())
                        .filter(|value| !value.is_empty())
                        .map(str::to_string)
                };
                let flag = |col: Option<usize>| Flag::from_cell(col.map(|i| cells[i].as_str()));

                CatalogRow {
                    name: cells[name_col].trim().to_string(),
                    industry: cells[industry_col].clone(),
                    cash_required: text(cash_col),
                    franchise_fee: text(fee_col),
                    semi_absentee: flag(semi_col),
                    passive: flag(passive_col),
                    home_based: flag(home_col),
                    b2b: flag(b2b_col),
                    b2c: flag(b2c_col),
                    veteran_discount: text(veteran_col),
                    industry_ranking: text(ranking_col).and_then(|v| v.parse::<f64>().ok()),
                    units_open: text(units_col),
                    support: text(support_col),
                    url: text(url_col),
                    business_summary: text(summary_col),
                }
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted, de-duplicated industry tags offered for the interest filter.
    pub fn industry_tags(&self) -> Vec<String> {
        self.rows
            .iter()
            .flat_map(|row| row.industry.split(','))
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
