//! Rule-based franchise recommendations: narrows a franchise catalog to a
//! ranked short-list from a handful of user preferences.

pub mod analyzer;
pub mod error;
pub mod focus;
pub mod format;
pub mod loader;
pub mod models;

pub use analyzer::{FranchiseMatcher, MatchOutcome, MatchResult, MatchStatus, RESULT_LIMIT};
pub use error::{FitError, Result};
pub use focus::FocusIndex;
pub use format::{format_money, DisplayFields, CONTACT_FALLBACK};
pub use models::{Catalog, CatalogRow, Config, PreferenceForm, Preferences};
