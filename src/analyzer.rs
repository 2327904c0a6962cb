use crate::error::Result;
use crate::focus::FocusIndex;
use crate::models::{
    Catalog, CatalogRow, CustomerType, PreferenceForm, Preferences, TimeCommitment,
};
use log::{debug, info, trace};
use std::cmp::Ordering;

/// Most results returned for one submission.
pub const RESULT_LIMIT: usize = 10;

/// A catalog row that passed the focus stage, with how many selected
/// focus categories it satisfies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult<'a> {
    pub row: &'a CatalogRow,
    pub match_score: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    /// Every filter was applied.
    Strict,
    /// The hard filters removed everything; results only honour the focus.
    RelaxedFallback,
    /// No catalog row satisfies any selected focus category.
    NoFocusMatch,
    /// Nothing to display even after relaxing.
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome<'a> {
    pub status: MatchStatus,
    pub results: Vec<MatchResult<'a>>,
}

impl<'a> MatchOutcome<'a> {
    fn halted(status: MatchStatus) -> Self {
        Self {
            status,
            results: Vec::new(),
        }
    }
}

pub struct FranchiseMatcher<'a> {
    catalog: &'a Catalog,
    focus_index: &'a FocusIndex,
    result_limit: usize,
}

impl<'a> FranchiseMatcher<'a> {
    pub fn new(catalog: &'a Catalog, focus_index: &'a FocusIndex) -> Self {
        Self {
            catalog,
            focus_index,
            result_limit: RESULT_LIMIT,
        }
    }

    pub fn with_result_limit(mut self, result_limit: usize) -> Self {
        self.result_limit = result_limit;
        self
    }

    /// Runs the full pipeline: focus scoring, hard filters, ranking, the
    /// relaxed fallback and the result cap. Each stage returns a new list;
    /// the catalog is never touched.
    pub fn find_matches(&self, preferences: &Preferences) -> MatchOutcome<'a> {
        // Step 1: Score every row against the selected focus categories
        let focus_matches = self.score_focus(&preferences.focus);
        debug!(
            "Focus stage kept {} of {} catalog rows",
            focus_matches.len(),
            self.catalog.len()
        );
        if focus_matches.is_empty() {
            return MatchOutcome::halted(MatchStatus::NoFocusMatch);
        }

        // Steps 2-5: Hard filters
        let candidates = filter_by_capital(focus_matches.clone(), preferences.capital_ceiling());
        debug!("Capital stage kept {} rows", candidates.len());

        let candidates = filter_by_time_commitment(candidates, preferences.time_commitment);
        debug!("Time-commitment stage kept {} rows", candidates.len());

        let candidates = filter_by_industry_interest(candidates, &preferences.industry_interests);
        debug!("Industry-interest stage kept {} rows", candidates.len());

        let candidates = filter_by_customer_type(candidates, preferences.customer_type);
        debug!("Customer-type stage kept {} rows", candidates.len());

        // Step 6: Rank
        let strict = rank(candidates);

        // Step 7: Fall back to the focus-matched set
        let (status, ranked) = if strict.is_empty() {
            info!(
                "No franchise met every filter; falling back to {} focus matches",
                focus_matches.len()
            );
            (MatchStatus::RelaxedFallback, rank(focus_matches))
        } else {
            (MatchStatus::Strict, strict)
        };

        // Step 8: Cap
        let results: Vec<MatchResult<'a>> = ranked.into_iter().take(self.result_limit).collect();
        if results.is_empty() {
            return MatchOutcome::halted(MatchStatus::Empty);
        }

        MatchOutcome { status, results }
    }

    /// Validates a raw form and runs the pipeline on it.
    pub fn match_form(&self, form: &PreferenceForm) -> Result<MatchOutcome<'a>> {
        let preferences = Preferences::from_form(form, self.focus_index)?;
        Ok(self.find_matches(&preferences))
    }

    /// Keeps rows satisfying at least one selected focus category.
    fn score_focus(&self, focus: &[String]) -> Vec<MatchResult<'a>> {
        self.catalog
            .rows()
            .iter()
            .filter_map(|row| {
                let tokens = row.industry_tokens();
                let match_score = focus
                    .iter()
                    .filter(|label| self.focus_index.is_satisfied_by(label.as_str(), &tokens))
                    .count();

                (match_score > 0).then_some(MatchResult { row, match_score })
            })
            .collect()
    }
}

/// Drops rows whose cash requirement is above the ceiling or unreadable.
pub fn filter_by_capital(candidates: Vec<MatchResult<'_>>, ceiling: f64) -> Vec<MatchResult<'_>> {
    candidates
        .into_iter()
        .filter(|candidate| match candidate.row.cash_required_low() {
            Some(low) => low <= ceiling,
            None => {
                trace!(
                    "Excluding '{}': unreadable cash requirement {:?}",
                    candidate.row.name,
                    candidate.row.cash_required
                );
                false
            }
        })
        .collect()
}

pub fn filter_by_time_commitment(
    candidates: Vec<MatchResult<'_>>,
    time_commitment: TimeCommitment,
) -> Vec<MatchResult<'_>> {
    match time_commitment {
        TimeCommitment::FullTime => candidates,
        TimeCommitment::SemiAbsentee => candidates
            .into_iter()
            .filter(|c| c.row.semi_absentee.permits())
            .collect(),
        TimeCommitment::Passive => candidates
            .into_iter()
            .filter(|c| c.row.passive.permits())
            .collect(),
    }
}

/// Case-sensitive substring test on the raw industry field.
pub fn filter_by_industry_interest<'a>(
    candidates: Vec<MatchResult<'a>>,
    interests: &[String],
) -> Vec<MatchResult<'a>> {
    if interests.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|c| interests.iter().any(|tag| c.row.industry.contains(tag.as_str())))
        .collect()
}

pub fn filter_by_customer_type(
    candidates: Vec<MatchResult<'_>>,
    customer_type: CustomerType,
) -> Vec<MatchResult<'_>> {
    match customer_type {
        CustomerType::Either => candidates,
        CustomerType::Business => candidates
            .into_iter()
            .filter(|c| c.row.b2b.permits())
            .collect(),
        CustomerType::Consumer => candidates
            .into_iter()
            .filter(|c| c.row.b2c.permits())
            .collect(),
    }
}

/// Stable sort by match score descending, then industry ranking ascending.
/// Rows without a ranking sort after every ranked row.
pub fn rank(mut candidates: Vec<MatchResult<'_>>) -> Vec<MatchResult<'_>> {
    candidates.sort_by(|a, b| {
        b.match_score
            .cmp(&a.match_score)
            .then_with(|| compare_ranking(a.row.industry_ranking, b.row.industry_ranking))
    });
    candidates
}

fn compare_ranking(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flag;

    fn row(name: &str, industry: &str, cash: &str, ranking: f64) -> CatalogRow {
        let mut row = CatalogRow::new(name, industry);
        row.cash_required = Some(cash.to_string());
        row.industry_ranking = Some(ranking);
        row
    }

    fn scored(row: &CatalogRow, match_score: usize) -> MatchResult<'_> {
        MatchResult { row, match_score }
    }

    #[test]
    fn capital_filter_drops_expensive_and_unparseable_rows() {
        let cheap = row("Cheap", "retail", "$40,000", 1.0);
        let pricey = row("Pricey", "retail", "$60,000 - $80,000", 2.0);
        let unknown = row("Unknown", "retail", "varies", 3.0);
        let kept = filter_by_capital(
            vec![scored(&cheap, 1), scored(&pricey, 1), scored(&unknown, 1)],
            50_000.0,
        );
        let names: Vec<&str> = kept.iter().map(|c| c.row.name.as_str()).collect();
        assert_eq!(names, vec!["Cheap"]);
    }

    #[test]
    fn capital_ceiling_is_inclusive() {
        let exact = row("Exact", "retail", "50,000", 1.0);
        assert_eq!(filter_by_capital(vec![scored(&exact, 1)], 50_000.0).len(), 1);
    }

    #[test]
    fn time_filter_honours_flags_and_skips_absent_columns() {
        let mut yes = row("Yes", "retail", "1", 1.0);
        yes.passive = Flag::Yes;
        let mut no = row("No", "retail", "1", 1.0);
        no.passive = Flag::No;
        let absent = row("Absent", "retail", "1", 1.0);

        let kept = filter_by_time_commitment(
            vec![scored(&yes, 1), scored(&no, 1), scored(&absent, 1)],
            TimeCommitment::Passive,
        );
        assert_eq!(kept.len(), 2);

        let kept = filter_by_time_commitment(vec![scored(&no, 1)], TimeCommitment::FullTime);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn industry_interest_is_case_sensitive_on_raw_field() {
        let pets = row("Pets", "Pet Grooming, Retail", "1", 1.0);
        assert_eq!(
            filter_by_industry_interest(vec![scored(&pets, 1)], &["Retail".to_string()]).len(),
            1
        );
        assert!(
            filter_by_industry_interest(vec![scored(&pets, 1)], &["retail".to_string()]).is_empty()
        );
        assert_eq!(filter_by_industry_interest(vec![scored(&pets, 1)], &[]).len(), 1);
    }

    #[test]
    fn customer_filter_uses_the_matching_flag() {
        let mut b2b = row("B2B", "retail", "1", 1.0);
        b2b.b2b = Flag::Yes;
        b2b.b2c = Flag::No;
        let kept = filter_by_customer_type(vec![scored(&b2b, 1)], CustomerType::Consumer);
        assert!(kept.is_empty());
        let kept = filter_by_customer_type(vec![scored(&b2b, 1)], CustomerType::Business);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn rank_orders_by_score_then_ranking_and_is_stable() {
        let a = row("A", "retail", "1", 5.0);
        let b = row("B", "retail", "1", 2.0);
        let c = row("C", "retail", "1", 2.0);
        let mut d = row("D", "retail", "1", 0.0);
        d.industry_ranking = None;
        let e = row("E", "retail", "1", 9.0);

        let ranked = rank(vec![
            scored(&a, 1),
            scored(&d, 1),
            scored(&b, 1),
            scored(&c, 1),
            scored(&e, 2),
        ]);
        let names: Vec<&str> = ranked.iter().map(|c| c.row.name.as_str()).collect();
        assert_eq!(names, vec!["E", "B", "C", "A", "D"]);
    }
}
