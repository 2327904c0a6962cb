use crate::analyzer::MatchResult;

/// Shown wherever a value is missing or cannot be formatted.
pub const CONTACT_FALLBACK: &str = "contact us for details";

const RANGE_SEPARATORS: [char; 3] = ['-', '\u{2013}', '\u{2014}'];

/// Formats a free-text money field as `$50,000`, or a range as
/// `$50,000 — $75,000`. Blank, non-numeric or zero values fall back to
/// [`CONTACT_FALLBACK`], and so does a range if either side fails.
pub fn format_money(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return CONTACT_FALLBACK.to_string();
    };

    if let Some((low, high)) = raw.split_once(&RANGE_SEPARATORS[..]) {
        return match (format_single_amount(low), format_single_amount(high)) {
            (Some(low), Some(high)) => format!("{} \u{2014} {}", low, high),
            _ => CONTACT_FALLBACK.to_string(),
        };
    }

    format_single_amount(raw).unwrap_or_else(|| CONTACT_FALLBACK.to_string())
}

fn format_single_amount(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value = digits.parse::<f64>().ok()?;
    if value == 0.0 || !value.is_finite() || value.round() >= u64::MAX as f64 {
        return None;
    }
    Some(format!("${}", group_thousands(value.round() as u64)))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Display-ready fields for one result card.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    pub name: String,
    pub url: String,
    pub industry: String,
    pub description: String,
    pub startup_cost: String,
    pub franchise_fee: String,
    pub veteran_discount: String,
    pub industry_ranking: String,
    pub units_open: String,
    pub support: String,
    pub home_based: String,
}

impl DisplayFields {
    pub fn from_result(result: &MatchResult<'_>) -> Self {
        let row = result.row;
        let text = |value: &Option<String>| {
            value
                .clone()
                .unwrap_or_else(|| CONTACT_FALLBACK.to_string())
        };

        let industry = if row.industry.trim().is_empty() {
            CONTACT_FALLBACK.to_string()
        } else {
            row.industry.trim().to_string()
        };

        Self {
            name: row.name.clone(),
            url: text(&row.url),
            industry,
            description: text(&row.business_summary),
            startup_cost: format_money(row.cash_required.as_deref()),
            franchise_fee: format_money(row.franchise_fee.as_deref()),
            veteran_discount: text(&row.veteran_discount),
            industry_ranking: row
                .industry_ranking
                .map(|rank| rank.to_string())
                .unwrap_or_else(|| CONTACT_FALLBACK.to_string()),
            units_open: text(&row.units_open),
            support: text(&row.support),
            home_based: row
                .home_based
                .as_display()
                .unwrap_or(CONTACT_FALLBACK)
                .to_string(),
        }
    }

    pub fn has_url(&self) -> bool {
        self.url != CONTACT_FALLBACK
    }

    /// Plain-text result card.
    pub fn render_card(&self) -> String {
        let heading = if self.has_url() {
            format!("{} <{}>", self.name, self.url)
        } else {
            self.name.clone()
        };

        format!(
            "### {}\n\
            Industry: {}\n\
            Description: {}\n\
            Startup Cost: {}\n\
            Franchise Fee: {}\n\
            Veteran Discount: {}\n\
            Industry Ranking: {}\n\
            Number of Units Open: {}\n\
            Support: {}\n",
            heading,
            self.industry,
            self.description,
            self.startup_cost,
            self.franchise_fee,
            self.veteran_discount,
            self.industry_ranking,
            self.units_open,
            self.support
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogRow;

    #[test]
    fn single_amounts_get_dollar_sign_and_separators() {
        assert_eq!(format_money(Some("50000")), "$50,000");
        assert_eq!(format_money(Some("$1,250,000")), "$1,250,000");
        assert_eq!(format_money(Some("999")), "$999");
        assert_eq!(format_money(Some("$ 12,499.60")), "$12,500");
    }

    #[test]
    fn zero_missing_and_text_fall_back() {
        assert_eq!(format_money(Some("0")), CONTACT_FALLBACK);
        assert_eq!(format_money(None), CONTACT_FALLBACK);
        assert_eq!(format_money(Some("Call us")), CONTACT_FALLBACK);
        assert_eq!(format_money(Some("")), CONTACT_FALLBACK);
        assert_eq!(format_money(Some(&"9".repeat(25))), CONTACT_FALLBACK);
    }

    #[test]
    fn ranges_are_joined_with_a_dash() {
        assert_eq!(format_money(Some("50000-75000")), "$50,000 \u{2014} $75,000");
        assert_eq!(
            format_money(Some("$40,000 \u{2013} $60,000")),
            "$40,000 \u{2014} $60,000"
        );
        assert_eq!(format_money(Some("$40,000 - TBD")), CONTACT_FALLBACK);
    }

    #[test]
    fn missing_display_fields_use_the_fallback() {
        let mut row = CatalogRow::new("Acme Pets", " pet grooming ");
        row.industry_ranking = Some(3.0);
        let result = MatchResult { row: &row, match_score: 1 };
        let fields = DisplayFields::from_result(&result);

        assert_eq!(fields.industry, "pet grooming");
        assert_eq!(fields.url, CONTACT_FALLBACK);
        assert_eq!(fields.startup_cost, CONTACT_FALLBACK);
        assert_eq!(fields.industry_ranking, "3");
        assert!(fields.render_card().starts_with("### Acme Pets\n"));
    }
}
