//! Loading catalogs and focus mappings from files on disk.

use franchise_fit::analyzer::{FranchiseMatcher, MatchStatus};
use franchise_fit::format::{DisplayFields, CONTACT_FALLBACK};
use franchise_fit::loader::TableLoader;
use franchise_fit::models::{Catalog, Flag, PreferenceForm};
use franchise_fit::{FitError, FocusIndex};
use std::path::Path;
use tempfile::tempdir;

const CATALOG_CSV: &str = "\
Franchise Name,Industry,Cash Required,Franchise Fee - One Unit,Semi-Absentee Ownership,B2B,B2C,Veteran Discount,industry_ranking,URL,Business Summary
Paws & Claws,\"Pet Grooming, Retail\",\"$40,000 - $60,000\",\"$25,000\",Yes,No,Yes,10% off,3,https://paws.example,Mobile grooming_x000D_for busy owners
Green Clean,\"Cleaning, Eco Friendly\",\"$80,000\",0,No,Yes,Yes,,1,,
Fit Hub,Fitness,call us,,Yes,No,Yes,,2,,
";

const MAPPING_CSV: &str = "\
Business_Type,Industry
Home and Family,Pet
Retail,Retail
Green & Eco Friendly,Eco
Green & Eco Friendly,Cleaning
Automotive,Car Wash
Health,Fitness
";

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

fn load_fixtures(dir: &Path) -> (Catalog, FocusIndex) {
    let loader = TableLoader::new();
    let catalog_table = loader
        .load_file(&write(dir, "catalog.csv", CATALOG_CSV))
        .unwrap();
    let mapping_table = loader
        .load_file(&write(dir, "mapping.csv", MAPPING_CSV))
        .unwrap();
    (
        Catalog::from_table(&catalog_table).unwrap(),
        FocusIndex::build(&mapping_table).unwrap(),
    )
}

#[test]
fn loads_catalog_and_focus_index_from_csv() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (catalog, focus) = load_fixtures(dir.path());

    assert_eq!(catalog.len(), 3);
    assert_eq!(
        focus.labels(),
        vec!["green & eco friendly", "health", "home and family", "retail"]
    );

    let paws = &catalog.rows()[0];
    assert_eq!(paws.semi_absentee, Flag::Yes);
    assert_eq!(paws.passive, Flag::Absent);
    assert_eq!(paws.business_summary.as_deref(), Some("Mobile grooming for busy owners"));
    assert_eq!(
        catalog.industry_tags(),
        vec!["Cleaning", "Eco Friendly", "Fitness", "Pet Grooming", "Retail"]
    );
}

#[test]
fn pipeline_over_loaded_files() {
    let dir = tempdir().expect("Failed to create temp dir");
    let (catalog, focus) = load_fixtures(dir.path());

    let form = PreferenceForm {
        focus: vec!["home and family".into(), "green & eco friendly".into()],
        liquid_capital: "$50k-$99k".into(),
        finance: false,
        hands_on_time: "Full-time owner-operator".into(),
        industry_interests: vec![],
        customer_type: "Consumers (B2C)".into(),
    };

    let outcome = FranchiseMatcher::new(&catalog, &focus)
        .match_form(&form)
        .unwrap();

    assert_eq!(outcome.status, MatchStatus::Strict);
    let names: Vec<&str> = outcome.results.iter().map(|r| r.row.name.as_str()).collect();
    assert_eq!(names, vec!["Green Clean", "Paws & Claws"]);
    assert_eq!(outcome.results[0].match_score, 1);

    let green = DisplayFields::from_result(&outcome.results[0]);
    assert_eq!(green.startup_cost, "$80,000");
    assert_eq!(green.franchise_fee, CONTACT_FALLBACK);
    assert_eq!(green.url, CONTACT_FALLBACK);

    let paws = DisplayFields::from_result(&outcome.results[1]);
    assert_eq!(paws.startup_cost, "$40,000 \u{2014} $60,000");
    assert_eq!(paws.franchise_fee, "$25,000");
    assert_eq!(paws.veteran_discount, "10% off");
}

#[test]
fn mapping_without_required_columns_is_a_config_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = write(dir.path(), "mapping.csv", "category,industry\nretail,retail\n");
    let table = TableLoader::new().load_file(&path).unwrap();

    let err = FocusIndex::build(&table).unwrap_err();
    assert!(matches!(err, FitError::Config(_)));
}

#[test]
fn missing_file_is_a_config_error() {
    let err = TableLoader::new()
        .load_file(Path::new("/nonexistent/path/catalog.csv"))
        .unwrap_err();
    assert!(matches!(err, FitError::Config(_)));
}
