use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use franchise_fit::analyzer::{FranchiseMatcher, MatchOutcome, MatchStatus, RESULT_LIMIT};
use franchise_fit::format::DisplayFields;
use franchise_fit::loader::TableLoader;
use franchise_fit::models::{Catalog, Config, Preferences};
use franchise_fit::FocusIndex;
use log::info;
use std::fs;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let matches = Command::new("franchise-fit")
        .version("0.1")
        .about("Builds a personalized franchise short-list from your preferences")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("list-options")
                .long("list-options")
                .help("Print the available business focus and industry options, then exit")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    // Load or create configuration
    let config = if Path::new(config_file).exists() {
        println!("📋 Loading configuration from: {}", config_file);
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to read configuration: {}", config_file))?
    } else {
        println!("📝 Creating default configuration file: {}", config_file);
        Config::default().save_to_file(config_file)?;
        println!(
            "⚠️  Please edit the [preferences] section of {} and run the program again.",
            config_file
        );
        return Ok(());
    };

    // Load catalog and focus mapping once
    let loader = TableLoader::new();
    let catalog_table = loader
        .load_file(Path::new(&config.catalog_file))
        .with_context(|| format!("Failed to load catalog: {}", config.catalog_file))?;
    let catalog = Catalog::from_table(&catalog_table)?;

    let mapping_table = loader
        .load_file(Path::new(&config.mapping_file))
        .with_context(|| format!("Failed to load focus mapping: {}", config.mapping_file))?;
    let focus_index = FocusIndex::build(&mapping_table)?;

    info!(
        "Loaded {} franchises and {} business focus categories",
        catalog.len(),
        focus_index.len()
    );

    if matches.get_flag("list-options") {
        print_options(&catalog, &focus_index);
        return Ok(());
    }

    let preferences = match Preferences::from_form(&config.preferences, &focus_index) {
        Ok(preferences) => preferences,
        Err(e) => {
            println!("❌ {}", e);
            println!("   Please edit {} and run the program again.", config_file);
            return Ok(());
        }
    };

    println!("🎯 Business focus: {}", preferences.focus.join(", "));
    println!(
        "💰 Capital: {}{}",
        preferences.capital.label(),
        if preferences.finance { " (willing to finance)" } else { "" }
    );

    let matcher = FranchiseMatcher::new(&catalog, &focus_index)
        .with_result_limit(config.result_limit.unwrap_or(RESULT_LIMIT));
    let outcome = matcher.find_matches(&preferences);

    print_outcome(&outcome);

    if let Some(output_dir) = config.output_directory.as_deref() {
        if !outcome.results.is_empty() {
            fs::create_dir_all(output_dir)?;
            generate_recommendations_csv(&outcome, output_dir)?;
            println!("📂 Recommendations written to: {}/recommendations.csv", output_dir);
        }
    }

    Ok(())
}

fn print_options(catalog: &Catalog, focus_index: &FocusIndex) {
    println!("\n🏷️  Business focus options:");
    for label in focus_index.labels() {
        println!("   - {}", label);
    }

    println!("\n🏭 Industry options:");
    for tag in catalog.industry_tags() {
        println!("   - {}", tag);
    }
}

fn print_outcome(outcome: &MatchOutcome<'_>) {
    match outcome.status {
        MatchStatus::NoFocusMatch => {
            println!("❌ No franchises matched the selected business focus categories.");
            return;
        }
        MatchStatus::Empty => {
            println!("❌ No franchises to display — please broaden your answers.");
            return;
        }
        MatchStatus::RelaxedFallback => {
            println!(
                "ℹ️  No brand met all filters. Showing top-ranked brands that fit your \
                business focus categories instead."
            );
        }
        MatchStatus::Strict => {}
    }

    println!(
        "\n✨ Your Top {} Franchise Recommendations ✨\n",
        outcome.results.len()
    );
    for result in &outcome.results {
        println!("{}", DisplayFields::from_result(result).render_card());
    }
}

fn generate_recommendations_csv(outcome: &MatchOutcome<'_>, output_dir: &str) -> Result<()> {
    use csv::Writer;

    let csv_path = Path::new(output_dir).join("recommendations.csv");
    let mut writer = Writer::from_path(csv_path)?;

    writer.write_record([
        "Franchise Name",
        "Match Score",
        "URL",
        "Industry",
        "Description",
        "Startup Cost",
        "Franchise Fee",
        "Veteran Discount",
        "Industry Ranking",
        "Number of Units Open",
        "Support",
        "Home Based",
    ])?;

    for result in &outcome.results {
        let fields = DisplayFields::from_result(result);
        let match_score = result.match_score.to_string();
        writer.write_record([
            &fields.name,
            &match_score,
            &fields.url,
            &fields.industry,
            &fields.description,
            &fields.startup_cost,
            &fields.franchise_fee,
            &fields.veteran_discount,
            &fields.industry_ranking,
            &fields.units_open,
            &fields.support,
            &fields.home_based,
        ])?;
    }

    writer.flush()?;
    Ok(())
}
