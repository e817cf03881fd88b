// Command line front end.
//
// Each subcommand loads the periods it needs, runs the pure core and
// prints a markdown table. Loaded data lives in the handler's locals and is
// passed down explicitly.
use anyhow::Context;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use log::info;
use monsoon_report::classify::legend;
use monsoon_report::loader::load_period_or_empty;
use monsoon_report::monsoon::{find_spell, load_spells};
use monsoon_report::{output, reports, util};
use monsoon_report::{classify, reconcile, Config, Month, RainfallRecord};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "monsoon_report",
    version,
    about = "Bihar district rainfall comparison and IMD status reports"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the CSV files (overrides config)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare one month across two years, district by district
    Compare {
        /// First year (default: current year)
        #[arg(long)]
        year1: Option<i32>,

        /// Second year (default: previous year)
        #[arg(long)]
        year2: Option<i32>,

        #[arg(short, long, value_enum, default_value_t = Month::June)]
        month: Month,

        /// Only show districts containing this text
        #[arg(short, long)]
        search: Option<String>,

        /// Write the comparison table to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the comparison summary to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Compare whole-season rainfall across two years
    Overall {
        #[arg(long)]
        year1: Option<i32>,

        #[arg(long)]
        year2: Option<i32>,

        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// District table and statistics for one month of one year
    Summary {
        #[arg(long)]
        year: Option<i32>,

        #[arg(short, long, value_enum, default_value_t = Month::June)]
        month: Month,

        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Monsoon onset, withdrawal and stay period for a year
    Monsoon {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Print the status category bands
    Legend,

    /// Classify a departure percentage
    Classify {
        #[arg(allow_hyphen_values = true)]
        departure: String,
    },
}

fn current_year() -> i32 {
    Local::now().year()
}

fn print_comparison(
    records: &[monsoon_report::ComparisonRecord],
    title: &str,
    year1: i32,
    year2: i32,
    search: Option<&str>,
    csv_out: Option<&Path>,
) -> anyhow::Result<()> {
    let shown: Vec<_> = match search {
        Some(q) => reports::filter_districts(records, q)
            .into_iter()
            .cloned()
            .collect(),
        None => records.to_vec(),
    };
    let rows = reports::comparison_rows(&shown);

    let note = if reports::departure_available(records) {
        format!("Y1 = {}, Y2 = {}", year1, year2)
    } else {
        format!("Y1 = {}, Y2 = {}, Dev N/A", year1, year2)
    };
    output::preview_table(title, Some(&note), &rows, None);

    if let Some(path) = csv_out {
        output::write_csv(path, &rows)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("(Full table exported to {})\n", path.display());
    }
    Ok(())
}

fn handle_compare(
    config: &Config,
    year1: i32,
    year2: i32,
    month: Month,
    search: Option<&str>,
    csv_out: Option<&Path>,
    json_out: Option<&Path>,
) -> anyhow::Result<()> {
    let strategy = config.column_strategy();
    let period1 = load_period_or_empty(&config.monthly_path(year1, month), strategy.as_ref());
    let period2 = load_period_or_empty(&config.monthly_path(year2, month), strategy.as_ref());
    info!(
        "Comparing {} {} ({} districts) with {} {} ({} districts)",
        month,
        year1,
        period1.len(),
        month,
        year2,
        period2.len()
    );

    let comparison = reconcile(&period1, &period2);
    let title = format!("District Actual Rainfall Comparison ({} vs {} - {})", year1, year2, month);
    print_comparison(&comparison, &title, year1, year2, search, csv_out)?;

    let summary = reports::summarize_comparison(&comparison);
    println!(
        "{} districts, {} matched, {} wetter and {} drier in {}",
        util::format_int(summary.total_districts),
        util::format_int(summary.matched_districts),
        util::format_int(summary.wetter_in_first),
        util::format_int(summary.drier_in_first),
        year1
    );
    if let Some(path) = json_out {
        output::write_json(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

fn handle_overall(
    config: &Config,
    year1: i32,
    year2: i32,
    csv_out: Option<&Path>,
) -> anyhow::Result<()> {
    let strategy = config.column_strategy();
    let season1 = load_period_or_empty(&config.overall_path(year1), strategy.as_ref());
    let season2 = load_period_or_empty(&config.overall_path(year2), strategy.as_ref());
    let comparison = reconcile(&season1, &season2);
    let title = format!("Overall Actual Rainfall Comparison ({} vs {} - Full Monsoon)", year1, year2);
    print_comparison(&comparison, &title, year1, year2, None, csv_out)
}

fn print_period_summary(records: &[RainfallRecord]) {
    let s = reports::summarize_period(records);
    println!(
        "{} districts ({} reporting), mean actual {} mm, mean departure {}%",
        util::format_int(s.total_districts),
        util::format_int(s.reporting_districts),
        util::format_optional(s.mean_actual_mm, 1),
        util::format_optional(s.mean_departure_pct, 1)
    );
    if let (Some(wet), Some(dry)) = (&s.wettest_district, &s.driest_district) {
        println!("Wettest: {}, driest: {}", wet, dry);
    }
    for (status, count) in &s.status_counts {
        if *count > 0 {
            println!("  {:<16} {}", status.label(), count);
        }
    }
    println!();
}

fn handle_summary(
    config: &Config,
    year: i32,
    month: Month,
    json_out: Option<&Path>,
) -> anyhow::Result<()> {
    let strategy = config.column_strategy();
    let records = load_period_or_empty(&config.monthly_path(year, month), strategy.as_ref());
    let rows = reports::district_rows(&records);
    output::preview_table(
        &format!("District Rainfall Status ({} {})", month, year),
        None,
        &rows,
        None,
    );
    print_period_summary(&records);
    if let Some(path) = json_out {
        let summary = reports::summarize_period(&records);
        output::write_json(path, &summary)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    Ok(())
}

fn handle_monsoon(config: &Config, year: i32) -> anyhow::Result<()> {
    let path = config.monsoon_path();
    let spells =
        load_spells(&path).with_context(|| format!("reading {}", path.display()))?;
    match find_spell(&spells, year) {
        Some(spell) => {
            println!("Monsoon arrival:    {}", spell.onset.format("%d %b %Y"));
            println!("Monsoon withdrawal: {}", spell.withdrawal.format("%d %b %Y"));
            println!("Days in Bihar:      {}", spell.stay_days());
        }
        None => println!("Data not available for year {}.", year),
    }
    Ok(())
}

fn handle_legend() {
    for entry in legend() {
        println!("{:<16} {}", entry.status.label(), entry.range);
    }
}

fn handle_classify(departure: &str) {
    let d = util::coerce_number(Some(departure));
    println!("{}", classify(Some(d)));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("loading config")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let this_year = current_year();
    match cli.command {
        Command::Compare {
            year1,
            year2,
            month,
            search,
            csv,
            json,
        } => handle_compare(
            &config,
            year1.unwrap_or(this_year),
            year2.unwrap_or(this_year - 1),
            month,
            search.as_deref(),
            csv.as_deref(),
            json.as_deref(),
        ),
        Command::Overall { year1, year2, csv } => handle_overall(
            &config,
            year1.unwrap_or(this_year),
            year2.unwrap_or(this_year - 1),
            csv.as_deref(),
        ),
        Command::Summary { year, month, json } => {
            handle_summary(&config, year.unwrap_or(this_year), month, json.as_deref())
        }
        Command::Monsoon { year } => handle_monsoon(&config, year.unwrap_or(this_year)),
        Command::Legend => {
            handle_legend();
            Ok(())
        }
        Command::Classify { departure } => {
            handle_classify(&departure);
            Ok(())
        }
    }
}
