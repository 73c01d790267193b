use std::path::PathBuf;

use airtrend::analysis::growth::GrowthPoint;
use airtrend::analysis::report::StationReport;
use airtrend::analysis::summary::GrowthSummary;
use airtrend::config::Config;
use airtrend::data::loader::load_dataset;
use airtrend::data::model::{Dataset, Station};
use airtrend::state::DashboardState;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "airtrend",
    version,
    about = "Monthly and yearly pollution growth per monitoring station"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Station registry (TOML). Built-in station list when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// List loaded stations with their columns and time span
    Stations,

    /// Growth summary for one station
    Report {
        /// Station name (first configured station when omitted)
        station: Option<String>,

        /// Only analyse these pollutant columns (repeatable)
        #[arg(short, long)]
        pollutant: Vec<String>,

        /// Also print every period's growth per column
        #[arg(long)]
        detail: bool,
    },

    /// Print the raw observations of one station
    Table {
        /// Station name
        station: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    let dataset = load_dataset(&config).context("loading station data")?;

    match cli.command {
        Commands::Stations => print_stations(&dataset, cli.format)?,
        Commands::Report {
            station,
            pollutant,
            detail,
        } => {
            let mut state = DashboardState::new(dataset);
            state.set_columns(pollutant);
            let report = match station {
                Some(name) => state.select(&name)?,
                None => state
                    .select_first()
                    .context("no stations configured")??,
            };
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
                OutputFormat::Text => print_report(report, detail),
            }
        }
        Commands::Table { station } => {
            let station = dataset.station(&station)?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(station)?),
                OutputFormat::Text => print_table(station),
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

fn print_stations(dataset: &Dataset, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&dataset.names())?);
        return Ok(());
    }
    for station in &dataset.stations {
        let span = station
            .series
            .first()
            .and_then(|s| s.span())
            .map(|(from, to)| format!("{} .. {}", from.format("%Y-%m"), to.format("%Y-%m")))
            .unwrap_or_else(|| "no rows".to_string());
        println!(
            "{:<16} {:>4} rows  {}  [{}]",
            station.name,
            station.row_count(),
            span,
            station.column_names().join(", ")
        );
    }
    Ok(())
}

fn print_report(report: &StationReport, detail: bool) {
    println!("Pollution growth: {}", report.station);
    println!("{}", "=".repeat(18 + report.station.len()));

    println!("\nMonthly growth");
    print_overview(report.monthly_overview.as_ref());
    print_by_series(&report.monthly_by_series);

    println!("\nYearly growth");
    print_overview(report.yearly_overview.as_ref());
    print_by_series(&report.yearly_by_series);

    if !detail {
        return;
    }
    for series in &report.series {
        println!("\n{}", series.series);
        print_periods("monthly", &series.monthly_growth, "%Y-%m");
        print_periods("yearly", &series.yearly_growth, "%Y");
    }
}

fn print_overview(summary: Option<&GrowthSummary<String>>) {
    match summary {
        Some(s) => {
            println!("  Average growth:  {}", pct(Some(s.mean)));
            println!("  Highest growth:  {} {}", pct(Some(s.max)), s.max_at);
            println!("  Lowest growth:   {} {}", pct(Some(s.min)), s.min_at);
        }
        None => println!("  no data"),
    }
}

fn print_by_series(points: &[GrowthPoint<String>]) {
    for p in points {
        println!("    {:<10} {:>10}", p.label, pct(p.percent));
    }
}

fn print_periods(kind: &str, points: &[GrowthPoint<NaiveDate>], label_fmt: &str) {
    let cells: Vec<String> = points
        .iter()
        .map(|p| format!("{} {}", p.label.format(label_fmt), pct(p.percent)))
        .collect();
    println!("  {kind:<8} {}", cells.join(" | "));
}

fn print_table(station: &Station) {
    let mut header = format!("{:<12}", "timestamp");
    for name in station.column_names() {
        header.push_str(&format!(" {name:>10}"));
    }
    println!("{header}");

    for row in 0..station.row_count() {
        let Some(ts) = station
            .series
            .iter()
            .find_map(|s| s.points.get(row).map(|p| p.timestamp))
        else {
            continue;
        };
        let mut line = format!("{:<12}", ts.format("%Y-%m-%d").to_string());
        for series in &station.series {
            let cell = series
                .points
                .get(row)
                .and_then(|p| p.value)
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "-".to_string());
            line.push_str(&format!(" {cell:>10}"));
        }
        println!("{line}");
    }
}

fn pct(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}%"))
        .unwrap_or_else(|| "n/a".to_string())
}
