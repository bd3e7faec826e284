use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blotter_rs::prelude::*;
use chrono::NaiveDate;
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(name = "blotter")]
#[command(about = "Rebuild the order blotter of a limit-order entry/exit rule from daily OHLC history")]
struct Cli {
    /// JSON file with the daily bars
    #[arg(long, value_name = "PATH")]
    prices: PathBuf,
    /// Asset symbol written on every order
    #[arg(long, default_value = "IVV")]
    asset: String,
    /// First date to load (inclusive)
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last date to load (inclusive)
    #[arg(long)]
    end: Option<NaiveDate>,
    /// JSON file with `alpha1`, `n1`, `alpha2` and `n2`; overrides the flags below
    #[arg(long, value_name = "PATH")]
    params: Option<PathBuf>,
    /// Entry offset applied to the previous close
    #[arg(long, default_value = "-0.01", allow_hyphen_values = true)]
    alpha1: Decimal,
    /// Entry window in trading days
    #[arg(long, default_value_t = 3)]
    n1: usize,
    /// Exit offset applied to the entry fill
    #[arg(long, default_value = "0.01", allow_hyphen_values = true)]
    alpha2: Decimal,
    /// Exit window in trading days
    #[arg(long, default_value_t = 5)]
    n2: usize,
    /// Only simulate the entry leg
    #[arg(long)]
    entry_only: bool,
    /// Market holidays, comma separated
    #[arg(long, value_delimiter = ',')]
    holidays: Vec<NaiveDate>,
    /// Print the blotter as JSON
    #[arg(long)]
    json: bool,
    /// Print summary metrics after the blotter
    #[arg(long)]
    summary: bool,
}

fn load_params(cli: &Cli) -> Result<StrategyParams> {
    let params = match &cli.params {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        }
        None => StrategyParams {
            alpha1: cli.alpha1,
            n1: cli.n1,
            alpha2: cli.alpha2,
            n2: cli.n2,
        },
    };
    params.validate()?;
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let params = load_params(&cli)?;
    let start = cli.start.unwrap_or(NaiveDate::MIN);
    let end = cli.end.unwrap_or(NaiveDate::MAX);
    if start > end {
        bail!("start date {start} is after end date {end}");
    }

    let series = JsonPriceFile::new(&cli.prices)
        .price_history(&cli.asset, start, end)
        .with_context(|| format!("loading {} from {}", cli.asset, cli.prices.display()))?;
    info!(
        "loaded {} bars for {} ({} to {})",
        series.len(),
        cli.asset,
        series.first_date(),
        series.last_date()
    );

    let mut simulation = Simulation::new(series, cli.asset.clone(), params)?;
    if cli.entry_only {
        simulation = simulation.entry_only();
    }
    let calendar = WeekdayCalendar::with_holidays(cli.holidays.iter().copied());
    let blotter = simulation.run(&calendar)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&blotter)?);
    } else {
        print!("{blotter}");
    }

    if cli.summary {
        println!();
        print!("{}", Metrics::from(&blotter));
    }

    Ok(())
}
