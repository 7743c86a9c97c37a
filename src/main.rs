use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use uk_cfd_dashboard::csv_parser::write_metrics_csv;
use uk_cfd_dashboard::dataset::REFERENCE_CSV;
use uk_cfd_dashboard::{
    default_constants, load_table, Currency, Dashboard, DashboardOptions, OutputFormat, PriceYear,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "UK offshore wind CfD strike price, production and revenue dashboard",
    long_about = None
)]
struct Cli {
    /// Currency for strike prices and revenue
    #[arg(long, value_enum, default_value_t = CurrencyOpt::Gbp)]
    currency: CurrencyOpt,

    /// Price year for strike prices
    #[arg(long, value_enum, default_value_t = PriceYearOpt::Original)]
    price_year: PriceYearOpt,

    /// Output document format
    #[arg(long, value_enum, default_value_t = FormatOpt::Html)]
    format: FormatOpt,

    /// Write the dashboard here instead of stdout
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Also export the enriched table as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    export_csv: Option<PathBuf>,

    /// Project table to use instead of the built-in reference dataset
    #[arg(long, value_hint = ValueHint::FilePath)]
    dataset: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum CurrencyOpt {
    Gbp,
    Usd,
    Eur,
}

impl From<CurrencyOpt> for Currency {
    fn from(value: CurrencyOpt) -> Self {
        match value {
            CurrencyOpt::Gbp => Currency::Gbp,
            CurrencyOpt::Usd => Currency::Usd,
            CurrencyOpt::Eur => Currency::Eur,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PriceYearOpt {
    /// 2012 prices as awarded
    #[value(name = "2012")]
    Original,
    /// CPI-adjusted to May 2025
    #[value(name = "2025")]
    Adjusted,
}

impl From<PriceYearOpt> for PriceYear {
    fn from(value: PriceYearOpt) -> Self {
        match value {
            PriceYearOpt::Original => PriceYear::Original2012,
            PriceYearOpt::Adjusted => PriceYear::Adjusted2025,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum FormatOpt {
    Html,
    Json,
}

impl From<FormatOpt> for OutputFormat {
    fn from(value: FormatOpt) -> Self {
        match value {
            FormatOpt::Html => OutputFormat::Html,
            FormatOpt::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let csv_content: Cow<'_, str> = match &cli.dataset {
        Some(path) => Cow::Owned(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset {}", path.display()))?,
        ),
        None => Cow::Borrowed(REFERENCE_CSV),
    };

    let constants = default_constants();
    let table = load_table(&csv_content, &constants)?;
    if table.is_empty() {
        warn!("dataset has no projects; every chart will show the no-data state");
    }

    if let Some(path) = &cli.export_csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        write_metrics_csv(&table, BufWriter::new(file))?;
        info!(path = %path.display(), rows = table.len(), "exported enriched table");
    }

    let options = DashboardOptions {
        currency: cli.currency.into(),
        price_year: cli.price_year.into(),
    };
    let dashboard = Dashboard::build(&table, &constants, options);
    let output = dashboard.render(cli.format.into())?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote dashboard");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
