use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fincalc_cli::{
    BracketLoader, Config, HistoryText, OutputFormat, RatesView, ReportText, init_logging,
    render,
};
use fincalc_core::db::{DbConfig, RepositoryRegistry};
use fincalc_core::{
    Calculator, CalculatorKind, CalculatorParams, HistoryRepository, NewHistoryRecord,
    RateTables,
};
use fincalc_db_sqlite::SqliteRepositoryFactory;
use tracing::info;

/// Egyptian tax, social insurance and personal-finance calculators.
#[derive(Parser, Debug)]
#[command(name = "fincalc")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the TOML configuration file (defaults apply when absent)
    #[arg(short, long, default_value = "fincalc.toml")]
    config: PathBuf,

    /// Log level or filter directive; overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a calculator on a JSON parameter file
    ///
    /// The file holds one record tagged by "calculator", e.g.
    /// {"calculator": "zakat", "cash": "300000", "gold_price_per_gram": "3000"}
    Compute {
        /// Path to the JSON parameter file
        params: PathBuf,

        /// Store the parameters and the report in the history database
        #[arg(short, long, default_value_t = false)]
        save: bool,
    },

    /// Show the rate tables in force for a year
    Rates {
        /// Tax year (defaults to `default_year` from the config file)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Inspect or prune saved calculations
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved calculations, newest first
    List {
        /// Only show one calculator (e.g. salary_tax)
        #[arg(short, long)]
        calculator: Option<CalculatorKind>,
    },

    /// Show one saved calculation
    Show { id: i64 },

    /// Delete one saved calculation
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config: {}", args.config.display()))?;

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(level, config.log_file.as_deref()).context("Failed to initialize logging")?;

    let output = match args.command {
        Command::Compute { params, save } => {
            let rates = load_rates(&config)?;
            compute(&rates, &params, save, &config.database, args.output).await?
        }
        Command::Rates { year } => {
            let rates = load_rates(&config)?;
            let year = year.unwrap_or(config.default_year);
            let view = RatesView {
                requested_year: year,
                resolved_year: rates.resolve_year(year),
                rates: rates.lookup(year),
            };
            render(&view, &view, args.output)?
        }
        Command::History { action } => history(action, &config.database, args.output).await?,
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// Built-in tables, with the configured bracket overrides applied.
fn load_rates(config: &Config) -> Result<RateTables> {
    let rates = RateTables::builtin();
    let Some(path) = &config.rates_csv else {
        return Ok(rates);
    };

    let file =
        File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let records = BracketLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "loaded bracket overrides");

    BracketLoader::apply(rates, &records)
        .with_context(|| format!("Invalid bracket overrides in: {}", path.display()))
}

async fn open_repository(db: &DbConfig) -> Result<Box<dyn HistoryRepository>> {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    registry
        .create(db)
        .await
        .with_context(|| format!("Failed to open history database: {}", db.connection_string))
}

async fn compute(
    rates: &RateTables,
    path: &Path,
    save: bool,
    db: &DbConfig,
    format: OutputFormat,
) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;
    let params: CalculatorParams = serde_json::from_str(&text)
        .with_context(|| format!("Invalid calculator parameters in: {}", path.display()))?;

    let report = Calculator::new(rates)
        .compute(&params)
        .with_context(|| format!("{} calculation failed", params.kind()))?;

    if save {
        let repo = open_repository(db).await?;
        let saved = repo
            .save(NewHistoryRecord::new(params, report.clone()))
            .await
            .context("Failed to save calculation")?;
        eprintln!("Saved as record {}.", saved.id);
    }

    Ok(render(&report, ReportText(&report), format)?)
}

async fn history(
    action: HistoryCommand,
    db: &DbConfig,
    format: OutputFormat,
) -> Result<String> {
    let repo = open_repository(db).await?;

    match action {
        HistoryCommand::List { calculator } => {
            let records = repo
                .list(calculator)
                .await
                .context("Failed to list saved calculations")?;
            Ok(render(&records, HistoryText(&records), format)?)
        }
        HistoryCommand::Show { id } => {
            let record = repo
                .get(id)
                .await
                .with_context(|| format!("Failed to load record {id}"))?;
            let text = format!(
                "#{} {} at {}\n\n{}",
                record.id,
                record.calculator,
                record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                ReportText(&record.report)
            );
            Ok(render(&record, text, format)?)
        }
        HistoryCommand::Delete { id } => {
            repo.delete(id)
                .await
                .with_context(|| format!("Failed to delete record {id}"))?;
            Ok(format!("Deleted record {id}."))
        }
    }
}
