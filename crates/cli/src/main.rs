// tariffscope CLI - resolve effective tariff rates per trading partner

mod chain;
mod exit_codes;
mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tariffscope_config::{config_path, ConfigError, TariffConfig};
use tariffscope_recon::{try_normalize, RateReading, RawRate, ResolvedCountryTariff, Resolver};

use exit_codes::{EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE, EXIT_VERIFY_FAILED};

/// Countries checked by `tariffs verify` when none are given.
const DEFAULT_VERIFY_COUNTRIES: &[&str] = &[
    "China",
    "Vietnam",
    "Mexico",
    "Canada",
    "Japan",
    "Germany",
    "India",
    "United Kingdom",
];

#[derive(Parser)]
#[command(name = "tariffs")]
#[command(about = "Resolve effective US import tariff rates by trading partner")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/tariffscope/tariffscope.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Structured tariff document (XLSX/XLS/ODS/CSV), overrides config
    #[arg(long, global = true, value_name = "PATH")]
    document: Option<PathBuf>,

    /// Skip the live government API even if enabled
    #[arg(long, global = true)]
    offline: bool,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the effective tariff rate for one or more countries
    #[command(after_help = "\
Examples:
  tariffs resolve China
  tariffs resolve China Vietnam --json
  tariffs resolve Japan --sector 'Automobiles and Parts' --detail
  tariffs resolve China --hts 8471 --offline")]
    Resolve {
        /// Country names (case-insensitive)
        #[arg(required = true)]
        countries: Vec<String>,

        /// Only entries for this sector (plus country-wide rows)
        #[arg(long, conflicts_with = "hts")]
        sector: Option<String>,

        /// Only entries covering this HTS code
        #[arg(long)]
        hts: Option<String>,

        /// Print one line per tariff entry
        #[arg(long)]
        detail: bool,

        /// JSON output (an array when several countries are given)
        #[arg(long)]
        json: bool,
    },

    /// Check that every country resolves to real data
    #[command(after_help = "\
Exits 60 when any country comes back as \"No Data\".

Examples:
  tariffs verify
  tariffs verify Brazil Chile --json")]
    Verify {
        /// Countries to check (default: China, Vietnam, Mexico, Canada,
        /// Japan, Germany, India, United Kingdom)
        countries: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Show the adapter chain in priority order
    Sources {
        #[arg(long)]
        json: bool,
    },

    /// List country names the enumerable sources know about
    Countries {
        #[arg(long)]
        json: bool,
    },

    /// Normalize a raw rate value the way sources do
    #[command(after_help = "\
Examples:
  tariffs rate 25%
  tariffs rate 0.15
  tariffs rate '120% or $100 per item'")]
    Rate {
        /// Raw value, e.g. "25%" or "TBD". Bare numbers are read as
        /// numeric cells, so 0.15 means 15%.
        #[arg(allow_hyphen_values = true)]
        raw: String,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("TARIFFS_COMMIT"), ")",
        "\nbuild:   ", env!("TARIFFS_PROFILE"),
        "\ntarget:  ", env!("TARIFFS_TARGET"),
    )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let resolver = || load_resolver(cli.config.as_deref(), cli.document.as_deref(), cli.offline);
    let result = match cli.command {
        Commands::Resolve { countries, sector, hts, detail, json } => resolver()
            .and_then(|r| cmd_resolve(&r, &countries, sector.as_deref(), hts.as_deref(), detail, json)),
        Commands::Verify { countries, json } => resolver().and_then(|r| cmd_verify(&r, &countries, json)),
        Commands::Sources { json } => resolver().and_then(|r| cmd_sources(&r, json)),
        Commands::Countries { json } => resolver().and_then(|r| cmd_countries(&r, json)),
        Commands::Rate { raw } => cmd_rate(&raw),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self {
            code: EXIT_CONFIG,
            message: err.to_string(),
            hint: Some(format!("default config location: {}", config_path().display())),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ── Setup ──

fn load_resolver(config: Option<&Path>, document: Option<&Path>, offline: bool) -> Result<Resolver, CliError> {
    let mut config = TariffConfig::load(config).map_err(CliError::config)?;
    if let Some(path) = document {
        config.document.enabled = true;
        config.document.path = Some(path.to_path_buf());
    }
    chain::build_resolver(&config, offline)
        .map_err(|e| CliError::error(e.to_string()).with_hint("check [live_api] in the config, or pass --offline"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| CliError::error(format!("JSON output: {e}")))?;
    println!("{}", text);
    Ok(())
}

// ── Commands ──

fn cmd_resolve(
    resolver: &Resolver,
    countries: &[String],
    sector: Option<&str>,
    hts: Option<&str>,
    detail: bool,
    json: bool,
) -> Result<(), CliError> {
    if let Some(blank) = countries.iter().find(|c| c.trim().is_empty()) {
        return Err(CliError::usage(format!("country name must not be empty (got '{blank}')")));
    }

    let resolved: Vec<ResolvedCountryTariff> = countries
        .iter()
        .map(|country| match (sector, hts) {
            (Some(sector), _) => resolver.resolve_sector(country, sector),
            (None, Some(code)) => resolver.resolve_hts(country, code),
            (None, None) => resolver.resolve(country),
        })
        .collect();

    if json {
        let views: Vec<_> = resolved.iter().map(ResolvedCountryTariff::view).collect();
        return match views.as_slice() {
            [single] => print_json(single),
            _ => print_json(&views),
        };
    }

    let blocks: Vec<String> = resolved.iter().map(|r| report::resolution_block(r, detail)).collect();
    print!("{}", blocks.join("\n"));
    Ok(())
}

fn cmd_verify(resolver: &Resolver, countries: &[String], json: bool) -> Result<(), CliError> {
    let targets: Vec<String> = if countries.is_empty() {
        DEFAULT_VERIFY_COUNTRIES.iter().map(|c| c.to_string()).collect()
    } else {
        countries.to_vec()
    };

    let resolved = resolver.resolve_many(&targets);
    let missing: Vec<&str> = resolved
        .iter()
        .filter(|r| !r.has_data())
        .map(|r| r.country.as_str())
        .collect();

    if json {
        let rows: Vec<report::VerifyRow> = resolved.iter().map(report::VerifyRow::new).collect();
        print_json(&rows)?;
    } else {
        for r in &resolved {
            println!("{}", report::verify_line(r));
        }
    }

    if missing.is_empty() {
        eprintln!("verified {} countries", resolved.len());
        return Ok(());
    }
    Err(CliError {
        code: EXIT_VERIFY_FAILED,
        message: format!("{} of {} countries have no data: {}", missing.len(), resolved.len(), missing.join(", ")),
        hint: Some("run `tariffs sources` to check which sources are enabled".to_string()),
    })
}

fn cmd_sources(resolver: &Resolver, json: bool) -> Result<(), CliError> {
    let summaries = resolver.source_summaries();
    if json {
        return print_json(&summaries);
    }
    print!("{}", report::sources_table(&summaries));
    Ok(())
}

fn cmd_countries(resolver: &Resolver, json: bool) -> Result<(), CliError> {
    let countries = resolver.known_countries();
    if json {
        return print_json(&countries);
    }
    for country in &countries {
        println!("{}", country);
    }
    eprintln!("{} countries", countries.len());
    Ok(())
}

fn cmd_rate(raw: &str) -> Result<(), CliError> {
    // A bare number is read the way a numeric spreadsheet or JSON cell is
    let value = match raw.trim().parse::<f64>() {
        Ok(n) => RawRate::Number(n),
        Err(_) => RawRate::from(raw),
    };
    match try_normalize(value) {
        Ok(RateReading::Rate(pct)) => {
            println!("{}", pct);
            Ok(())
        }
        Ok(RateReading::Unresolved) => {
            println!("0");
            eprintln!("unresolved: '{}' is not yet determined", raw.trim());
            Ok(())
        }
        Err(e) => Err(CliError::usage(e.to_string()).with_hint("use a percentage like '25%' or a fraction like 0.25")),
    }
}
