//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::svg_chart::{SvgChart, format_thousands};
use crate::adapters::yahoo_adapter::YahooAdapter;
use crate::domain::align::aligned_start_date;
use crate::domain::allocation::{AllocationSpec, parse_allocations};
use crate::domain::backtest::compute_backtest_as_of;
use crate::domain::config_validation::validate_backtest_config;
use crate::domain::error::HoldfastError;
use crate::domain::price_table::Interval;
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::price_port::PricePort;

#[derive(Parser, Debug)]
#[command(name = "holdfast", about = "Buy-and-hold portfolio backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and render the value chart
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Chart output path (default from config, then backtest.svg)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override [backtest] amount
        #[arg(long)]
        amount: Option<u64>,
        /// Override [backtest] allocations, e.g. SPY:60,TLT:40
        #[arg(long)]
        allocations: Option<String>,
        #[arg(long)]
        dry_run: bool,
    },
    /// Show first-trade dates and the aligned window start
    Info {
        #[arg(short, long)]
        config: PathBuf,
        /// Override [backtest] allocations
        #[arg(long)]
        allocations: Option<String>,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            output,
            amount,
            allocations,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config)
            } else {
                run_backtest(&config, output.as_ref(), amount, allocations.as_deref())
            }
        }
        Command::Info {
            config,
            allocations,
        } => run_info(&config, allocations.as_deref()),
        Command::Serve { config } => run_serve(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = HoldfastError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Initial cash amount: CLI override, else `[backtest] amount`.
pub fn resolve_amount(
    amount_override: Option<u64>,
    config: &dyn ConfigPort,
) -> Result<u64, HoldfastError> {
    if let Some(amount) = amount_override {
        return Ok(amount);
    }
    let value = config
        .get_string("backtest", "amount")
        .ok_or_else(|| HoldfastError::ConfigMissing {
            section: "backtest".into(),
            key: "amount".into(),
        })?;
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| HoldfastError::ConfigInvalid {
            section: "backtest".into(),
            key: "amount".into(),
            reason: "amount must be a non-negative integer".into(),
        })
}

/// Allocation list: CLI override, else `[backtest] allocations`.
pub fn resolve_allocations(
    allocations_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<AllocationSpec, HoldfastError> {
    let raw = match allocations_override {
        Some(s) => s.to_string(),
        None => config.get_string("backtest", "allocations").ok_or_else(|| {
            HoldfastError::ConfigMissing {
                section: "backtest".into(),
                key: "allocations".into(),
            }
        })?,
    };
    Ok(parse_allocations(&raw)?)
}

pub fn resolve_interval(config: &dyn ConfigPort) -> Result<Interval, HoldfastError> {
    match config.get_string("backtest", "interval") {
        None => Ok(Interval::Monthly),
        Some(value) => Interval::parse(&value).ok_or_else(|| HoldfastError::ConfigInvalid {
            section: "backtest".into(),
            key: "interval".into(),
            reason: "expected daily, weekly or monthly".into(),
        }),
    }
}

/// `[data] csv_dir` selects the offline CSV adapter; otherwise Yahoo.
pub fn select_price_port(config: &dyn ConfigPort) -> Box<dyn PricePort + Send + Sync> {
    match config.get_string("data", "csv_dir") {
        Some(dir) => Box::new(CsvAdapter::new(PathBuf::from(dir))),
        None => Box::new(YahooAdapter::new()),
    }
}

fn run_backtest(
    config_path: &PathBuf,
    output_path: Option<&PathBuf>,
    amount_override: Option<u64>,
    allocations_override: Option<&str>,
) -> ExitCode {
    // Stage 1: load and validate config
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&config) {
        // Overrides may supply what the file lacks; re-check below.
        if amount_override.is_none() && allocations_override.is_none() {
            eprintln!("error: {e}");
            return (&e).into();
        }
    }

    // Stage 2: resolve run parameters
    let amount = match resolve_amount(amount_override, &config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let allocations = match resolve_allocations(allocations_override, &config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let interval = match resolve_interval(&config) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!(
        "Backtesting {} with {} symbols",
        format_thousands(amount as f64),
        allocations.sanitized().len()
    );

    // Stage 3: run the pipeline
    let port = select_price_port(&config);
    let end_date = chrono::Utc::now().date_naive();
    let outcome = match compute_backtest_as_of(&*port, amount, &allocations, end_date, interval) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: print summary
    eprintln!("\n=== Positions ({} start) ===", outcome.start_date);
    for position in outcome.positions.positions() {
        eprintln!(
            "  {}: {:.1}% -> {} units",
            position.symbol, position.ratio, position.units
        );
    }

    if let (Some(first), Some(last)) = (outcome.values.rows().first(), outcome.values.rows().last())
    {
        let show = |total: Option<f64>| match total {
            Some(v) => format_thousands(v),
            None => "n/a".to_string(),
        };
        eprintln!("\n=== Value ===");
        eprintln!("  {}: {}", first.date, show(first.total));
        eprintln!("  {}: {}", last.date, show(last.total));
    }

    // Stage 5: render chart
    let output = output_path
        .cloned()
        .or_else(|| config.get_string("chart", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("backtest.svg"));

    match SvgChart.render(&outcome.values, &output.display().to_string()) {
        Ok(()) => {
            eprintln!("\nChart written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to write chart: {e}");
            (&e).into()
        }
    }
}

pub fn run_dry_run(config_path: &PathBuf) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let allocations = match resolve_allocations(None, &config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    eprintln!("\nAllocations:");
    for allocation in allocations.entries() {
        eprintln!("  {}: {:.1}%", allocation.symbol, allocation.ratio);
    }

    eprintln!("\nDry run complete: configuration is valid");
    ExitCode::SUCCESS
}

fn run_info(config_path: &PathBuf, allocations_override: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let allocations = match resolve_allocations(allocations_override, &config) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let symbols = allocations.sanitized().symbols();
    if symbols.is_empty() {
        let e = HoldfastError::NoSymbols;
        eprintln!("error: {e}");
        return (&e).into();
    }

    let port = select_price_port(&config);
    for symbol in &symbols {
        match port.first_trade_date(symbol) {
            Ok(date) => println!("{}: first trade {}", symbol, date),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }

    match aligned_start_date(&*port, &symbols) {
        Ok(start) => {
            println!("aligned start: {}", start);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        eprintln!("Loading config from {}", config_path.display());
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(code) => return code,
        };

        let price_port: Arc<dyn PricePort + Send + Sync> = Arc::from(select_price_port(&config));

        let addr: SocketAddr = config
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
            .parse()
            .unwrap_or_else(|_| "127.0.0.1:3000".parse().unwrap());

        eprintln!("Starting web server on {}", addr);

        let state = AppState {
            price_port,
            config: Arc::new(config),
        };

        let router = build_router(state);

        tokio::runtime::Runtime::new().unwrap().block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
            axum::serve(listener, router).await.unwrap();
        });

        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
