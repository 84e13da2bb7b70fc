//! Sumo risk CLI
//!
//! Evaluates the breakeven curve, calibrates opening risk and prints
//! survival schedules for a position scaled across technical levels.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sumo_risk::models::{CalibrationLadder, Termination};
use sumo_risk::{
    decimal_to_price_string, BreakevenCurve, PositionState, PriceInput, RiskConfig, RiskEngine,
    TechLevelGrid, TechnicalConfig, TechnicalInput,
};

/// Risk survival curve CLI.
#[derive(Parser)]
#[command(name = "sumo")]
#[command(about = "Size a scaling futures position against a stop-loss budget", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Technical levels file (one price per line, decimal or tick notation)
    #[arg(long, global = true)]
    levels_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Technical anchors shared by every engine command.
#[derive(Args, Debug)]
struct TechnicalArgs {
    /// Strong support price
    #[arg(long)]
    support: PriceInput,

    /// Strong resistance price
    #[arg(long)]
    resistance: PriceInput,

    /// Long size-up anchor
    #[arg(long)]
    size_up_long: Option<PriceInput>,

    /// Short size-up anchor
    #[arg(long)]
    size_up_short: Option<PriceInput>,
}

impl TechnicalArgs {
    fn resolve(self) -> Result<TechnicalConfig> {
        let input = TechnicalInput {
            strong_support: self.support,
            strong_resistance: self.resistance,
            size_up_long_price: self.size_up_long,
            size_up_short_price: self.size_up_short,
        };
        input.resolve().context("Invalid technical anchors")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the breakeven curve at a price
    Breakeven {
        /// Price to evaluate
        price: PriceInput,

        #[command(flatten)]
        technical: TechnicalArgs,
    },

    /// Calibrate opening risk on both sides of the current price
    Calibrate {
        /// Current price
        #[arg(short, long)]
        price: PriceInput,

        #[command(flatten)]
        technical: TechnicalArgs,
    },

    /// Walk the survival schedule of an open position
    Survival {
        /// Current price
        #[arg(short, long)]
        price: PriceInput,

        /// Signed initial risk (positive long, negative short)
        #[arg(short, long, allow_negative_numbers = true)]
        risk: Decimal,

        /// Price the trade started at
        #[arg(short, long)]
        entry: PriceInput,

        /// PnL already booked in the trade
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        pnl0: Decimal,

        #[command(flatten)]
        technical: TechnicalArgs,
    },

    /// Combined schedule for a flat or open position
    Schedule {
        /// Current price
        #[arg(short, long)]
        price: PriceInput,

        /// Signed net position in lots
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        position: Decimal,

        /// Entry price of the open position
        #[arg(short, long)]
        entry: Option<PriceInput>,

        /// PnL realized within the trade
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        realized_pnl: Decimal,

        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        technical: TechnicalArgs,
    },

    /// Show current configuration
    Config,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RiskConfig::from_env().context("Invalid risk configuration")?;
    let curve = BreakevenCurve::from_env().context("Invalid breakeven configuration")?;

    match cli.command {
        Commands::Breakeven { price, technical } => {
            let price = price_arg(&price)?;
            let technical = technical.resolve()?;

            let ticks = curve.evaluate(price, &technical)?;
            println!(
                "Breakeven at {} ({}): {} ticks",
                decimal_to_price_string(price),
                price,
                ticks.round_dp(4).normalize()
            );
        }

        Commands::Calibrate { price, technical } => {
            let price = price_arg(&price)?;
            let technical = technical.resolve()?;
            if technical.size_up_long_price.is_none() || technical.size_up_short_price.is_none() {
                warn!(price = %price, "Size-up anchor missing, defaulting to the current price");
            }

            let engine = engine(config, curve, cli.levels_file.as_deref())?;
            let result = engine.calibrate(price, &technical)?;

            println!("\n{:=^60}", " CALIBRATION ");
            println!("Current:        {} ({})", decimal_to_price_string(price), price);
            println!(
                "Nearest below:  {}   R0 below: {:.2}",
                decimal_to_price_string(result.nearest_below),
                result.r0_below
            );
            println!(
                "Nearest above:  {}   R0 above: {:.2}",
                decimal_to_price_string(result.nearest_above),
                result.r0_above
            );
            print_ladder(&result.above);
            print_ladder(&result.below);
        }

        Commands::Survival {
            price,
            risk,
            entry,
            pnl0,
            technical,
        } => {
            let price = price_arg(&price)?;
            let entry = price_arg(&entry)?;
            let technical = technical.resolve()?;

            let engine = engine(config, curve, cli.levels_file.as_deref())?;
            let result = engine.survival(price, risk, &technical, entry, pnl0)?;

            println!("\n{:=^65}", format!(" {} SURVIVAL ", result.side));
            let lot = engine.config().lot_size;
            println!(
                "{:<10} {:>12} {:>8} {:>8} {:>12} {:>10}",
                "PRICE", "RISK", "DELTA", "LOTS", "PNL", "BE TICKS"
            );
            println!("{}", "-".repeat(65));
            for entry in &result.entries {
                println!(
                    "{:<10} {:>12} {:>8} {:>8.2} {:>12.2} {:>10.2}",
                    decimal_to_price_string(entry.price),
                    entry.risk.normalize(),
                    entry.delta_risk.normalize(),
                    entry.risk / lot,
                    entry.pnl,
                    entry.breakeven_ticks
                );
            }
            println!("{}", "-".repeat(65));
            println!(
                "Extreme level: {} ({} ticks away)",
                decimal_to_price_string(result.extreme_level),
                result.ticks_to_extreme.normalize()
            );
            match result.termination {
                Termination::StopLoss { breach_pnl } => {
                    println!("Stopped: next level would reach PnL {:.2}", breach_pnl)
                }
                Termination::LadderExhausted => println!("Stopped: no more levels"),
            }
        }

        Commands::Schedule {
            price,
            position,
            entry,
            realized_pnl,
            json,
            technical,
        } => {
            let price = price_arg(&price)?;
            let technical = technical.resolve()?;
            let entry_price = entry.as_ref().map(price_arg).transpose()?;

            let position = PositionState {
                net_lots: position,
                entry_price,
                realized_pnl,
            };
            if position.is_flat() && entry_price.is_some() {
                warn!("Entry price ignored for a flat position");
            }

            let engine = engine(config, curve, cli.levels_file.as_deref())?;
            let snapshot = engine.snapshot(price, &position, &technical)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("{}", snapshot);
            }
        }

        Commands::Config => {
            println!("\n=== Risk Configuration ===\n");
            println!("Budget:");
            println!("  Stop Loss:            {}", config.stop_loss);
            println!("  Lot Size:             {}", config.lot_size);
            println!("  Slippage:             {} ticks", config.slippage_ticks);

            println!("\nLadder:");
            println!("  NBM Look-ahead:       {} ticks", config.nbm);
            println!("  Ticks per Point:      {}", config.ticks_per_point);
            println!("  Calibration Buffer:   {}", config.calibration_buffer);
            println!("  Walk Buffer:          {}", config.walk_buffer);

            println!("\nBreakeven Curve:");
            println!("  Low:                  {} ticks", curve.be_low);
            println!("  High:                 {} ticks", curve.be_high);

            println!("\nDefault Grid:");
            println!(
                "  Range:                {} .. {}",
                decimal_to_price_string(config.grid.low),
                decimal_to_price_string(config.grid.high)
            );
            println!("  Step:                 {}", config.grid.step);
        }
    }

    Ok(())
}

fn price_arg(input: &PriceInput) -> Result<Decimal> {
    input
        .to_decimal()
        .with_context(|| format!("Invalid price {}", input))
}

fn engine(
    config: RiskConfig,
    curve: BreakevenCurve,
    levels_file: Option<&Path>,
) -> Result<RiskEngine<TechLevelGrid>> {
    let grid = match levels_file {
        Some(path) => TechLevelGrid::from_file(path)?,
        None => config.grid.build(),
    };
    if grid.is_empty() {
        warn!("Technical level grid is empty");
    }
    info!(levels = grid.len(), "Technical level grid ready");

    Ok(RiskEngine::new(config, curve, grid)?)
}

fn print_ladder(ladder: &CalibrationLadder) {
    println!("\n--- {} ladder (scale {:.4}) ---", ladder.side, ladder.scale);
    println!(
        "{:<10} {:>12} {:>14} {:>14}",
        "PRICE", "UNIT RISK", "UNIT PNL", "RISK"
    );
    for level in &ladder.levels {
        println!(
            "{:<10} {:>12.4} {:>14.4} {:>14.2}",
            decimal_to_price_string(level.price),
            level.unit_risk,
            level.unit_pnl,
            level.risk
        );
    }
}
