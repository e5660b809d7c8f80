use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use daytrade_tax::models::TaxMonth;
use daytrade_tax::tax::TaxCostsConfig;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "daytrade-tax")]
#[command(version, about = "Brazilian day-trade income tax calculator")]
#[command(
    long_about = "Attach costs and IRRF to day trades, apportion monthly tax with loss carryforward, and derive DARF payment slips (code 6015)."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured default costs
#[derive(Args, Debug, Clone, Default)]
pub struct CostArgs {
    /// Flat brokerage fee per trade
    #[arg(long)]
    pub brokerage_fee: Option<Decimal>,

    /// Service tax as a percentage of the brokerage fee
    #[arg(long)]
    pub taxes_pct: Option<Decimal>,
}

impl CostArgs {
    pub fn apply(&self, mut costs: TaxCostsConfig) -> TaxCostsConfig {
        if let Some(fee) = self.brokerage_fee {
            costs.default_brokerage_fee = fee;
        }
        if let Some(pct) = self.taxes_pct {
            costs.default_taxes_pct = pct;
        }
        costs
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show trades with costs, IRRF and net result attached
    Enrich {
        /// Path to the trades file (.csv or .json)
        trades: PathBuf,

        /// Only list day trades
        #[arg(short, long)]
        day_trades_only: bool,

        #[command(flatten)]
        costs: CostArgs,
    },

    /// Calculate day-trade tax and DARF for one month
    Calculate {
        /// Path to the trades file (.csv or .json)
        trades: PathBuf,

        /// Month to calculate (YYYY-MM)
        #[arg(short, long)]
        month: TaxMonth,

        /// Loss carried from previous months
        #[arg(long, default_value = "0")]
        previous_loss: Decimal,

        #[command(flatten)]
        costs: CostArgs,
    },

    /// Annual report: every month of the year chained through the loss carryforward
    Report {
        /// Path to the trades file (.csv or .json)
        trades: PathBuf,

        /// Calendar year
        #[arg(short, long)]
        year: i32,

        /// Loss carried into January
        #[arg(long, default_value = "0")]
        opening_loss: Decimal,

        /// Write the report as CSV to this file
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,

        #[command(flatten)]
        costs: CostArgs,
    },
}
