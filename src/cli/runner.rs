use anyhow::{Context, Result};
use colored::Colorize;
use rust_decimal::Decimal;
use std::fs;
use std::path::Path;
use tracing::info;

use daytrade_tax::config::AppConfig;
use daytrade_tax::importers::load_trades;
use daytrade_tax::models::TaxMonth;
use daytrade_tax::tax::{self, TaxableTrade};

use super::formatters;
use super::{Cli, Commands, CostArgs};

/// Route a parsed command line to its handler
pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Enrich {
            trades,
            day_trades_only,
            costs,
        } => {
            let enriched = load_and_enrich(&trades, &config, &costs)?;
            let shown: Vec<TaxableTrade> = enriched
                .into_iter()
                .filter(|t| !day_trades_only || t.is_day_trade)
                .collect();
            dispatch_enrich(&shown, cli.json)
        }

        Commands::Calculate {
            trades,
            month,
            previous_loss,
            costs,
        } => {
            let enriched = load_and_enrich(&trades, &config, &costs)?;
            dispatch_calculate(&enriched, month, previous_loss, cli.json)
        }

        Commands::Report {
            trades,
            year,
            opening_loss,
            export,
            costs,
        } => {
            let enriched = load_and_enrich(&trades, &config, &costs)?;
            dispatch_report(&enriched, year, opening_loss, export.as_deref(), cli.json)
        }
    }
}

fn load_and_enrich(path: &Path, config: &AppConfig, overrides: &CostArgs) -> Result<Vec<TaxableTrade>> {
    let trades = load_trades(path)
        .with_context(|| format!("Failed to load trades from {}", path.display()))?;
    let costs = overrides.apply(config.costs.clone());

    Ok(tax::enrich_trades(&trades, &costs))
}

fn dispatch_enrich(trades: &[TaxableTrade], json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(trades)?);
        return Ok(());
    }

    if trades.is_empty() {
        print!("{}", formatters::format_no_trades());
        return Ok(());
    }

    println!("{}", formatters::format_trades_table(trades));
    Ok(())
}

fn dispatch_calculate(
    trades: &[TaxableTrade],
    month: TaxMonth,
    previous_loss: Decimal,
    json_output: bool,
) -> Result<()> {
    info!("Calculating day-trade tax for {}", month);

    let calculation = tax::calculate_monthly_tax(month, trades, previous_loss);
    let darf = tax::generate_darf_data(&calculation);

    if json_output {
        let payload = serde_json::json!({
            "calculation": calculation,
            "darf": darf,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print!("{}", formatters::format_calculation(&calculation, &darf));
    Ok(())
}

fn dispatch_report(
    trades: &[TaxableTrade],
    year: i32,
    opening_loss: Decimal,
    export: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    info!("Generating annual day-trade report for {}", year);

    let summary = tax::generate_annual_summary(trades, year, opening_loss)?;

    if let Some(path) = export {
        fs::write(path, tax::export_to_csv(&summary))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!("Report exported to {:?}", path);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", formatters::format_annual_summary(&summary));
    if let Some(path) = export {
        println!("{} Report exported to: {}", "✓".green().bold(), path.display());
    }

    Ok(())
}
