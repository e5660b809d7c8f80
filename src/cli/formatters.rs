//! Output formatting module for CLI display
//!
//! Keeps presentation (Brazilian currency, tables, colours) apart from the
//! tax engine, which works on unrounded decimals only.

use colored::Colorize;
use itertools::Itertools;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use daytrade_tax::tax::annual::get_month_name;
use daytrade_tax::tax::{AnnualTaxSummary, DarfModel, TaxCalculation, TaxableTrade};

/// Format as Brazilian Real rounded to centavos: "R$ 1.234,56"
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (integer, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(".");

    format!("R$ {}{},{}", sign, grouped, cents)
}

fn signed_currency(value: Decimal) -> String {
    if value >= Decimal::ZERO {
        format_currency(value).green().to_string()
    } else {
        format_currency(value).red().to_string()
    }
}

/// Enriched trades as a table
pub fn format_trades_table(trades: &[TaxableTrade]) -> String {
    #[derive(Tabled)]
    struct TradeRow {
        #[tabled(rename = "Ticker")]
        ticker: String,
        #[tabled(rename = "Entry")]
        entry: String,
        #[tabled(rename = "Exit")]
        exit: String,
        #[tabled(rename = "DT")]
        day_trade: String,
        #[tabled(rename = "P&L")]
        pnl: String,
        #[tabled(rename = "Costs")]
        costs: String,
        #[tabled(rename = "IRRF")]
        irrf: String,
        #[tabled(rename = "Net")]
        net: String,
    }

    let rows: Vec<TradeRow> = trades
        .iter()
        .map(|t| TradeRow {
            ticker: t.trade.ticker.clone(),
            entry: t.trade.entry_date.format("%d/%m/%Y").to_string(),
            exit: t
                .trade
                .exit_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "open".to_string()),
            day_trade: (if t.is_day_trade { "yes" } else { "no" }).to_string(),
            pnl: signed_currency(t.trade.gross_pnl()),
            costs: format_currency(t.total_costs()),
            irrf: format_currency(t.irrf),
            net: signed_currency(t.net_result),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    // Right-align the money columns
    table.modify(Columns::new(4..), Alignment::right());

    table.to_string()
}

/// One month's calculation followed by its DARF
pub fn format_calculation(calc: &TaxCalculation, darf: &DarfModel) -> String {
    let mut output = format!(
        "\n{} Day-trade tax - {}/{}\n\n",
        "📊".cyan().bold(),
        get_month_name(calc.month.month()),
        calc.month.year()
    );

    let lines = [
        ("Gross result:", signed_currency(calc.gross_profit)),
        ("Costs:", format_currency(calc.costs)),
        ("Net result:", signed_currency(calc.net_result)),
        ("Taxable basis:", format_currency(calc.taxable_basis)),
        ("IRRF withheld:", format_currency(calc.irrf_deduction)),
        ("Tax due:", format_currency(calc.tax_due).yellow().to_string()),
        (
            "Loss to carry:",
            format_currency(calc.day_trade_loss_carry_forward),
        ),
    ];

    for (label, value) in lines {
        output.push_str(&format!("  {:<16} {}\n", label.bold(), value));
    }

    if calc.tax_due < Decimal::ZERO {
        output.push_str(&format!(
            "\n{} IRRF withheld exceeds the tax on the basis by {}\n",
            "ℹ".blue().bold(),
            format_currency(calc.tax_due.abs())
        ));
    }

    output.push('\n');
    if darf.amount > Decimal::ZERO {
        output.push_str(&format_darf(darf));
        output.push('\n');
    } else {
        output.push_str(&format!(
            "{} Nenhum DARF a pagar para {}\n",
            "✓".green().bold(),
            darf.month
        ));
    }

    output
}

/// DARF block for display
pub fn format_darf(darf: &DarfModel) -> String {
    format!(
        "DARF {code} - {description}\n  Período de apuração: {period}\n  Vencimento: {due_date}\n  Valor: {amount}\n",
        code = darf.code,
        description = darf.description,
        period = darf.period.format("%d/%m/%Y"),
        due_date = darf.due_date.format("%d/%m/%Y"),
        amount = format_currency(darf.amount)
    )
}

/// Annual report: monthly table, totals and the DARF list
pub fn format_annual_summary(summary: &AnnualTaxSummary) -> String {
    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Month")]
        month: String,
        #[tabled(rename = "Net")]
        net: String,
        #[tabled(rename = "Basis")]
        basis: String,
        #[tabled(rename = "IRRF")]
        irrf: String,
        #[tabled(rename = "Tax Due")]
        tax_due: String,
        #[tabled(rename = "Carry")]
        carry: String,
    }

    let mut output = format!(
        "\n{} Annual day-trade tax report - {}\n\n",
        "📊".cyan().bold(),
        summary.year
    );

    if summary.opening_loss > Decimal::ZERO {
        output.push_str(&format!(
            "{} Loss carried into January: {}\n\n",
            "📦".yellow().bold(),
            format_currency(summary.opening_loss)
        ));
    }

    let rows: Vec<MonthRow> = summary
        .monthly
        .iter()
        .map(|c| MonthRow {
            month: get_month_name(c.month.month()).to_string(),
            net: signed_currency(c.net_result),
            basis: format_currency(c.taxable_basis),
            irrf: format_currency(c.irrf_deduction),
            tax_due: format_currency(c.tax_due),
            carry: format_currency(c.accumulated_loss),
        })
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    table.modify(Columns::new(1..), Alignment::right());
    output.push_str(&table.to_string());

    output.push_str(&format!("\n\n{} Annual Totals:\n", "📈".cyan().bold()));
    output.push_str(&format!(
        "  Gross result: {}\n",
        signed_currency(summary.total_gross_profit)
    ));
    output.push_str(&format!("  Costs:        {}\n", format_currency(summary.total_costs)));
    output.push_str(&format!("  IRRF:         {}\n", format_currency(summary.total_irrf)));
    output.push_str(&format!(
        "  {}    {}\n",
        "Total Tax:".bold(),
        format_currency(summary.total_tax_due).yellow().bold()
    ));
    output.push_str(&format!(
        "  Loss to carry into {}: {}\n",
        summary.year + 1,
        format_currency(summary.closing_loss)
    ));

    if summary.darf_payments.is_empty() {
        output.push_str(&format!(
            "\n{} Nenhum DARF a pagar em {}\n",
            "✓".green().bold(),
            summary.year
        ));
    } else {
        output.push_str(&format!("\n{} DARFs:\n\n", "📋".yellow().bold()));
        for darf in &summary.darf_payments {
            output.push_str(&format_darf(darf));
            output.push('\n');
        }
    }

    output
}

/// Message for an empty trade file
pub fn format_no_trades() -> String {
    format!("{} No trades found in file\n", "ℹ".blue().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(0.5)), "R$ 0,50");
        assert_eq!(format_currency(dec!(147)), "R$ 147,00");
        assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec!(-1000)), "R$ -1.000,00");
    }

    #[test]
    fn test_format_darf_uses_brazilian_dates() {
        colored::control::set_override(false);
        let darf = DarfModel {
            code: "6015".to_string(),
            description: "Renda Variável - Day Trade".to_string(),
            month: "2023-10".parse().unwrap(),
            period: chrono::NaiveDate::from_ymd_opt(2023, 10, 31).unwrap(),
            due_date: chrono::NaiveDate::from_ymd_opt(2023, 11, 30).unwrap(),
            amount: dec!(1500),
        };

        let formatted = format_darf(&darf);
        assert!(formatted.contains("DARF 6015"));
        assert!(formatted.contains("31/10/2023"));
        assert!(formatted.contains("30/11/2023"));
        assert!(formatted.contains("R$ 1.500,00"));
    }

    #[test]
    fn test_no_trades_message() {
        assert!(format_no_trades().contains("No trades found"));
    }
}
