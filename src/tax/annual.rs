use rust_decimal::Decimal;
use serde::Serialize;

use super::costs::TaxableTrade;
use super::darf::{generate_darf_payments, DarfModel};
use super::monthly::{calculate_tax_history, TaxCalculation};
use crate::error::TaxError;
use crate::models::TaxMonth;

/// One year of day-trade apportionment
#[derive(Debug, Clone, Serialize)]
pub struct AnnualTaxSummary {
    pub year: i32,
    pub opening_loss: Decimal,
    pub monthly: Vec<TaxCalculation>,
    pub total_gross_profit: Decimal,
    pub total_costs: Decimal,
    pub total_net_result: Decimal,
    pub total_irrf: Decimal,
    /// Sum of the DARF amounts actually payable
    pub total_tax_due: Decimal,
    pub closing_loss: Decimal,
    pub darf_payments: Vec<DarfModel>,
}

/// Run January through December of `year` as one carryforward chain
pub fn generate_annual_summary(
    trades: &[TaxableTrade],
    year: i32,
    opening_loss: Decimal,
) -> Result<AnnualTaxSummary, TaxError> {
    let from = TaxMonth::new(year, 1)?;
    let to = TaxMonth::new(year, 12)?;
    let monthly = calculate_tax_history(trades, from, to, opening_loss);
    let darf_payments = generate_darf_payments(&monthly);

    let closing_loss = monthly
        .last()
        .map(|c| c.day_trade_loss_carry_forward)
        .unwrap_or(opening_loss);

    Ok(AnnualTaxSummary {
        year,
        opening_loss,
        total_gross_profit: monthly.iter().map(|c| c.gross_profit).sum(),
        total_costs: monthly.iter().map(|c| c.costs).sum(),
        total_net_result: monthly.iter().map(|c| c.net_result).sum(),
        total_irrf: monthly.iter().map(|c| c.irrf_deduction).sum(),
        total_tax_due: darf_payments.iter().map(|d| d.amount).sum(),
        closing_loss,
        darf_payments,
        monthly,
    })
}

/// Month name in Portuguese
pub fn get_month_name(month: u32) -> &'static str {
    match month {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => "Unknown",
    }
}

/// Money cell rounded to centavos
fn cents(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

/// Export an annual summary as CSV
pub fn export_to_csv(summary: &AnnualTaxSummary) -> String {
    let mut csv = String::new();

    csv.push_str(
        "Mês,Lucro Bruto,Custos,Resultado Líquido,Base de Cálculo,IRRF,Imposto Devido,Prejuízo a Compensar\n",
    );

    for calc in &summary.monthly {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            get_month_name(calc.month.month()),
            cents(calc.gross_profit),
            cents(calc.costs),
            cents(calc.net_result),
            cents(calc.taxable_basis),
            cents(calc.irrf_deduction),
            cents(calc.tax_due),
            cents(calc.accumulated_loss)
        ));
    }

    csv.push_str(&format!(
        "\nTOTAL ANUAL,{},{},{},,{},{},\n",
        cents(summary.total_gross_profit),
        cents(summary.total_costs),
        cents(summary.total_net_result),
        cents(summary.total_irrf),
        cents(summary.total_tax_due)
    ));

    csv.push_str(&format!(
        "\nPREJUÍZO A COMPENSAR,{}\n",
        cents(summary.closing_loss)
    ));

    csv
}
