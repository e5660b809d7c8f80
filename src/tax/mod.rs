// Tax module - Brazilian day-trade income tax (classification, costs, monthly
// apportionment with loss carryforward, DARF)

pub mod annual;
pub mod costs;
pub mod darf;
pub mod day_trade;
pub mod monthly;

use rust_decimal::Decimal;

/// Day-trade income tax rate on the monthly taxable basis (20%)
pub const DAY_TRADE_TAX_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// IRRF withholding on day-trade profits (1%, "dedo-duro")
pub const IRRF_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// DARF revenue code for variable income (day trade)
pub const DARF_CODE_DAY_TRADE: &str = "6015";

pub const DARF_DESCRIPTION_DAY_TRADE: &str = "Renda Variável - Day Trade";

pub use annual::{export_to_csv, generate_annual_summary, AnnualTaxSummary};
pub use costs::{
    apply_cost_override, enrich_trade, enrich_trades, recompute, CostOverride, TaxCostsConfig,
    TaxableTrade,
};
pub use darf::{calculate_darf_due_date, generate_darf_data, generate_darf_payments, DarfModel};
pub use day_trade::{identify_day_trades, is_day_trade};
pub use monthly::{calculate_monthly_tax, calculate_tax_history, TaxCalculation};
