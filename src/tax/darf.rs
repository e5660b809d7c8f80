use chrono::{Datelike, Days, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::monthly::TaxCalculation;
use super::{DARF_CODE_DAY_TRADE, DARF_DESCRIPTION_DAY_TRADE};
use crate::models::TaxMonth;

/// DARF payment slip derived from a monthly calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DarfModel {
    pub code: String,
    pub description: String,
    pub month: TaxMonth,
    /// Last calendar day of the taxed month
    pub period: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
}

/// Derive the DARF slip for a calculation. Credits (negative tax due) yield a
/// zero amount.
pub fn generate_darf_data(calculation: &TaxCalculation) -> DarfModel {
    DarfModel {
        code: DARF_CODE_DAY_TRADE.to_string(),
        description: DARF_DESCRIPTION_DAY_TRADE.to_string(),
        month: calculation.month,
        period: calculation.month.last_day(),
        due_date: calculate_darf_due_date(calculation.month),
        amount: calculation.tax_due.max(Decimal::ZERO),
    }
}

/// DARF slips for every calculation that has something to pay
pub fn generate_darf_payments(calculations: &[TaxCalculation]) -> Vec<DarfModel> {
    calculations
        .iter()
        .map(generate_darf_data)
        .filter(|darf| darf.amount > Decimal::ZERO)
        .collect()
}

/// Tax for a month is due on the last business day of the following month.
/// Only weekends are skipped; there is no holiday calendar.
pub fn calculate_darf_due_date(month: TaxMonth) -> NaiveDate {
    last_business_day(month.next().last_day())
}

fn last_business_day(date: NaiveDate) -> NaiveDate {
    let back = match date.weekday() {
        Weekday::Sat => 1,
        Weekday::Sun => 2,
        _ => 0,
    };
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}
