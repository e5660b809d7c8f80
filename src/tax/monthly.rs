use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::costs::TaxableTrade;
use super::DAY_TRADE_TAX_RATE;
use crate::models::TaxMonth;

/// Day-trade tax apportionment for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxCalculation {
    pub month: TaxMonth,
    pub gross_profit: Decimal,
    pub costs: Decimal,
    pub net_result: Decimal,
    /// Carryforward balance after this month
    pub accumulated_loss: Decimal,
    pub taxable_basis: Decimal,
    pub irrf_deduction: Decimal,
    /// Negative when withheld IRRF exceeds the tax on the basis
    pub tax_due: Decimal,
    /// Same value as `accumulated_loss`; the `previous_loss` for next month
    pub day_trade_loss_carry_forward: Decimal,
}

/// Offset a month's net result against the carried loss.
/// Returns `(taxable_basis, accumulated_loss)`.
fn offset_loss(net_result: Decimal, previous_loss: Decimal) -> (Decimal, Decimal) {
    if net_result > Decimal::ZERO {
        if previous_loss > Decimal::ZERO {
            if net_result >= previous_loss {
                (net_result - previous_loss, Decimal::ZERO)
            } else {
                (Decimal::ZERO, previous_loss - net_result)
            }
        } else {
            (net_result, Decimal::ZERO)
        }
    } else {
        (Decimal::ZERO, previous_loss + net_result.abs())
    }
}

/// Apportion one month of enriched trades into a tax calculation.
///
/// Only day trades whose exit date falls inside `month` are counted. The loss
/// carryforward is threaded explicitly: pass the previous month's
/// `day_trade_loss_carry_forward` as `previous_loss`. A negative
/// `previous_loss` is treated as zero.
pub fn calculate_monthly_tax(
    month: TaxMonth,
    trades: &[TaxableTrade],
    previous_loss: Decimal,
) -> TaxCalculation {
    let previous_loss = if previous_loss < Decimal::ZERO {
        warn!(
            "Negative previous loss {} for {}, treating as zero",
            previous_loss, month
        );
        Decimal::ZERO
    } else {
        previous_loss
    };

    let mut gross_profit = Decimal::ZERO;
    let mut costs = Decimal::ZERO;
    let mut total_irrf = Decimal::ZERO;
    let mut counted = 0usize;

    for trade in trades
        .iter()
        .filter(|t| t.is_day_trade && t.trade.exit_date.is_some_and(|d| month.contains(d)))
    {
        gross_profit += trade.trade.gross_pnl();
        costs += trade.total_costs();
        total_irrf += trade.irrf;
        counted += 1;
    }

    let net_result = gross_profit - costs;
    let (taxable_basis, accumulated_loss) = offset_loss(net_result, previous_loss);

    let tax_due = if taxable_basis > Decimal::ZERO {
        taxable_basis * DAY_TRADE_TAX_RATE - total_irrf
    } else {
        Decimal::ZERO
    };

    debug!(
        "{}: {} day trades, net {}, basis {}, carry {} -> {}, tax due {}",
        month, counted, net_result, taxable_basis, previous_loss, accumulated_loss, tax_due
    );

    TaxCalculation {
        month,
        gross_profit,
        costs,
        net_result,
        accumulated_loss,
        taxable_basis,
        irrf_deduction: total_irrf,
        tax_due,
        day_trade_loss_carry_forward: accumulated_loss,
    }
}

/// Fold the monthly calculation over every month from `from` to `to`,
/// feeding each month's carryforward into the next.
///
/// Months without day trades still yield a (zero) calculation so the chain of
/// carryforward values has no gaps.
pub fn calculate_tax_history(
    trades: &[TaxableTrade],
    from: TaxMonth,
    to: TaxMonth,
    opening_loss: Decimal,
) -> Vec<TaxCalculation> {
    TaxMonth::range(from, to)
        .scan(opening_loss, |carry, month| {
            let calc = calculate_monthly_tax(month, trades, *carry);
            *carry = calc.day_trade_loss_carry_forward;
            Some(calc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trade;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn october() -> TaxMonth {
        TaxMonth::new(2023, 10).unwrap()
    }

    fn taxable(day: NaiveDate, pnl: Decimal, costs: Decimal, irrf: Decimal) -> TaxableTrade {
        TaxableTrade {
            trade: Trade::new(day, Some(day), Some(pnl)),
            brokerage_fee: costs,
            exchange_fee: Decimal::ZERO,
            taxes: Decimal::ZERO,
            irrf,
            net_result: pnl - costs,
            is_day_trade: true,
        }
    }

    fn oct(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, d).unwrap()
    }

    #[test]
    fn test_offset_loss_rules() {
        assert_eq!(offset_loss(dec!(100), Decimal::ZERO), (dec!(100), Decimal::ZERO));
        assert_eq!(offset_loss(dec!(100), dec!(40)), (dec!(60), Decimal::ZERO));
        assert_eq!(offset_loss(dec!(100), dec!(100)), (Decimal::ZERO, Decimal::ZERO));
        assert_eq!(offset_loss(dec!(100), dec!(150)), (Decimal::ZERO, dec!(50)));
        assert_eq!(offset_loss(dec!(-30), dec!(20)), (Decimal::ZERO, dec!(50)));
        assert_eq!(offset_loss(Decimal::ZERO, dec!(20)), (Decimal::ZERO, dec!(20)));
    }

    #[test]
    fn test_month_without_trades_keeps_carry() {
        let calc = calculate_monthly_tax(october(), &[], dec!(75));
        assert_eq!(calc.net_result, Decimal::ZERO);
        assert_eq!(calc.accumulated_loss, dec!(75));
        assert_eq!(calc.tax_due, Decimal::ZERO);
    }

    #[test]
    fn test_only_day_trades_closed_in_month_count() {
        let mut swing = taxable(oct(10), dec!(1000), Decimal::ZERO, Decimal::ZERO);
        swing.is_day_trade = false;
        let september = taxable(
            NaiveDate::from_ymd_opt(2023, 9, 29).unwrap(),
            dec!(1000),
            Decimal::ZERO,
            dec!(10),
        );
        let counted = taxable(oct(2), dec!(100), Decimal::ZERO, dec!(1));

        let calc = calculate_monthly_tax(october(), &[swing, september, counted], Decimal::ZERO);
        assert_eq!(calc.gross_profit, dec!(100));
        assert_eq!(calc.irrf_deduction, dec!(1));
        assert_eq!(calc.tax_due, dec!(19));
    }

    #[test]
    fn test_irrf_can_exceed_tax() {
        // Tiny basis left after offset: 20% of 10 is 2, IRRF withheld was 10
        let trade = taxable(oct(5), dec!(1000), Decimal::ZERO, dec!(10));
        let calc = calculate_monthly_tax(october(), &[trade], dec!(990));

        assert_eq!(calc.taxable_basis, dec!(10));
        assert_eq!(calc.tax_due, dec!(-8));
    }

    #[test]
    fn test_negative_previous_loss_is_clamped() {
        let trade = taxable(oct(5), dec!(100), Decimal::ZERO, Decimal::ZERO);
        let calc = calculate_monthly_tax(october(), &[trade], dec!(-50));

        assert_eq!(calc.taxable_basis, dec!(100));
        assert_eq!(calc.accumulated_loss, Decimal::ZERO);
    }

    #[test]
    fn test_history_threads_carry_across_months() {
        let nov = NaiveDate::from_ymd_opt(2023, 11, 8).unwrap();
        let trades = vec![
            taxable(oct(3), dec!(-300), Decimal::ZERO, Decimal::ZERO),
            taxable(nov, dec!(500), Decimal::ZERO, dec!(5)),
        ];

        let history = calculate_tax_history(
            &trades,
            TaxMonth::new(2023, 9).unwrap(),
            TaxMonth::new(2023, 12).unwrap(),
            dec!(50),
        );

        assert_eq!(history.len(), 4);
        assert_eq!(history[0].accumulated_loss, dec!(50));
        assert_eq!(history[1].accumulated_loss, dec!(350));
        assert_eq!(history[2].taxable_basis, dec!(150));
        assert_eq!(history[2].tax_due, dec!(25));
        assert_eq!(history[3].accumulated_loss, Decimal::ZERO);
        assert_eq!(history[3].tax_due, Decimal::ZERO);
    }
}
