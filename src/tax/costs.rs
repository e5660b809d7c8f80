use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::day_trade::is_day_trade;
use super::IRRF_RATE;
use crate::models::Trade;

/// Default cost policy applied to every trade of a calculation run.
///
/// `default_taxes_pct` is a percentage of the brokerage fee (service tax).
/// `default_exchange_fee_pct` is carried for the cost-review editor but is not
/// applied here: see [`enrich_trade`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TaxCostsConfig {
    pub default_brokerage_fee: Decimal,
    pub default_exchange_fee_pct: Decimal,
    pub default_taxes_pct: Decimal,
}

/// A trade with its costs, withholding and net result attached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableTrade {
    #[serde(flatten)]
    pub trade: Trade,
    #[serde(default)]
    pub brokerage_fee: Decimal,
    #[serde(default)]
    pub exchange_fee: Decimal,
    #[serde(default)]
    pub taxes: Decimal,
    #[serde(default)]
    pub irrf: Decimal,
    #[serde(default)]
    pub net_result: Decimal,
    pub is_day_trade: bool,
}

impl TaxableTrade {
    pub fn total_costs(&self) -> Decimal {
        self.brokerage_fee + self.exchange_fee + self.taxes
    }
}

/// Per-trade cost edit coming from the cost-review editor. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOverride {
    pub brokerage_fee: Option<Decimal>,
    pub exchange_fee: Option<Decimal>,
    pub taxes: Option<Decimal>,
}

/// Attach default costs and IRRF withholding to a single trade.
///
/// The exchange fee is always zero here. It depends on traded volume and the
/// instrument's contract multiplier, neither of which a `Trade` carries, so it
/// is left for the cost-review editor to fill in per trade.
pub fn enrich_trade(trade: &Trade, config: &TaxCostsConfig) -> TaxableTrade {
    let day_trade = is_day_trade(trade);
    let brokerage_fee = config.default_brokerage_fee;
    let taxes = brokerage_fee * config.default_taxes_pct / Decimal::ONE_HUNDRED;
    let gross = trade.gross_pnl();

    let irrf = if day_trade && gross > Decimal::ZERO {
        gross * IRRF_RATE
    } else {
        Decimal::ZERO
    };

    recompute(&TaxableTrade {
        trade: trade.clone(),
        brokerage_fee,
        exchange_fee: Decimal::ZERO,
        taxes,
        irrf,
        net_result: Decimal::ZERO,
        is_day_trade: day_trade,
    })
}

/// Enrich a batch of trades; same order and length as the input
pub fn enrich_trades(trades: &[Trade], config: &TaxCostsConfig) -> Vec<TaxableTrade> {
    trades.iter().map(|t| enrich_trade(t, config)).collect()
}

/// Re-derive `net_result` from the trade's gross P&L and its current costs.
/// Must be called after any cost edit.
pub fn recompute(trade: &TaxableTrade) -> TaxableTrade {
    TaxableTrade {
        net_result: trade.trade.gross_pnl() - trade.total_costs(),
        ..trade.clone()
    }
}

/// Apply an editor's cost changes and return the recomputed trade.
/// Negative costs are treated as zero.
pub fn apply_cost_override(trade: &TaxableTrade, edit: &CostOverride) -> TaxableTrade {
    let non_negative = |v: Decimal| v.max(Decimal::ZERO);

    recompute(&TaxableTrade {
        brokerage_fee: edit.brokerage_fee.map(non_negative).unwrap_or(trade.brokerage_fee),
        exchange_fee: edit.exchange_fee.map(non_negative).unwrap_or(trade.exchange_fee),
        taxes: edit.taxes.map(non_negative).unwrap_or(trade.taxes),
        ..trade.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 16).unwrap()
    }

    fn config(brokerage: Decimal, taxes_pct: Decimal) -> TaxCostsConfig {
        TaxCostsConfig {
            default_brokerage_fee: brokerage,
            default_exchange_fee_pct: Decimal::ZERO,
            default_taxes_pct: taxes_pct,
        }
    }

    #[test]
    fn test_profitable_day_trade_withholds_irrf() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(500)));
        let taxable = enrich_trade(&trade, &config(dec!(1.0), Decimal::ZERO));

        assert!(taxable.is_day_trade);
        assert_eq!(taxable.irrf, dec!(5.0));
        assert_eq!(taxable.net_result, dec!(499.0));
    }

    #[test]
    fn test_losing_day_trade_has_no_irrf() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(-200)));
        let taxable = enrich_trade(&trade, &config(dec!(1.0), Decimal::ZERO));

        assert_eq!(taxable.irrf, Decimal::ZERO);
        assert_eq!(taxable.net_result, dec!(-201.0));
    }

    #[test]
    fn test_swing_trade_profit_has_no_irrf() {
        let exit = NaiveDate::from_ymd_opt(2023, 10, 20).unwrap();
        let trade = Trade::new(day(), Some(exit), Some(dec!(300)));
        let taxable = enrich_trade(&trade, &config(dec!(2), Decimal::ZERO));

        assert!(!taxable.is_day_trade);
        assert_eq!(taxable.irrf, Decimal::ZERO);
        assert_eq!(taxable.net_result, dec!(298));
    }

    #[test]
    fn test_service_tax_is_percentage_of_brokerage() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(100)));
        let taxable = enrich_trade(&trade, &config(dec!(10), dec!(5)));

        assert_eq!(taxable.taxes, dec!(0.5));
        assert_eq!(taxable.exchange_fee, Decimal::ZERO);
        assert_eq!(taxable.total_costs(), dec!(10.5));
        assert_eq!(taxable.net_result, dec!(89.5));
    }

    #[test]
    fn test_missing_pnl_counts_as_zero() {
        let trade = Trade::new(day(), Some(day()), None);
        let taxable = enrich_trade(&trade, &config(dec!(1), Decimal::ZERO));

        assert_eq!(taxable.irrf, Decimal::ZERO);
        assert_eq!(taxable.net_result, dec!(-1));
    }

    #[test]
    fn test_enrich_trades_keeps_order_and_length() {
        let trades = vec![
            Trade::new(day(), Some(day()), Some(dec!(10))).with_ticker("A"),
            Trade::new(day(), None, None).with_ticker("B"),
            Trade::new(day(), Some(day()), Some(dec!(-10))).with_ticker("C"),
        ];
        let enriched = enrich_trades(&trades, &TaxCostsConfig::default());

        assert_eq!(enriched.len(), 3);
        let tickers: Vec<&str> = enriched.iter().map(|t| t.trade.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_cost_override_recomputes_net_result() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(1000)));
        let taxable = enrich_trade(&trade, &config(dec!(1), Decimal::ZERO));

        let edited = apply_cost_override(
            &taxable,
            &CostOverride {
                exchange_fee: Some(dec!(4.25)),
                ..Default::default()
            },
        );

        assert_eq!(edited.brokerage_fee, dec!(1));
        assert_eq!(edited.exchange_fee, dec!(4.25));
        assert_eq!(edited.net_result, dec!(994.75));
        // Original value is left untouched
        assert_eq!(taxable.net_result, dec!(999));
    }

    #[test]
    fn test_cost_override_clamps_negative_costs() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(50)));
        let taxable = enrich_trade(&trade, &TaxCostsConfig::default());

        let edited = apply_cost_override(
            &taxable,
            &CostOverride {
                brokerage_fee: Some(dec!(-3)),
                ..Default::default()
            },
        );
        assert_eq!(edited.brokerage_fee, Decimal::ZERO);
        assert_eq!(edited.net_result, dec!(50));
    }

    #[test]
    fn test_recompute_after_direct_field_edit() {
        let trade = Trade::new(day(), Some(day()), Some(dec!(200)));
        let mut taxable = enrich_trade(&trade, &TaxCostsConfig::default());
        taxable.taxes = dec!(2);

        assert_eq!(recompute(&taxable).net_result, dec!(198));
    }
}
