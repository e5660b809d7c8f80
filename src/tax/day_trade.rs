use crate::models::Trade;

/// A trade is a day trade when it was closed in the same session it was opened.
/// Open positions (no exit date) never qualify.
pub fn is_day_trade(trade: &Trade) -> bool {
    trade.exit_date == Some(trade.entry_date)
}

/// Select the day trades out of a trade collection, preserving order
pub fn identify_day_trades(trades: &[Trade]) -> Vec<&Trade> {
    trades.iter().filter(|t| is_day_trade(t)).collect()
}
