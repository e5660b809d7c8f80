use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TaxError;

/// An executed position as supplied by the trade source.
///
/// Open positions have no `exit_date`. A missing `pnl` counts as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub ticker: String,
    pub entry_date: NaiveDate,
    #[serde(default)]
    pub exit_date: Option<NaiveDate>,
    #[serde(default)]
    pub pnl: Option<Decimal>,
}

impl Trade {
    pub fn new(entry_date: NaiveDate, exit_date: Option<NaiveDate>, pnl: Option<Decimal>) -> Self {
        Self {
            id: None,
            ticker: String::new(),
            entry_date,
            exit_date,
            pnl,
        }
    }

    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    /// Gross profit/loss with an absent value coalesced to zero
    pub fn gross_pnl(&self) -> Decimal {
        self.pnl.unwrap_or(Decimal::ZERO)
    }
}

/// A calendar month (YYYY-MM), the unit of day-trade tax apportionment.
///
/// Stored as the first day of the month. Years are limited to four digits so
/// the date helpers never leave chrono's supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaxMonth(NaiveDate);

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

impl TaxMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, TaxError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(TaxError::InvalidMonth(format!("{}-{:02}", year, month)));
        }

        NaiveDate::from_ymd_opt(year, month, 1)
            .map(TaxMonth)
            .ok_or_else(|| TaxError::InvalidMonth(format!("{}-{:02}", year, month)))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().0.pred_opt().unwrap_or(self.0)
    }

    /// The following month; December rolls into January of the next year
    pub fn next(&self) -> Self {
        TaxMonth(self.0 + Months::new(1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Every month from `from` to `to`, inclusive, in chronological order
    pub fn range(from: TaxMonth, to: TaxMonth) -> impl Iterator<Item = TaxMonth> {
        std::iter::successors(Some(from), |m| Some(m.next())).take_while(move |m| *m <= to)
    }
}

impl fmt::Display for TaxMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for TaxMonth {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TaxError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        TaxMonth::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for TaxMonth {
    type Error = TaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaxMonth> for String {
    fn from(month: TaxMonth) -> Self {
        month.to_string()
    }
}
