use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

/// CME month codes for Fed Funds futures, January through December.
pub const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// Globex root for 30-day Fed Funds futures.
pub const CONTRACT_ROOT: &str = "ZQ";

/// A calendar month, stored as its first day. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContractMonth(NaiveDate);

impl ContractMonth {
    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    #[inline]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    #[inline]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0 + Months::new(1) - Days::new(1)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn succ(&self) -> Self {
        Self(self.0 + Months::new(1))
    }

    pub fn pred(&self) -> Self {
        Self(self.0 - Months::new(1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    #[inline]
    pub fn month_code(&self) -> char {
        MONTH_CODES[self.month0()]
    }

    /// Contract symbol in Globex format, e.g. `ZQH23` for March 2023.
    pub fn symbol(&self) -> String {
        format!("{CONTRACT_ROOT}{}{:02}", self.month_code(), self.year().rem_euclid(100))
    }

    /// Inverse of [`symbol`](Self::symbol). Two-digit years map into 2000-2099.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let rest = symbol.strip_prefix(CONTRACT_ROOT)?;
        let mut chars = rest.chars();
        let code = chars.next()?;
        let digits = chars.as_str();
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let month = MONTH_CODES.iter().position(|c| *c == code)? as u32 + 1;
        let year = 2000 + digits.parse::<i32>().ok()?;
        Self::new(year, month)
    }

    #[inline]
    fn month0(&self) -> usize {
        self.0.month0() as usize
    }
}

impl fmt::Display for ContractMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl serde::Serialize for ContractMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
