pub mod indexer;
pub mod months;

pub use indexer::FomcCalendar;
pub use months::ContractMonth;

use chrono::NaiveDate;

/// Parses an ISO-8601 calendar date. Accepts a bare `YYYY-MM-DD` or a
/// datetime whose date part is ISO (`YYYY-MM-DD HH:MM:SS`, RFC 3339).
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            chrono::DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}
