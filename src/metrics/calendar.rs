use chrono::{Datelike, NaiveDate, Weekday};

/// An inclusive run of whole calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthWindow {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self::spanning(date, date)
    }

    /// First day of the earlier date's month through the last day of the
    /// later date's month.
    pub fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        MonthWindow {
            start: first_of_month(from),
            end: last_of_month(to),
        }
    }

    /// Parses a `YYYY-MM` month.
    pub fn parse_month(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
            .ok()
            .map(Self::of)
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt()).unwrap_or(date)
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}
