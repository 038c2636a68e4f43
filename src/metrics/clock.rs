use std::fmt;

use serde::{Serialize, Serializer};

/// Reads a `HH:MM:SS` value as seconds.
///
/// Anything with fewer than three colon-separated fields reads as zero, and
/// each field contributes only its leading digits, so `"08:30:15.000"` and
/// `"8:30:15"` both parse. Hours are not capped at 23, but a value too large
/// to hold in seconds reads as zero too.
pub fn parse_seconds(raw: &str) -> u64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() < 3 {
        return 0;
    }

    let hours = leading_number(parts[0]).checked_mul(3600);
    let minutes = leading_number(parts[1]).checked_mul(60);
    hours
        .zip(minutes)
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(leading_number(parts[2])))
        .unwrap_or(0)
}

fn leading_number(field: &str) -> u64 {
    let field = field.trim_start();
    let end = field
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(field.len());
    field[..end].parse().unwrap_or(0)
}

/// A time of day that was actually recorded.
///
/// Empty strings, malformed values and the literal `00:00:00` never become a
/// `ClockTime`; callers get `None` and the dependent metric stays zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u64);

impl ClockTime {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(parse_seconds) {
            Some(secs) if secs > 0 => Some(ClockTime(secs)),
            _ => None,
        }
    }

    /// Seconds from `earlier` to `self`, zero when `self` is not later.
    pub fn since(self, earlier: ClockTime) -> Elapsed {
        Elapsed(self.0.saturating_sub(earlier.0))
    }
}

/// A non-negative duration, rendered as total-elapsed `HH:MM:SS`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elapsed(u64);

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed(0);

    pub const fn from_secs(secs: u64) -> Self {
        Elapsed(secs)
    }

    /// Lenient parse of a stored duration; unreadable input is zero.
    pub fn parse(raw: &str) -> Self {
        Elapsed(parse_seconds(raw))
    }

    #[cfg(test)]
    pub fn as_secs(self) -> u64 {
        self.0
    }

    pub fn saturating_sub(self, other: Elapsed) -> Elapsed {
        Elapsed(self.0.saturating_sub(other.0))
    }

    /// Hours rounded to two decimals.
    pub fn hours(self) -> f64 {
        (self.0 as f64 / 3600.0 * 100.0).round() / 100.0
    }

    /// Whole minutes, rounded half away from zero.
    pub fn minutes(self) -> u64 {
        (self.0 as f64 / 60.0).round() as u64
    }
}

impl std::ops::Add for Elapsed {
    type Output = Elapsed;

    fn add(self, rhs: Elapsed) -> Elapsed {
        Elapsed(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        write!(f, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

impl Serialize for Elapsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
