use chrono::NaiveDate;
use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::QueryAs;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Date(NaiveDate),
}

/// ===============================
/// Dynamic WHERE clause
/// ===============================
#[derive(Debug, Clone, Default)]
pub struct SqlFilter {
    conditions: Vec<String>,
    values: Vec<SqlValue>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a condition; `values` must match its placeholders in order.
    pub fn push(&mut self, condition: impl Into<String>, values: impl IntoIterator<Item = SqlValue>) {
        self.conditions.push(condition.into());
        self.values.extend(values);
    }

    /// Adds a condition without placeholders.
    pub fn push_raw(&mut self, condition: impl Into<String>) {
        self.conditions.push(condition.into());
    }

    /// `WHERE a AND b`, or empty when there are no conditions.
    pub fn where_clause(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.conditions.join(" AND "))
        }
    }

    /// Binds every value, in order, onto `query`.
    pub fn bind_to<'q, O>(
        &self,
        mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    ) -> QueryAs<'q, MySql, O, MySqlArguments> {
        for value in &self.values {
            query = match value.clone() {
                SqlValue::String(v) => query.bind(v),
                SqlValue::Date(v) => query.bind(v),
            };
        }
        query
    }
}

/// ===============================
/// Attendance status filters
/// ===============================
pub const PRESENT_CONDITION: &str = "l.Status LIKE '%Present%'";
pub const ABSENT_CONDITION: &str = "l.Status = 'Absent'";
pub const LEAVE_OR_OFF_CONDITION: &str =
    "(l.Status = 'Leave' OR l.Status = 'WeeklyOff' OR l.Status LIKE '%Off%')";
/// Punch log with an odd number of comma-separated tokens.
///
/// Counts commas, so empty tokens (`a,,b`) count here while
/// `has_missed_punch` skips them; a row can be listed by this filter and
/// still update with a `success` status.
pub const MISSED_PUNCH_CONDITION: &str = "(l.PunchRecords IS NOT NULL AND l.PunchRecords != '' \
     AND (CHAR_LENGTH(l.PunchRecords) - CHAR_LENGTH(REPLACE(l.PunchRecords, ',', '')) + 1) % 2 != 0)";
pub const LONG_BREAK_CONDITION: &str =
    "(l.AdjustedBreakResult IS NOT NULL AND TIME_TO_SEC(l.AdjustedBreakResult) > 3600)";
