use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::metrics::calculator::{RawTimes, TimeMetrics, compute};
use crate::metrics::late_remark::{LateRemark, Remarkable};

/// Column list for reading attendance rows joined with the employee name.
///
/// TIME columns come back as text so durations past 24h survive decoding.
pub const RECORD_SELECT: &str = r#"
    SELECT
        l.LogID,
        l.EmployeeID,
        e.EmployeeName,
        l.AttendanceDate,
        l.Shift,
        CAST(l.ScheduledIn AS CHAR) AS ScheduledIn,
        CAST(l.ScheduledOut AS CHAR) AS ScheduledOut,
        CAST(l.ActualIn AS CHAR) AS ActualIn,
        CAST(l.ActualOut AS CHAR) AS ActualOut,
        l.PunchRecords,
        l.Status
    FROM AttendanceLog l
    JOIN Employees e ON l.EmployeeID = e.EmployeeID
"#;

/// Raw, stored fields of one attendance day.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct AttendanceRow {
    #[serde(rename = "LogID")]
    #[sqlx(rename = "LogID")]
    #[schema(example = 42)]
    pub log_id: i64,

    #[serde(rename = "EmployeeID")]
    #[sqlx(rename = "EmployeeID")]
    #[schema(example = "1001")]
    pub employee_id: String,

    #[schema(example = "Jane Doe")]
    pub employee_name: String,

    #[schema(example = "2024-03-04", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,

    #[schema(example = "General", nullable = true)]
    pub shift: Option<String>,

    #[schema(example = "09:00:00", nullable = true)]
    pub scheduled_in: Option<String>,

    #[schema(example = "18:00:00", nullable = true)]
    pub scheduled_out: Option<String>,

    #[schema(example = "08:50:00", nullable = true)]
    pub actual_in: Option<String>,

    #[schema(example = "18:00:00", nullable = true)]
    pub actual_out: Option<String>,

    #[schema(example = "08:50:00:in,12:00:00:out,13:30:00:in,18:00:00:out", nullable = true)]
    pub punch_records: Option<String>,

    #[schema(example = "Present", nullable = true)]
    pub status: Option<String>,
}

impl AttendanceRow {
    pub fn raw_times(&self) -> RawTimes<'_> {
        RawTimes {
            scheduled_in: self.scheduled_in.as_deref(),
            scheduled_out: self.scheduled_out.as_deref(),
            actual_in: self.actual_in.as_deref(),
            actual_out: self.actual_out.as_deref(),
            punch_records: self.punch_records.as_deref(),
        }
    }
}

/// A stored day with its metrics recomputed and its monthly late remark.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceRecord {
    #[serde(flatten)]
    pub row: AttendanceRow,

    #[serde(flatten)]
    pub metrics: TimeMetrics,

    #[serde(rename = "LateRemark")]
    #[schema(example = "1st Late")]
    pub late_remark: String,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        let metrics = compute(&row.raw_times());
        AttendanceRecord {
            row,
            metrics,
            late_remark: String::new(),
        }
    }
}

impl Remarkable for AttendanceRecord {
    fn employee_id(&self) -> &str {
        &self.row.employee_id
    }

    fn attendance_date(&self) -> NaiveDate {
        self.row.attendance_date
    }

    fn set_late_remark(&mut self, remark: Option<LateRemark>) {
        self.late_remark = remark.map(|r| r.to_string()).unwrap_or_default();
    }
}

/// Trims a raw time field, mapping blanks to `NULL`.
pub fn stored_time(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}
