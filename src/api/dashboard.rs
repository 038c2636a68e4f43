use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::metrics::calendar::{MonthWindow, is_sunday};
use crate::metrics::clock::Elapsed;
use crate::metrics::late_remark::{LateByEntry, remark_ledger};
use crate::utils::db_utils::{
    ABSENT_CONDITION, LEAVE_OR_OFF_CONDITION, LONG_BREAK_CONDITION, MISSED_PUNCH_CONDITION,
    PRESENT_CONDITION, SqlFilter, SqlValue,
};

const LOG_JOIN: &str = "FROM AttendanceLog l JOIN Employees e ON l.EmployeeID = e.EmployeeID";
const BREAK_ABUSE_LIMIT: i64 = 5;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct MonthQuery {
    /// Month as YYYY-MM, defaults to the current month
    pub month: Option<String>,
    #[serde(rename = "employeeID")]
    pub employee_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_employees: i64,
    pub present: i64,
    pub absent: i64,
    pub leave_or_off: i64,
    pub missed_punches: i64,
    #[schema(example = "03:25:00")]
    pub total_late_by: String,
    #[schema(example = "12:40:00")]
    pub total_adjusted_overtime: String,
    pub long_adjusted_breaks: i64,
    pub late_rule_action_count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct DashboardStatsResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct DailyCounts {
    #[serde(rename = "AttendanceDate")]
    #[sqlx(rename = "AttendanceDate")]
    #[schema(example = "2024-03-04", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,
    pub present: i64,
    pub absent: i64,
    #[serde(rename = "leaveOrOff")]
    #[sqlx(rename = "leaveOrOff")]
    pub leave_or_off: i64,
}

#[derive(Serialize, ToSchema)]
pub struct MonthlyAttendanceResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<DailyCounts>,
}

#[derive(Debug, FromRow)]
pub struct DayDurationsRow {
    #[sqlx(rename = "AttendanceDate")]
    pub attendance_date: NaiveDate,
    #[sqlx(rename = "NetWorkDuration")]
    pub net_work_duration: Option<String>,
    #[sqlx(rename = "AdjustedOvertime")]
    pub adjusted_overtime: Option<String>,
    #[sqlx(rename = "ActualBreak")]
    pub actual_break: Option<String>,
    #[sqlx(rename = "EarlyByIn")]
    pub early_by_in: Option<String>,
    #[sqlx(rename = "LateByOut")]
    pub late_by_out: Option<String>,
    #[sqlx(rename = "LateBy")]
    pub late_by: Option<String>,
    #[sqlx(rename = "EarlyGoingBy")]
    pub early_going_by: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    #[serde(rename = "AttendanceDate")]
    #[schema(example = "2024-03-04", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,
    pub work_hours: f64,
    pub ot_hours: f64,
    pub break_hours: f64,
    pub early_in_minutes: u64,
    pub late_out_minutes: u64,
    pub late_by_minutes: u64,
    pub early_going_by_minutes: u64,
}

impl From<DayDurationsRow> for DaySummary {
    fn from(row: DayDurationsRow) -> Self {
        let read = |raw: &Option<String>| raw.as_deref().map(Elapsed::parse).unwrap_or_default();
        DaySummary {
            attendance_date: row.attendance_date,
            work_hours: read(&row.net_work_duration).hours(),
            ot_hours: read(&row.adjusted_overtime).hours(),
            break_hours: read(&row.actual_break).hours(),
            early_in_minutes: read(&row.early_by_in).minutes(),
            late_out_minutes: read(&row.late_by_out).minutes(),
            late_by_minutes: read(&row.late_by).minutes(),
            early_going_by_minutes: read(&row.early_going_by).minutes(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeSummaryResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<DaySummary>,
}

#[derive(Debug, FromRow)]
pub struct BreakTotalsRow {
    #[sqlx(rename = "EmployeeName")]
    pub employee_name: String,
    #[sqlx(rename = "totalAdjustedBreakSeconds")]
    pub total_adjusted_break_seconds: i64,
    #[sqlx(rename = "totalDays")]
    pub total_days: i64,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct BreakAbuse {
    #[serde(rename = "EmployeeName")]
    pub employee_name: String,
    #[serde(rename = "totalAdjustedBreakMinutes")]
    pub total_adjusted_break_minutes: i64,
    #[serde(rename = "avgBreakMinutes")]
    pub avg_break_minutes: i64,
}

impl From<BreakTotalsRow> for BreakAbuse {
    fn from(row: BreakTotalsRow) -> Self {
        let total_minutes = (row.total_adjusted_break_seconds as f64 / 60.0).round() as i64;
        let avg_break_minutes = if row.total_days > 0 {
            (total_minutes as f64 / row.total_days as f64).round() as i64
        } else {
            0
        };
        BreakAbuse {
            employee_name: row.employee_name,
            total_adjusted_break_minutes: total_minutes,
            avg_break_minutes,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct BreakAbuseResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<BreakAbuse>,
}

/// The requested month, or the current one when absent.
pub fn resolve_month(raw: Option<&str>, today: NaiveDate) -> Result<MonthWindow, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(MonthWindow::of(today)),
        Some(month) => MonthWindow::parse_month(month)
            .ok_or_else(|| ApiError::bad_request("Invalid month: expected YYYY-MM")),
    }
}

/// One entry per day of the month; days without rows are zero-filled, except
/// empty Sundays which are left out.
pub fn fill_month(window: MonthWindow, rows: Vec<DailyCounts>) -> Vec<DailyCounts> {
    let mut by_date: HashMap<NaiveDate, DailyCounts> =
        rows.into_iter().map(|r| (r.attendance_date, r)).collect();

    window
        .days()
        .filter_map(|day| match by_date.remove(&day) {
            Some(counts) => Some(counts),
            None if is_sunday(day) => None,
            None => Some(DailyCounts {
                attendance_date: day,
                present: 0,
                absent: 0,
                leave_or_off: 0,
            }),
        })
        .collect()
}

fn month_filter(window: MonthWindow, employee_id: Option<&str>) -> SqlFilter {
    let mut filter = SqlFilter::new();
    filter.push(
        "l.AttendanceDate BETWEEN ? AND ?",
        [SqlValue::Date(window.start), SqlValue::Date(window.end)],
    );
    if let Some(employee_id) = employee_id {
        filter.push("l.EmployeeID = ?", [SqlValue::String(employee_id.to_string())]);
    }
    filter
}

/// Runs `SELECT <expr> FROM ... WHERE <filter> [AND <extra>]` for a single integer.
async fn scalar(
    pool: &MySqlPool,
    expr: &str,
    filter: &SqlFilter,
    extra: Option<&str>,
) -> Result<i64, ApiError> {
    let mut filter = filter.clone();
    if let Some(condition) = extra {
        filter.push_raw(condition);
    }
    let sql = format!("SELECT {} {} {}", expr, LOG_JOIN, filter.where_clause());
    debug!(sql = %sql, "Dashboard aggregate");

    let (value,) = filter
        .bind_to(sqlx::query_as::<_, (i64,)>(&sql))
        .fetch_one(pool)
        .await
        .map_err(ApiError::database("Failed to compute dashboard stats"))?;
    Ok(value)
}

/// Monthly dashboard counters
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    params(MonthQuery),
    responses(
        (status = 200, description = "Counters for the month", body = DashboardStatsResponse),
        (status = 400, description = "Malformed month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn dashboard_stats(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    let window = resolve_month(query.month.as_deref(), Local::now().date_naive())?;
    let employee_id = query.employee_id.as_deref().filter(|s| !s.is_empty());
    let filter = month_filter(window, employee_id);
    let pool = pool.get_ref();

    let total_employees = match employee_id {
        Some(_) => 1,
        None => {
            let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM Employees")
                .fetch_one(pool)
                .await
                .map_err(ApiError::database("Failed to count employees"))?;
            count
        }
    };

    let count = "COUNT(*)";
    let present = scalar(pool, count, &filter, Some(PRESENT_CONDITION)).await?;
    let absent = scalar(pool, count, &filter, Some(ABSENT_CONDITION)).await?;
    let leave_or_off = scalar(pool, count, &filter, Some(LEAVE_OR_OFF_CONDITION)).await?;
    let missed_punches = scalar(pool, count, &filter, Some(MISSED_PUNCH_CONDITION)).await?;
    let long_adjusted_breaks = scalar(pool, count, &filter, Some(LONG_BREAK_CONDITION)).await?;
    let total_late_by = scalar(
        pool,
        "CAST(COALESCE(SUM(TIME_TO_SEC(l.LateBy)), 0) AS SIGNED)",
        &filter,
        None,
    )
    .await?;
    let total_adjusted_overtime = scalar(
        pool,
        "CAST(COALESCE(SUM(TIME_TO_SEC(l.AdjustedOvertime)), 0) AS SIGNED)",
        &filter,
        None,
    )
    .await?;

    let sql = format!(
        "SELECT l.EmployeeID, l.AttendanceDate, CAST(l.LateBy AS CHAR) AS LateBy {} {}",
        LOG_JOIN,
        filter.where_clause()
    );
    let entries = filter
        .bind_to(sqlx::query_as::<_, LateByEntry>(&sql))
        .fetch_all(pool)
        .await
        .map_err(ApiError::database("Failed to classify late remarks"))?;
    let late_rule_action_count = remark_ledger(&entries).len();

    let as_duration = |secs: i64| Elapsed::from_secs(secs.max(0) as u64).to_string();

    Ok(HttpResponse::Ok().json(DashboardStatsResponse {
        status: "success",
        stats: DashboardStats {
            total_employees,
            present,
            absent,
            leave_or_off,
            missed_punches,
            total_late_by: as_duration(total_late_by),
            total_adjusted_overtime: as_duration(total_adjusted_overtime),
            long_adjusted_breaks,
            late_rule_action_count,
        },
    }))
}

/// Daily presence counts for a month
#[utoipa::path(
    get,
    path = "/api/dashboard/monthly",
    params(MonthQuery),
    responses(
        (status = 200, description = "One entry per day", body = MonthlyAttendanceResponse),
        (status = 400, description = "Malformed month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn monthly_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    let window = resolve_month(query.month.as_deref(), Local::now().date_naive())?;

    let rows = sqlx::query_as::<_, DailyCounts>(
        r#"
        SELECT
            AttendanceDate,
            CAST(SUM(CASE WHEN Status LIKE '%Present%' THEN 1 ELSE 0 END) AS SIGNED) AS present,
            CAST(SUM(CASE WHEN Status = 'Absent' THEN 1 ELSE 0 END) AS SIGNED) AS absent,
            CAST(SUM(CASE WHEN Status = 'Leave' OR Status = 'WeeklyOff' OR Status LIKE '%Off%'
                THEN 1 ELSE 0 END) AS SIGNED) AS leaveOrOff
        FROM AttendanceLog
        WHERE AttendanceDate BETWEEN ? AND ?
        GROUP BY AttendanceDate
        ORDER BY AttendanceDate ASC
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to fetch monthly attendance"))?;

    Ok(HttpResponse::Ok().json(MonthlyAttendanceResponse {
        status: "success",
        data: fill_month(window, rows),
    }))
}

/// Per-day hours and minutes for one employee
#[utoipa::path(
    get,
    path = "/api/dashboard/employee-summary",
    params(MonthQuery),
    responses(
        (status = 200, description = "One entry per stored day", body = EmployeeSummaryResponse),
        (status = 400, description = "Missing employee or malformed month", body = Object, example = json!({
            "status": "error",
            "message": "Employee ID is required."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn employee_summary(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    let Some(employee_id) = query.employee_id.as_deref().filter(|s| !s.is_empty()) else {
        return Err(ApiError::bad_request("Employee ID is required."));
    };
    let window = resolve_month(query.month.as_deref(), Local::now().date_naive())?;

    let rows = sqlx::query_as::<_, DayDurationsRow>(
        r#"
        SELECT
            AttendanceDate,
            CAST(NetWorkDuration AS CHAR) AS NetWorkDuration,
            CAST(AdjustedOvertime AS CHAR) AS AdjustedOvertime,
            CAST(ActualBreak AS CHAR) AS ActualBreak,
            CAST(EarlyByIn AS CHAR) AS EarlyByIn,
            CAST(LateByOut AS CHAR) AS LateByOut,
            CAST(LateBy AS CHAR) AS LateBy,
            CAST(EarlyGoingBy AS CHAR) AS EarlyGoingBy
        FROM AttendanceLog
        WHERE EmployeeID = ?
        AND AttendanceDate BETWEEN ? AND ?
        ORDER BY AttendanceDate ASC
        "#,
    )
    .bind(employee_id)
    .bind(window.start)
    .bind(window.end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to fetch employee summary"))?;

    Ok(HttpResponse::Ok().json(EmployeeSummaryResponse {
        status: "success",
        data: rows.into_iter().map(DaySummary::from).collect(),
    }))
}

/// Employees with the most adjusted break time in a month
#[utoipa::path(
    get,
    path = "/api/dashboard/break-abuse",
    params(MonthQuery),
    responses(
        (status = 200, description = "Top five by adjusted break", body = BreakAbuseResponse),
        (status = 400, description = "Malformed month"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Dashboard"
)]
pub async fn break_abuse(
    pool: web::Data<MySqlPool>,
    query: web::Query<MonthQuery>,
) -> Result<HttpResponse, ApiError> {
    let window = resolve_month(query.month.as_deref(), Local::now().date_naive())?;

    let rows = sqlx::query_as::<_, BreakTotalsRow>(
        r#"
        SELECT
            e.EmployeeName,
            e.EmployeeID,
            CAST(COALESCE(SUM(TIME_TO_SEC(l.AdjustedBreakResult)), 0) AS SIGNED) AS totalAdjustedBreakSeconds,
            COUNT(l.LogID) AS totalDays
        FROM AttendanceLog l
        JOIN Employees e ON l.EmployeeID = e.EmployeeID
        WHERE l.AttendanceDate BETWEEN ? AND ?
        AND l.Status LIKE '%Present%'
        GROUP BY e.EmployeeID, e.EmployeeName
        ORDER BY totalAdjustedBreakSeconds DESC
        LIMIT ?
        "#,
    )
    .bind(window.start)
    .bind(window.end)
    .bind(BREAK_ABUSE_LIMIT)
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to fetch break statistics"))?;

    Ok(HttpResponse::Ok().json(BreakAbuseResponse {
        status: "success",
        data: rows.into_iter().map(BreakAbuse::from).collect(),
    }))
}
