use std::collections::HashSet;

use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::metrics::calculator::{RawTimes, compute};
use crate::metrics::calendar::{first_of_month, last_of_month};
use crate::metrics::late_remark::annotate_late_remarks;
use crate::metrics::punch::has_missed_punch;
use crate::model::attendance::{AttendanceRecord, AttendanceRow, RECORD_SELECT, stored_time};
use crate::utils::db_utils::{
    ABSENT_CONDITION, LEAVE_OR_OFF_CONDITION, LONG_BREAK_CONDITION, MISSED_PUNCH_CONDITION,
    PRESENT_CONDITION, SqlFilter, SqlValue,
};
use crate::utils::employee_cache;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 500;

/// One raw day as produced by the attendance device export.
///
/// Client-side totals (`workDur`, `ot`, `totDur`, `lateBy`, `earlyGoingBy`)
/// may be present but are ignored; every derived field is recomputed.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRecord {
    #[serde(rename = "eCode")]
    #[schema(example = "1001")]
    pub e_code: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "2024-03-04", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[serde(default)]
    #[schema(example = "General")]
    pub shift: Option<String>,
    #[serde(rename = "sInTime", default)]
    #[schema(example = "09:00:00")]
    pub s_in_time: Option<String>,
    #[serde(rename = "sOutTime", default)]
    #[schema(example = "18:00:00")]
    pub s_out_time: Option<String>,
    #[serde(rename = "aInTime", default)]
    #[schema(example = "08:50:00")]
    pub a_in_time: Option<String>,
    #[serde(rename = "aOutTime", default)]
    #[schema(example = "18:00:00")]
    pub a_out_time: Option<String>,
    #[serde(rename = "punchRecords", default)]
    #[schema(example = "08:50:00:in,12:00:00:out,13:30:00:in,18:00:00:out")]
    pub punch_records: Option<String>,
    #[serde(default)]
    #[schema(example = "Present")]
    pub status: Option<String>,
}

impl IngestRecord {
    fn raw_times(&self) -> RawTimes<'_> {
        RawTimes {
            scheduled_in: self.s_in_time.as_deref(),
            scheduled_out: self.s_out_time.as_deref(),
            actual_in: self.a_in_time.as_deref(),
            actual_out: self.a_out_time.as_deref(),
            punch_records: self.punch_records.as_deref(),
        }
    }
}

/// Raw fields of one stored day, replaced wholesale on update.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateRecord {
    #[serde(default)]
    #[schema(example = "Present")]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(example = "General")]
    pub shift: Option<String>,
    #[serde(default)]
    #[schema(example = "09:00:00")]
    pub scheduled_in: Option<String>,
    #[serde(default)]
    #[schema(example = "18:00:00")]
    pub scheduled_out: Option<String>,
    #[serde(default)]
    #[schema(example = "09:07:00")]
    pub actual_in: Option<String>,
    #[serde(default)]
    #[schema(example = "18:00:00")]
    pub actual_out: Option<String>,
    #[serde(default)]
    #[schema(example = "09:07:00:in,13:00:00:out,13:45:00:in,18:00:00:out")]
    pub punch_records: Option<String>,
}

impl UpdateRecord {
    fn raw_times(&self) -> RawTimes<'_> {
        RawTimes {
            scheduled_in: self.scheduled_in.as_deref(),
            scheduled_out: self.scheduled_out.as_deref(),
            actual_in: self.actual_in.as_deref(),
            actual_out: self.actual_out.as_deref(),
            punch_records: self.punch_records.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
pub enum StatusFilter {
    Present,
    Absent,
    Leave,
    WeeklyOff,
    LeaveOrOff,
}

impl StatusFilter {
    fn condition(self) -> &'static str {
        match self {
            StatusFilter::Present => PRESENT_CONDITION,
            StatusFilter::Absent => ABSENT_CONDITION,
            StatusFilter::Leave => "l.Status = 'Leave'",
            StatusFilter::WeeklyOff => "l.Status = 'WeeklyOff'",
            StatusFilter::LeaveOrOff => LEAVE_OR_OFF_CONDITION,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Substring of the employee name
    pub employee_name: Option<String>,
    #[serde(rename = "employeeID")]
    pub employee_id: Option<String>,
    /// First date to show (YYYY-MM-DD)
    pub date_start: Option<String>,
    /// Last date to show (YYYY-MM-DD)
    pub date_end: Option<String>,
    /// Present, Absent, Leave, WeeklyOff or LeaveOrOff
    pub status_filter: Option<String>,
    pub missed_punches_only: Option<bool>,
    /// Adjusted break over one hour
    pub long_break_only: Option<bool>,
    /// Only days carrying a late remark
    pub late_rule_filter: Option<bool>,
    /// `Any`, or a case-insensitive part of the remark
    pub remark_filter: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub date_start: Option<String>,
    pub date_end: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: usize,
    pub total_records: usize,
}

#[derive(Serialize, ToSchema)]
pub struct RecordListResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<AttendanceRecord>,
    pub pagination: Pagination,
}

#[derive(Serialize, ToSchema)]
pub struct ExportResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<AttendanceRecord>,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    #[schema(example = "Record updated successfully.")]
    pub message: String,
}

/// Parses an optional `YYYY-MM-DD` parameter; blank means absent.
pub fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("Invalid {}: expected YYYY-MM-DD", name))),
    }
}

/// Range whose months are classified for late remarks: the requested bounds,
/// else the span of the result set, else the current month.
pub fn classification_range(
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    records: &[AttendanceRecord],
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let dates = || records.iter().map(|r| r.row.attendance_date);
    let start = date_start
        .or_else(|| dates().min())
        .unwrap_or_else(|| first_of_month(today));
    let end = date_end
        .or_else(|| dates().max())
        .unwrap_or_else(|| last_of_month(today));
    (start, end)
}

/// Keeps only remarked days when asked to, then applies the remark filter.
pub fn filter_by_remark(
    records: Vec<AttendanceRecord>,
    late_rule_only: bool,
    remark_filter: Option<&str>,
) -> Vec<AttendanceRecord> {
    let remark_filter = remark_filter.map(str::trim).filter(|f| !f.is_empty());
    let needle = remark_filter.map(str::to_lowercase);

    records
        .into_iter()
        .filter(|r| !late_rule_only || !r.late_remark.is_empty())
        .filter(|r| match (remark_filter, needle.as_deref()) {
            (None, _) => true,
            (Some("Any"), _) => !r.late_remark.is_empty(),
            (Some(_), Some(needle)) => r.late_remark.to_lowercase().contains(needle),
            (Some(_), None) => true,
        })
        .collect()
}

pub fn paginate<T>(items: Vec<T>, page: Option<u32>, limit: Option<u32>) -> (Vec<T>, Pagination) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let total_records = items.len();
    let total_pages = total_records.div_ceil(limit as usize);
    let offset = (page as usize - 1) * limit as usize;

    let data = items.into_iter().skip(offset).take(limit as usize).collect();
    (
        data,
        Pagination {
            page,
            limit,
            total_pages,
            total_records,
        },
    )
}

const UPSERT_EMPLOYEE_SQL: &str =
    "INSERT IGNORE INTO Employees (EmployeeID, EmployeeName) VALUES (?, ?)";

const UPSERT_LOG_SQL: &str = r#"
    INSERT INTO AttendanceLog
        (EmployeeID, AttendanceDate, Shift, ScheduledIn, ScheduledOut, ActualIn, ActualOut,
         WorkDuration, Overtime, TotalDuration, LateBy, EarlyGoingBy, Status, PunchRecords,
         EarlyByIn, LateByOut, ActualBreak, BreakAdjustment, AdjustedOvertime,
         AdjustedBreakResult, NetWorkDuration)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        Shift = VALUES(Shift),
        ScheduledIn = VALUES(ScheduledIn),
        ScheduledOut = VALUES(ScheduledOut),
        ActualIn = VALUES(ActualIn),
        ActualOut = VALUES(ActualOut),
        WorkDuration = VALUES(WorkDuration),
        Overtime = VALUES(Overtime),
        TotalDuration = VALUES(TotalDuration),
        LateBy = VALUES(LateBy),
        EarlyGoingBy = VALUES(EarlyGoingBy),
        Status = VALUES(Status),
        PunchRecords = VALUES(PunchRecords),
        EarlyByIn = VALUES(EarlyByIn),
        LateByOut = VALUES(LateByOut),
        ActualBreak = VALUES(ActualBreak),
        BreakAdjustment = VALUES(BreakAdjustment),
        AdjustedOvertime = VALUES(AdjustedOvertime),
        AdjustedBreakResult = VALUES(AdjustedBreakResult),
        NetWorkDuration = VALUES(NetWorkDuration)
"#;

const UPDATE_LOG_SQL: &str = r#"
    UPDATE AttendanceLog
    SET Status = ?, Shift = ?, ScheduledIn = ?, ScheduledOut = ?, ActualIn = ?, ActualOut = ?,
        WorkDuration = ?, Overtime = ?, TotalDuration = ?, LateBy = ?, EarlyGoingBy = ?,
        PunchRecords = ?, EarlyByIn = ?, LateByOut = ?, ActualBreak = ?, BreakAdjustment = ?,
        AdjustedOvertime = ?, AdjustedBreakResult = ?, NetWorkDuration = ?
    WHERE LogID = ?
"#;

/// Writes the whole batch in one transaction and returns the employee IDs it
/// inserted. Any failure rolls everything back.
async fn save_batch(pool: &MySqlPool, records: &[IngestRecord]) -> Result<Vec<String>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut seen = HashSet::new();
    let mut new_employees = Vec::new();

    for record in records {
        if seen.insert(record.e_code.as_str()) && !employee_cache::is_known(&record.e_code) {
            sqlx::query(UPSERT_EMPLOYEE_SQL)
                .bind(&record.e_code)
                .bind(&record.name)
                .execute(&mut *tx)
                .await?;
            new_employees.push(record.e_code.clone());
        }

        let m = compute(&record.raw_times());
        sqlx::query(UPSERT_LOG_SQL)
            .bind(&record.e_code)
            .bind(record.date)
            .bind(&record.shift)
            .bind(stored_time(record.s_in_time.as_deref()))
            .bind(stored_time(record.s_out_time.as_deref()))
            .bind(stored_time(record.a_in_time.as_deref()))
            .bind(stored_time(record.a_out_time.as_deref()))
            .bind(m.work_duration.to_string())
            .bind(m.overtime.to_string())
            .bind(m.total_duration.to_string())
            .bind(m.late_by.to_string())
            .bind(m.early_going_by.to_string())
            .bind(&record.status)
            .bind(&record.punch_records)
            .bind(m.early_by_in.to_string())
            .bind(m.late_by_out.to_string())
            .bind(m.actual_break.to_string())
            .bind(m.break_adjustment.to_string())
            .bind(m.adjusted_overtime.to_string())
            .bind(m.adjusted_break_result.to_string())
            .bind(m.net_work_duration.to_string())
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(new_employees)
}

/// Batch ingest
#[utoipa::path(
    post,
    path = "/api/attendance/batch",
    request_body = Vec<IngestRecord>,
    responses(
        (status = 200, description = "Batch stored", body = MessageResponse, example = json!({
            "status": "success",
            "message": "Batch save complete. Processed 2 logs."
        })),
        (status = 400, description = "Empty batch", body = Object, example = json!({
            "status": "error",
            "message": "No data received."
        })),
        (status = 500, description = "Batch rolled back", body = Object, example = json!({
            "status": "error",
            "message": "Batch save failed during transaction."
        }))
    ),
    tag = "Attendance"
)]
pub async fn batch_save(
    pool: web::Data<MySqlPool>,
    payload: web::Json<Vec<IngestRecord>>,
) -> Result<HttpResponse, ApiError> {
    let records = payload.into_inner();
    if records.is_empty() {
        return Err(ApiError::bad_request("No data received."));
    }

    let new_employees = save_batch(pool.get_ref(), &records)
        .await
        .map_err(ApiError::database("Batch save failed during transaction."))?;

    info!(
        records = records.len(),
        new_employees = new_employees.len(),
        "Batch save committed"
    );
    employee_cache::mark_known(new_employees).await;

    Ok(HttpResponse::Ok().json(MessageResponse {
        status: "success",
        message: format!("Batch save complete. Processed {} logs.", records.len()),
    }))
}

/// Update one stored day
#[utoipa::path(
    put,
    path = "/api/attendance/{log_id}",
    params(
        ("log_id" = i64, Path, description = "Attendance log ID")
    ),
    request_body = UpdateRecord,
    responses(
        (status = 200, description = "Record updated; status is `note` when a punch is still missing", body = MessageResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn update_record(
    pool: web::Data<MySqlPool>,
    path: web::Path<i64>,
    payload: web::Json<UpdateRecord>,
) -> Result<HttpResponse, ApiError> {
    let log_id = path.into_inner();
    let record = payload.into_inner();
    let m = compute(&record.raw_times());

    sqlx::query(UPDATE_LOG_SQL)
        .bind(&record.status)
        .bind(&record.shift)
        .bind(stored_time(record.scheduled_in.as_deref()))
        .bind(stored_time(record.scheduled_out.as_deref()))
        .bind(stored_time(record.actual_in.as_deref()))
        .bind(stored_time(record.actual_out.as_deref()))
        .bind(m.work_duration.to_string())
        .bind(m.overtime.to_string())
        .bind(m.total_duration.to_string())
        .bind(m.late_by.to_string())
        .bind(m.early_going_by.to_string())
        .bind(&record.punch_records)
        .bind(m.early_by_in.to_string())
        .bind(m.late_by_out.to_string())
        .bind(m.actual_break.to_string())
        .bind(m.break_adjustment.to_string())
        .bind(m.adjusted_overtime.to_string())
        .bind(m.adjusted_break_result.to_string())
        .bind(m.net_work_duration.to_string())
        .bind(log_id)
        .execute(pool.get_ref())
        .await
        .map_err(ApiError::database("Failed to update record."))?;

    let missed_punch = record.punch_records.as_deref().is_some_and(has_missed_punch);
    debug!(log_id, missed_punch, "Attendance record updated");

    let response = if missed_punch {
        MessageResponse {
            status: "note",
            message: "Record updated, but it still has a missed punch. Check the punches list."
                .to_string(),
        }
    } else {
        MessageResponse {
            status: "success",
            message: "Record updated successfully.".to_string(),
        }
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Delete one stored day (disabled)
#[utoipa::path(
    delete,
    path = "/api/attendance/{log_id}",
    params(
        ("log_id" = i64, Path, description = "Attendance log ID")
    ),
    responses(
        (status = 405, description = "Deletion is disabled", body = Object, example = json!({
            "status": "error",
            "message": "Record deletion is currently disabled."
        }))
    ),
    tag = "Attendance"
)]
pub async fn delete_record(_path: web::Path<i64>) -> Result<HttpResponse, ApiError> {
    Err(ApiError::DeletionDisabled)
}

/// Reads rows matching `filter`, recomputes their metrics and classifies
/// them over the full months around the requested dates.
async fn load_records(
    pool: &MySqlPool,
    filter: &SqlFilter,
    order_by: &str,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
) -> Result<Vec<AttendanceRecord>, ApiError> {
    let sql = format!("{} {} ORDER BY {}", RECORD_SELECT, filter.where_clause(), order_by);
    debug!(sql = %sql, "Fetching attendance records");

    let rows = filter
        .bind_to(sqlx::query_as::<_, AttendanceRow>(&sql))
        .fetch_all(pool)
        .await
        .map_err(ApiError::database("Failed to fetch attendance records"))?;

    let mut records: Vec<AttendanceRecord> = rows.into_iter().map(AttendanceRecord::from).collect();

    let (start, end) = classification_range(date_start, date_end, &records, Local::now().date_naive());
    annotate_late_remarks(pool, &mut records, start, end)
        .await
        .map_err(ApiError::database("Failed to classify late remarks"))?;

    Ok(records)
}

/// List attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(RecordQuery),
    responses(
        (status = 200, description = "Paginated attendance records", body = RecordListResponse),
        (status = 400, description = "Malformed date"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_records(
    pool: web::Data<MySqlPool>,
    query: web::Query<RecordQuery>,
) -> Result<HttpResponse, ApiError> {
    let date_start = parse_date_param("dateStart", query.date_start.as_deref())?;
    let date_end = parse_date_param("dateEnd", query.date_end.as_deref())?;

    let mut filter = SqlFilter::new();
    if let Some(name) = query.employee_name.as_deref().filter(|s| !s.is_empty()) {
        filter.push("e.EmployeeName LIKE ?", [SqlValue::String(format!("%{}%", name))]);
    }
    if let Some(employee_id) = query.employee_id.as_deref().filter(|s| !s.is_empty()) {
        filter.push("l.EmployeeID = ?", [SqlValue::String(employee_id.to_string())]);
    }
    if let Some(start) = date_start {
        filter.push("l.AttendanceDate >= ?", [SqlValue::Date(start)]);
    }
    if let Some(end) = date_end {
        filter.push("l.AttendanceDate <= ?", [SqlValue::Date(end)]);
    }
    if let Some(status) = query
        .status_filter
        .as_deref()
        .and_then(|s| s.parse::<StatusFilter>().ok())
    {
        filter.push_raw(status.condition());
    }
    if query.missed_punches_only.unwrap_or(false) {
        filter.push_raw(MISSED_PUNCH_CONDITION);
    }
    if query.long_break_only.unwrap_or(false) {
        filter.push_raw(LONG_BREAK_CONDITION);
    }

    let records = load_records(
        pool.get_ref(),
        &filter,
        "l.AttendanceDate DESC, e.EmployeeName ASC",
        date_start,
        date_end,
    )
    .await?;

    let records = filter_by_remark(
        records,
        query.late_rule_filter.unwrap_or(false),
        query.remark_filter.as_deref(),
    );
    let (data, pagination) = paginate(records, query.page, query.limit);

    Ok(HttpResponse::Ok().json(RecordListResponse {
        status: "success",
        data,
        pagination,
    }))
}

/// Export attendance records with metrics and remarks
#[utoipa::path(
    get,
    path = "/api/attendance/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "All records in range", body = ExportResponse),
        (status = 400, description = "Missing or malformed range", body = Object, example = json!({
            "status": "error",
            "message": "Start date and end date are required."
        }))
    ),
    tag = "Attendance"
)]
pub async fn export_records(
    pool: web::Data<MySqlPool>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, ApiError> {
    let date_start = parse_date_param("dateStart", query.date_start.as_deref())?;
    let date_end = parse_date_param("dateEnd", query.date_end.as_deref())?;
    let (Some(start), Some(end)) = (date_start, date_end) else {
        return Err(ApiError::bad_request("Start date and end date are required."));
    };

    let mut filter = SqlFilter::new();
    filter.push(
        "l.AttendanceDate BETWEEN ? AND ?",
        [SqlValue::Date(start), SqlValue::Date(end)],
    );

    let data = load_records(
        pool.get_ref(),
        &filter,
        "l.AttendanceDate ASC, e.EmployeeName ASC",
        Some(start),
        Some(end),
    )
    .await?;

    Ok(HttpResponse::Ok().json(ExportResponse {
        status: "success",
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::late_remark::{LateRemark, Remarkable};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn record(employee: &str, d: NaiveDate, remark: Option<LateRemark>) -> AttendanceRecord {
        let mut record = AttendanceRecord::from(AttendanceRow {
            log_id: 1,
            employee_id: employee.to_string(),
            employee_name: employee.to_string(),
            attendance_date: d,
            shift: None,
            scheduled_in: None,
            scheduled_out: None,
            actual_in: None,
            actual_out: None,
            punch_records: None,
            status: Some("Present".to_string()),
        });
        record.set_late_remark(remark);
        record
    }

    #[test]
    fn test_ingest_record_accepts_device_fields() {
        let json = r#"{
            "eCode": "1001", "name": "Jane Doe", "date": "2024-03-04", "shift": "General",
            "sInTime": "09:00:00", "sOutTime": "18:00:00", "aInTime": "09:20:00",
            "aOutTime": "18:00:00", "punchRecords": "09:20:00:in,18:00:00:out",
            "status": "Present", "workDur": "08:40", "ot": "", "lateBy": "00:20"
        }"#;
        let record: IngestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.e_code, "1001");
        assert_eq!(record.date, date(3, 4));
        assert_eq!(compute(&record.raw_times()).late_by.to_string(), "00:20:00");
    }

    #[test]
    fn test_update_record_uses_column_names() {
        let json = r#"{"Status": "Present", "ActualIn": "09:07:00", "PunchRecords": "09:07:00:in"}"#;
        let record: UpdateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.actual_in.as_deref(), Some("09:07:00"));
        assert!(record.scheduled_in.is_none());
    }

    #[test]
    fn test_status_filter_parses_known_names() {
        assert_eq!("LeaveOrOff".parse::<StatusFilter>().unwrap(), StatusFilter::LeaveOrOff);
        assert_eq!(StatusFilter::Present.condition(), PRESENT_CONDITION);
        assert!("Holiday".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_parse_date_param() {
        assert_eq!(parse_date_param("dateStart", None).unwrap(), None);
        assert_eq!(parse_date_param("dateStart", Some("")).unwrap(), None);
        assert_eq!(
            parse_date_param("dateStart", Some("2024-03-04")).unwrap(),
            Some(date(3, 4))
        );
        assert!(parse_date_param("dateStart", Some("04/03/2024")).is_err());
    }

    #[test]
    fn test_classification_range_fallbacks() {
        let today = date(6, 15);
        assert_eq!(
            classification_range(None, None, &[], today),
            (date(6, 1), date(6, 30))
        );

        let records = vec![record("E1", date(3, 20), None), record("E1", date(3, 5), None)];
        assert_eq!(
            classification_range(None, None, &records, today),
            (date(3, 5), date(3, 20))
        );
        assert_eq!(
            classification_range(Some(date(3, 1)), None, &records, today),
            (date(3, 1), date(3, 20))
        );
    }

    #[test]
    fn test_filter_by_remark() {
        let records = || {
            vec![
                record("E1", date(3, 1), Some(LateRemark::FirstLate)),
                record("E1", date(3, 2), None),
                record("E1", date(3, 3), Some(LateRemark::SevereLateHalfDay)),
                record("E1", date(3, 4), Some(LateRemark::LateLimitHalfDay)),
            ]
        };

        assert_eq!(filter_by_remark(records(), false, None).len(), 4);
        assert_eq!(filter_by_remark(records(), true, None).len(), 3);
        assert_eq!(filter_by_remark(records(), false, Some("Any")).len(), 3);
        assert_eq!(filter_by_remark(records(), false, Some("half day")).len(), 2);
        assert_eq!(filter_by_remark(records(), false, Some("1st")).len(), 1);
        assert_eq!(filter_by_remark(records(), false, Some("")).len(), 4);
    }

    #[test]
    fn test_paginate() {
        let (data, pagination) = paginate((1..=45).collect::<Vec<_>>(), Some(3), Some(20));
        assert_eq!(data, (41..=45).collect::<Vec<_>>());
        assert_eq!(
            pagination,
            Pagination {
                page: 3,
                limit: 20,
                total_pages: 3,
                total_records: 45
            }
        );

        let (data, pagination) = paginate(vec![1, 2, 3], Some(0), Some(0));
        assert_eq!(data, vec![1]);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 1);

        let (data, pagination) = paginate(Vec::<u8>::new(), None, None);
        assert!(data.is_empty());
        assert_eq!(pagination.total_pages, 0);
    }
}
