use crate::api::attendance::{
    ExportQuery, ExportResponse, IngestRecord, MessageResponse, Pagination, RecordListResponse,
    RecordQuery, UpdateRecord,
};
use crate::api::dashboard::{
    BreakAbuse, BreakAbuseResponse, DailyCounts, DashboardStats, DashboardStatsResponse,
    DaySummary, EmployeeSummaryResponse, MonthQuery, MonthlyAttendanceResponse,
};
use crate::api::employee::EmployeeListResponse;
use crate::api::shift::{SaveShift, ShiftListResponse};
use crate::metrics::calculator::TimeMetrics;
use crate::model::attendance::{AttendanceRecord, AttendanceRow};
use crate::model::employee::Employee;
use crate::model::shift::{EmployeeShifts, ShiftDefinition};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Employee Attendance

Records daily punch-in/out data and derives the time metrics reviewers need.

### 🔹 Key Features
- **Ingestion**
  - Batch upload of device exports, single-record correction
- **Time metrics**
  - Lateness, early departure, break from the punch log, break absorption
    against early arrival, adjusted overtime, net work duration
- **Monthly late remarks**
  - 1st / 2nd / 3rd late, then half day; over 30 minutes late is a half day
- **Dashboards**
  - Monthly counters, daily presence, per-employee summary, break outliers

### 📦 Response Format
- JSON with a `status` of `success`, `note` or `error`
- Durations are `HH:MM:SS` and may exceed 24 hours

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::batch_save,
        crate::api::attendance::list_records,
        crate::api::attendance::export_records,
        crate::api::attendance::update_record,
        crate::api::attendance::delete_record,

        crate::api::dashboard::dashboard_stats,
        crate::api::dashboard::monthly_attendance,
        crate::api::dashboard::employee_summary,
        crate::api::dashboard::break_abuse,

        crate::api::employee::list_employees,

        crate::api::shift::list_shifts,
        crate::api::shift::save_shift
    ),
    components(
        schemas(
            IngestRecord,
            UpdateRecord,
            RecordQuery,
            ExportQuery,
            Pagination,
            RecordListResponse,
            ExportResponse,
            MessageResponse,
            AttendanceRow,
            AttendanceRecord,
            TimeMetrics,
            MonthQuery,
            DashboardStats,
            DashboardStatsResponse,
            DailyCounts,
            MonthlyAttendanceResponse,
            DaySummary,
            EmployeeSummaryResponse,
            BreakAbuse,
            BreakAbuseResponse,
            Employee,
            EmployeeListResponse,
            SaveShift,
            ShiftDefinition,
            EmployeeShifts,
            ShiftListResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance ingestion, correction and review"),
        (name = "Dashboard", description = "Monthly attendance dashboards"),
        (name = "Employee", description = "Employee directory"),
        (name = "Shift", description = "Per-employee shift definitions"),
    )
)]
pub struct ApiDoc;
