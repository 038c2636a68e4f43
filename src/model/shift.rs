use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee's named shift with its default schedule.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ShiftDefinition {
    #[schema(example = "General")]
    pub shift_name: String,
    #[schema(example = "09:00:00")]
    pub default_scheduled_in: String,
    #[schema(example = "18:00:00")]
    pub default_scheduled_out: String,
}

/// An employee together with every shift defined for them.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeShifts {
    #[serde(rename = "EmployeeID")]
    pub employee_id: String,
    #[serde(rename = "EmployeeName")]
    pub employee_name: String,
    #[serde(rename = "Shifts")]
    pub shifts: Vec<ShiftDefinition>,
}

/// Flat row of employees left-joined with their shift definitions.
#[derive(Debug, sqlx::FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct ShiftJoinRow {
    #[sqlx(rename = "EmployeeID")]
    pub employee_id: String,
    pub employee_name: String,
    pub shift_name: Option<String>,
    pub default_scheduled_in: Option<String>,
    pub default_scheduled_out: Option<String>,
}

/// Groups join rows by employee, keeping the first-seen employee order.
pub fn group_shifts(rows: Vec<ShiftJoinRow>) -> Vec<EmployeeShifts> {
    let mut grouped: Vec<EmployeeShifts> = Vec::new();

    for row in rows {
        let needs_new = grouped
            .last()
            .map_or(true, |last| last.employee_id != row.employee_id);
        if needs_new {
            grouped.push(EmployeeShifts {
                employee_id: row.employee_id.clone(),
                employee_name: row.employee_name.clone(),
                shifts: Vec::new(),
            });
        }

        if let (Some(shift_name), Some(entry)) = (row.shift_name, grouped.last_mut()) {
            entry.shifts.push(ShiftDefinition {
                shift_name,
                default_scheduled_in: row.default_scheduled_in.unwrap_or_default(),
                default_scheduled_out: row.default_scheduled_out.unwrap_or_default(),
            });
        }
    }

    grouped
}
