use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::api::attendance::MessageResponse;
use crate::error::ApiError;
use crate::model::shift::{EmployeeShifts, ShiftJoinRow, group_shifts};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SaveShift {
    #[serde(rename = "EmployeeID", default)]
    #[schema(example = "1001")]
    pub employee_id: String,
    #[serde(default)]
    #[schema(example = "General")]
    pub shift_name: String,
    #[serde(default)]
    #[schema(example = "09:00:00")]
    pub default_scheduled_in: String,
    #[serde(default)]
    #[schema(example = "18:00:00")]
    pub default_scheduled_out: String,
}

impl SaveShift {
    fn is_complete(&self) -> bool {
        [
            &self.employee_id,
            &self.shift_name,
            &self.default_scheduled_in,
            &self.default_scheduled_out,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

#[derive(Serialize, ToSchema)]
pub struct ShiftListResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<EmployeeShifts>,
}

/// List shift definitions per employee
#[utoipa::path(
    get,
    path = "/api/shifts",
    responses(
        (status = 200, description = "Employees with their shifts", body = ShiftListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn list_shifts(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, ShiftJoinRow>(
        r#"
        SELECT
            e.EmployeeID,
            e.EmployeeName,
            s.ShiftName,
            CAST(s.DefaultScheduledIn AS CHAR) AS DefaultScheduledIn,
            CAST(s.DefaultScheduledOut AS CHAR) AS DefaultScheduledOut
        FROM Employees e
        LEFT JOIN ShiftDefinitions s ON e.EmployeeID = s.EmployeeID
        ORDER BY e.EmployeeName, e.EmployeeID, s.ShiftName
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to fetch shift definitions"))?;

    Ok(HttpResponse::Ok().json(ShiftListResponse {
        status: "success",
        data: group_shifts(rows),
    }))
}

/// Create or replace one shift definition
#[utoipa::path(
    post,
    path = "/api/shifts",
    request_body = SaveShift,
    responses(
        (status = 200, description = "Shift saved", body = MessageResponse, example = json!({
            "status": "success",
            "message": "Shift saved successfully."
        })),
        (status = 400, description = "Missing fields", body = Object, example = json!({
            "status": "error",
            "message": "Missing required shift data."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn save_shift(
    pool: web::Data<MySqlPool>,
    payload: web::Json<SaveShift>,
) -> Result<HttpResponse, ApiError> {
    if !payload.is_complete() {
        return Err(ApiError::bad_request("Missing required shift data."));
    }

    sqlx::query(
        r#"
        INSERT INTO ShiftDefinitions (EmployeeID, ShiftName, DefaultScheduledIn, DefaultScheduledOut)
        VALUES (?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            DefaultScheduledIn = VALUES(DefaultScheduledIn),
            DefaultScheduledOut = VALUES(DefaultScheduledOut)
        "#,
    )
    .bind(payload.employee_id.trim())
    .bind(payload.shift_name.trim())
    .bind(payload.default_scheduled_in.trim())
    .bind(payload.default_scheduled_out.trim())
    .execute(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to save shift."))?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        status: "success",
        message: "Shift saved successfully.".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_shift_requires_every_field() {
        let full: SaveShift = serde_json::from_str(
            r#"{"EmployeeID": "1001", "ShiftName": "General",
                "DefaultScheduledIn": "09:00:00", "DefaultScheduledOut": "18:00:00"}"#,
        )
        .unwrap();
        assert!(full.is_complete());

        let partial: SaveShift =
            serde_json::from_str(r#"{"EmployeeID": "1001", "ShiftName": " "}"#).unwrap();
        assert!(!partial.is_complete());
    }
}
