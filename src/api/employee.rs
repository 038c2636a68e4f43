use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::model::employee::Employee;

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(example = "success")]
    pub status: &'static str,
    pub data: Vec<Employee>,
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Every known employee, by name", body = EmployeeListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let data = sqlx::query_as::<_, Employee>(
        r#"
        SELECT EmployeeID, EmployeeName
        FROM Employees
        ORDER BY EmployeeName ASC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(ApiError::database("Failed to fetch employees"))?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        status: "success",
        data,
    }))
}
