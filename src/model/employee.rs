use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "EmployeeID": "1001",
        "EmployeeName": "Jane Doe"
    })
)]
pub struct Employee {
    #[serde(rename = "EmployeeID")]
    #[sqlx(rename = "EmployeeID")]
    #[schema(example = "1001")]
    pub employee_id: String,

    #[serde(rename = "EmployeeName")]
    #[sqlx(rename = "EmployeeName")]
    #[schema(example = "Jane Doe")]
    pub employee_name: String,
}
