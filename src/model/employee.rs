use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "employeeId": "EMP001",
        "fullName": "John Doe",
        "email": "john.doe@company.com",
        "department": "IT",
        "role": "Backend Developer",
        "gender": "Male",
        "createdAt": "2026-01-01T09:00:00"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// Business identity key, alphanumeric. Attendance joins go through this.
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    /// Stored lowercased, unique.
    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "IT")]
    pub department: String,

    #[schema(example = "Backend Developer")]
    pub role: String,

    #[schema(example = "Male", nullable = true)]
    pub gender: Option<String>,

    #[schema(example = "2026-01-01T09:00:00", value_type = String)]
    pub created_at: NaiveDateTime,
}
