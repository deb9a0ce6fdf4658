use crate::error::{is_unique_violation, ApiError};
use crate::model::employee::Employee;
use crate::utils::employee_cache::{self, EmployeeCache};
use crate::utils::validate::validate_employee;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePayload {
    #[schema(example = "EMP001")]
    pub employee_id: Option<String>,
    #[schema(example = "John Doe")]
    pub full_name: Option<String>,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: Option<String>,
    #[schema(example = "IT")]
    pub department: Option<String>,
    #[schema(example = "Backend Developer")]
    pub role: Option<String>,
    #[schema(example = "Male", nullable = true)]
    pub gender: Option<String>,
}

/// The payload after validation, with whitespace trimmed off every field.
struct EmployeeFields<'a> {
    employee_id: &'a str,
    full_name: &'a str,
    email: &'a str,
    department: &'a str,
    role: &'a str,
}

impl EmployeeFields<'_> {
    /// Email participates in a case-insensitive unique index, so it is
    /// lowercased before any lookup or write.
    fn normalized_email(&self) -> String {
        self.email.to_lowercase()
    }
}

impl EmployeePayload {
    /// All fields are optional at the wire level so a body with keys left
    /// out still reaches the validator and comes back as a field-error
    /// response rather than a deserialize failure.
    fn validated(&self) -> Result<EmployeeFields<'_>, ApiError> {
        let fields = EmployeeFields {
            employee_id: self.employee_id.as_deref().unwrap_or("").trim(),
            full_name: self.full_name.as_deref().unwrap_or("").trim(),
            email: self.email.as_deref().unwrap_or("").trim(),
            department: self.department.as_deref().unwrap_or("").trim(),
            role: self.role.as_deref().unwrap_or("").trim(),
        };
        let errors = validate_employee(
            fields.employee_id,
            fields.full_name,
            fields.email,
            fields.department,
            fields.role,
        );
        if errors.is_empty() {
            Ok(fields)
        } else {
            Err(ApiError::Fields(errors))
        }
    }
}

async fn fetch_employee(pool: &SqlitePool, id: i64) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "Validation failed."
        })),
        (status = 409, description = "Duplicate employee id or email", body = Object, example = json!({
            "message": "Employee ID or email already exists."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    cache: web::Data<EmployeeCache>,
    payload: web::Json<EmployeePayload>,
) -> Result<impl Responder, ApiError> {
    let fields = payload.validated()?;
    let email = fields.normalized_email();

    let duplicate = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM employees WHERE employee_id = ? OR email = ?",
    )
    .bind(fields.employee_id)
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?;

    if duplicate.is_some() {
        return Err(ApiError::Conflict(
            "Employee ID or email already exists.".to_string(),
        ));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department, role, gender)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(fields.employee_id)
    .bind(fields.full_name)
    .bind(&email)
    .bind(fields.department)
    .bind(fields.role)
    .bind(&payload.gender)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        // The unique indexes back the pre-check under concurrent creates.
        if is_unique_violation(&e) {
            ApiError::Conflict("Employee ID or email already exists.".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    employee_cache::invalidate(&cache, fields.employee_id).await;

    let created = fetch_employee(pool.get_ref(), result.last_insert_rowid())
        .await?
        .ok_or_else(|| ApiError::Database(sqlx::Error::RowNotFound))?;

    info!(employee_id = %created.employee_id, "Employee created");
    Ok(HttpResponse::Created().json(created))
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, newest first", body = [Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id DESC")
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(employees))
}

#[derive(Deserialize)]
pub struct EmployeePath {
    pub id: i64,
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal employee id")
    ),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found."
        })),
        (status = 409, description = "Duplicate employee id or email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    cache: web::Data<EmployeeCache>,
    path: web::Path<EmployeePath>,
    payload: web::Json<EmployeePayload>,
) -> Result<impl Responder, ApiError> {
    let fields = payload.validated()?;
    let email = fields.normalized_email();

    let existing = fetch_employee(pool.get_ref(), path.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found.".to_string()))?;

    // Duplicate check excludes the employee being updated.
    let duplicate = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM employees WHERE (employee_id = ? OR email = ?) AND id != ?",
    )
    .bind(fields.employee_id)
    .bind(&email)
    .bind(path.id)
    .fetch_optional(pool.get_ref())
    .await?;

    if duplicate.is_some() {
        return Err(ApiError::Conflict(
            "Employee ID or email already exists.".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE employees
        SET employee_id = ?, full_name = ?, email = ?, department = ?, role = ?, gender = ?
        WHERE id = ?
        "#,
    )
    .bind(fields.employee_id)
    .bind(fields.full_name)
    .bind(&email)
    .bind(fields.department)
    .bind(fields.role)
    .bind(&payload.gender)
    .bind(path.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Employee ID or email already exists.".to_string())
        } else {
            ApiError::Database(e)
        }
    })?;

    // The business key may have changed; drop both cache entries.
    employee_cache::invalidate(&cache, &existing.employee_id).await;
    employee_cache::invalidate(&cache, fields.employee_id).await;

    let updated = fetch_employee(pool.get_ref(), path.id)
        .await?
        .ok_or_else(|| ApiError::Database(sqlx::Error::RowNotFound))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id", Path, description = "Internal employee id")
    ),
    responses(
        (status = 200, description = "Employee and attendance deleted", body = Object, example = json!({
            "message": "Employee deleted."
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    cache: web::Data<EmployeeCache>,
    path: web::Path<EmployeePath>,
) -> Result<impl Responder, ApiError> {
    let existing = fetch_employee(pool.get_ref(), path.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found.".to_string()))?;

    // Attendance cleanup rides in the same transaction as the delete.
    let mut tx = pool.get_ref().begin().await?;
    sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(existing.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    employee_cache::invalidate(&cache, &existing.employee_id).await;

    info!(employee_id = %existing.employee_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({ "message": "Employee deleted." })))
}
