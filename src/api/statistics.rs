use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::stats::{compute_statistics, Statistics, YearRecord};
use crate::utils::date::today;
use actix_web::{web, HttpResponse, Responder};
use chrono::{Datelike, NaiveDate};
use sqlx::SqlitePool;

/// Dashboard Statistics
///
/// Every metric derives from one snapshot: a single fetch of the current
/// year's records joined with employee metadata, plus one fetch of the
/// directory, both against the same "now".
#[utoipa::path(
    get,
    path = "/api/attendance/statistics",
    responses(
        (status = 200, description = "Dashboard aggregate", body = Statistics),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn get_statistics(pool: web::Data<SqlitePool>) -> Result<impl Responder, ApiError> {
    let now = today();
    let year_start = NaiveDate::from_ymd_opt(now.year(), 1, 1)
        .ok_or_else(|| ApiError::Validation("Invalid date.".to_string()))?;
    let year_end = NaiveDate::from_ymd_opt(now.year(), 12, 31)
        .ok_or_else(|| ApiError::Validation("Invalid date.".to_string()))?;

    let employees = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY id DESC")
        .fetch_all(pool.get_ref())
        .await?;

    let records = sqlx::query_as::<_, YearRecord>(
        r#"
        SELECT a.date, a.status, e.employee_id, e.full_name, e.department
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.date BETWEEN ? AND ?
        "#,
    )
    .bind(year_start)
    .bind(year_end)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(compute_statistics(now, &employees, &records)))
}
