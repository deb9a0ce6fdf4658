use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::utils::date::{normalize_date, today};
use crate::utils::employee_cache::{self, EmployeeCache};
use actix_web::{web, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendancePayload {
    #[schema(example = "EMP001")]
    pub employee_id: Option<String>,
    #[schema(example = "2026-02-02", format = "date")]
    pub date: Option<String>,
    #[schema(example = "Present")]
    pub status: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAttendanceResponse {
    pub employee: Employee,
    pub records: Vec<AttendanceRecord>,
    #[schema(example = 12)]
    pub total_present: i64,
}

/// Attendance record with its employee embedded, as returned by the
/// day-listing endpoint.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceWithEmployee {
    pub id: i64,
    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Present")]
    pub status: String,
    #[schema(example = "2026-02-02T09:00:00", value_type = String)]
    pub created_at: NaiveDateTime,
    pub employee: Employee,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayAttendanceResponse {
    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub date: NaiveDate,
    pub records: Vec<AttendanceWithEmployee>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentTally {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = 12)]
    pub present_days: i64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub total_employees: i64,
    pub total_records: i64,
    pub present_today: i64,
    pub absent_today: i64,
    pub on_leave_today: i64,
    pub present_counts: Vec<PresentTally>,
}

#[derive(sqlx::FromRow)]
struct StatusCountRow {
    status: String,
    count: i64,
}

#[derive(sqlx::FromRow)]
struct DayRow {
    id: i64,
    date: NaiveDate,
    status: String,
    created_at: NaiveDateTime,
    emp_pk: i64,
    employee_id: String,
    full_name: String,
    email: String,
    department: String,
    role: String,
    gender: Option<String>,
    emp_created_at: NaiveDateTime,
}

impl From<DayRow> for AttendanceWithEmployee {
    fn from(r: DayRow) -> Self {
        AttendanceWithEmployee {
            id: r.id,
            date: r.date,
            status: r.status,
            created_at: r.created_at,
            employee: Employee {
                id: r.emp_pk,
                employee_id: r.employee_id,
                full_name: r.full_name,
                email: r.email,
                department: r.department,
                role: r.role,
                gender: r.gender,
                created_at: r.emp_created_at,
            },
        }
    }
}

const RECORD_SELECT: &str = r#"
    SELECT a.id, e.employee_id, a.date, a.status, a.created_at
    FROM attendance a
    JOIN employees e ON e.id = a.employee_id
"#;

async fn resolve_or_404(
    pool: &SqlitePool,
    cache: &EmployeeCache,
    employee_id: &str,
) -> Result<Employee, ApiError> {
    employee_cache::resolve_employee(pool, cache, employee_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Employee not found.".to_string()))
}

fn parse_date_param(raw: &str) -> Result<NaiveDate, ApiError> {
    normalize_date(raw).ok_or_else(|| ApiError::Validation("Invalid date.".to_string()))
}

/// Mark Attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendancePayload,
    responses(
        (status = 200, description = "Existing record overwritten", body = AttendanceRecord),
        (status = 201, description = "Record created", body = AttendanceRecord),
        (status = 400, description = "Missing fields, bad status, or bad date", body = Object, example = json!({
            "message": "Status must be Present, Absent, or On Leave."
        })),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<SqlitePool>,
    cache: web::Data<EmployeeCache>,
    payload: web::Json<MarkAttendancePayload>,
) -> Result<impl Responder, ApiError> {
    let (employee_id, date_raw, status_raw) = match (
        payload.employee_id.as_deref(),
        payload.date.as_deref(),
        payload.status.as_deref(),
    ) {
        (Some(e), Some(d), Some(s)) if !e.is_empty() && !d.is_empty() && !s.is_empty() => (e, d, s),
        _ => {
            return Err(ApiError::Validation(
                "employeeId, date, and status are required.".to_string(),
            ))
        }
    };

    let status = AttendanceStatus::parse(status_raw).ok_or_else(|| {
        ApiError::Validation("Status must be Present, Absent, or On Leave.".to_string())
    })?;

    let employee = resolve_or_404(pool.get_ref(), cache.get_ref(), employee_id).await?;
    let date = parse_date_param(date_raw)?;

    let existed = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(employee.id)
    .bind(date)
    .fetch_optional(pool.get_ref())
    .await?
    .is_some();

    // Atomic upsert; the unique (employee_id, date) index means concurrent
    // marks can never produce a duplicate row.
    sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status)
        VALUES (?, ?, ?)
        ON CONFLICT (employee_id, date) DO UPDATE SET status = excluded.status
        "#,
    )
    .bind(employee.id)
    .bind(date)
    .bind(status.as_ref())
    .execute(pool.get_ref())
    .await?;

    let sql = format!("{RECORD_SELECT} WHERE a.employee_id = ? AND a.date = ?");
    let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee.id)
        .bind(date)
        .fetch_one(pool.get_ref())
        .await?;

    info!(employee_id = %employee.employee_id, %date, status = %status, "Attendance marked");

    if existed {
        Ok(HttpResponse::Ok().json(record))
    } else {
        Ok(HttpResponse::Created().json(record))
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeAttendanceQuery {
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Attendance by Employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id", Path, description = "Business employee id"),
        ("date", Query, description = "Single day filter"),
        ("start", Query, description = "Range start, inclusive"),
        ("end", Query, description = "Range end, inclusive")
    ),
    responses(
        (status = 200, description = "Records newest-date-first with Present total", body = EmployeeAttendanceResponse),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "Unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_by_employee(
    pool: web::Data<SqlitePool>,
    cache: web::Data<EmployeeCache>,
    path: web::Path<String>,
    query: web::Query<EmployeeAttendanceQuery>,
) -> Result<impl Responder, ApiError> {
    let employee = resolve_or_404(pool.get_ref(), cache.get_ref(), &path.into_inner()).await?;

    let mut sql = format!("{RECORD_SELECT} WHERE a.employee_id = ?");
    let mut bounds: Vec<NaiveDate> = Vec::new();

    if query.start.is_some() || query.end.is_some() {
        if let Some(start) = &query.start {
            sql.push_str(" AND a.date >= ?");
            bounds.push(parse_date_param(start)?);
        }
        if let Some(end) = &query.end {
            // End of range is the day's last instant, so the day itself
            // stays inclusive.
            sql.push_str(" AND a.date <= ?");
            bounds.push(parse_date_param(end)?);
        }
    } else if let Some(date) = &query.date {
        sql.push_str(" AND a.date = ?");
        bounds.push(parse_date_param(date)?);
    }

    sql.push_str(" ORDER BY a.date DESC");

    let mut q = sqlx::query_as::<_, AttendanceRecord>(&sql).bind(employee.id);
    for b in &bounds {
        q = q.bind(*b);
    }
    let records = q.fetch_all(pool.get_ref()).await?;

    let total_present = records
        .iter()
        .filter(|r| r.status == AttendanceStatus::Present.as_ref())
        .count() as i64;

    Ok(HttpResponse::Ok().json(EmployeeAttendanceResponse {
        employee,
        records,
        total_present,
    }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DateQuery {
    pub date: Option<String>,
}

/// Attendance by Date
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("date", Query, description = "Day to list; defaults to today")
    ),
    responses(
        (status = 200, description = "The day's records, newest-created first", body = DayAttendanceResponse),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance_by_date(
    pool: web::Data<SqlitePool>,
    query: web::Query<DateQuery>,
) -> Result<impl Responder, ApiError> {
    let date = match &query.date {
        Some(raw) => parse_date_param(raw)?,
        None => today(),
    };

    let rows = sqlx::query_as::<_, DayRow>(
        r#"
        SELECT a.id, a.date, a.status, a.created_at,
               e.id AS emp_pk, e.employee_id, e.full_name, e.email,
               e.department, e.role, e.gender, e.created_at AS emp_created_at
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.date = ?
        ORDER BY a.id DESC
        "#,
    )
    .bind(date)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(DayAttendanceResponse {
        date,
        records: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Attendance Summary
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(
        ("date", Query, description = "Day to summarize; defaults to today")
    ),
    responses(
        (status = 200, description = "Daily aggregate counts", body = SummaryResponse),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    pool: web::Data<SqlitePool>,
    query: web::Query<DateQuery>,
) -> Result<impl Responder, ApiError> {
    let date = match &query.date {
        Some(raw) => parse_date_param(raw)?,
        None => today(),
    };

    let total_employees = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
        .fetch_one(pool.get_ref())
        .await?;

    let status_rows = sqlx::query_as::<_, StatusCountRow>(
        "SELECT status, COUNT(*) AS count FROM attendance WHERE date = ? GROUP BY status",
    )
    .bind(date)
    .fetch_all(pool.get_ref())
    .await?;

    let mut present_today = 0;
    let mut absent_today = 0;
    let mut on_leave_today = 0;
    for row in &status_rows {
        match AttendanceStatus::parse(&row.status) {
            Some(AttendanceStatus::Present) => present_today = row.count,
            Some(AttendanceStatus::Absent) => absent_today = row.count,
            Some(AttendanceStatus::OnLeave) => on_leave_today = row.count,
            None => {}
        }
    }
    let total_records = present_today + absent_today + on_leave_today;

    // All-time Present tally per employee, ranked descending, ties by name.
    let present_counts = sqlx::query_as::<_, PresentTally>(
        r#"
        SELECT e.employee_id, e.full_name, e.department, COUNT(*) AS present_days
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.status = 'Present'
        GROUP BY a.employee_id
        ORDER BY present_days DESC, e.full_name ASC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(SummaryResponse {
        total_employees,
        total_records,
        present_today,
        absent_today,
        on_leave_today,
        present_counts,
    }))
}
