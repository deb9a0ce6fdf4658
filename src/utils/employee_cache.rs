use crate::model::employee::Employee;
use moka::future::Cache;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::debug;

/// Read-through cache for employee-code lookups on the attendance hot path.
/// Every directory write invalidates the touched codes, so a stale entry can
/// only outlive an external writer, bounded by the TTL.
pub type EmployeeCache = Cache<String, Employee>;

pub fn build() -> EmployeeCache {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(600))
        .build()
}

pub async fn resolve_employee(
    pool: &SqlitePool,
    cache: &EmployeeCache,
    employee_id: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    if let Some(hit) = cache.get(employee_id).await {
        debug!(employee_id, "Employee cache hit");
        return Ok(Some(hit));
    }

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;

    if let Some(e) = &employee {
        cache.insert(employee_id.to_string(), e.clone()).await;
    }

    Ok(employee)
}

pub async fn invalidate(cache: &EmployeeCache, employee_id: &str) {
    cache.invalidate(employee_id).await;
}
