//! Populates the database with a sample directory and a year-to-date
//! attendance history so the dashboard has something to show.
//!
//!     cargo run --bin seed

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use dotenvy::dotenv;
use hr_lite::config::Config;
use hr_lite::db::init_db;
use sqlx::SqlitePool;
use tracing::info;

struct SeedEmployee {
    employee_id: &'static str,
    full_name: &'static str,
    email: &'static str,
    department: &'static str,
    role: &'static str,
    gender: Option<&'static str>,
}

const EMPLOYEES: &[SeedEmployee] = &[
    SeedEmployee {
        employee_id: "EMP001",
        full_name: "Aarav Sharma",
        email: "aarav.sharma@company.com",
        department: "IT",
        role: "Backend Developer",
        gender: Some("Male"),
    },
    SeedEmployee {
        employee_id: "EMP002",
        full_name: "Priya Patel",
        email: "priya.patel@company.com",
        department: "HR",
        role: "Recruiter",
        gender: Some("Female"),
    },
    SeedEmployee {
        employee_id: "EMP003",
        full_name: "Rohan Mehta",
        email: "rohan.mehta@company.com",
        department: "IT",
        role: "DevOps Engineer",
        gender: Some("Male"),
    },
    SeedEmployee {
        employee_id: "EMP004",
        full_name: "Sneha Iyer",
        email: "sneha.iyer@company.com",
        department: "Marketing",
        role: "SEO Analyst",
        gender: Some("Female"),
    },
    SeedEmployee {
        employee_id: "EMP005",
        full_name: "Vikram Rao",
        email: "vikram.rao@company.com",
        department: "Sales",
        role: "Sales Executive",
        gender: Some("Male"),
    },
    SeedEmployee {
        employee_id: "EMP006",
        full_name: "Ananya Desai",
        email: "ananya.desai@company.com",
        department: "Operations",
        role: "Logistics Coordinator",
        gender: Some("Female"),
    },
    SeedEmployee {
        employee_id: "EMP007",
        full_name: "Kabir Khan",
        email: "kabir.khan@company.com",
        department: "IT",
        role: "QA Tester",
        gender: None,
    },
    SeedEmployee {
        employee_id: "EMP008",
        full_name: "Meera Nair",
        email: "meera.nair@company.com",
        department: "Marketing",
        role: "Content Writer",
        gender: Some("Female"),
    },
];

/// Deterministic pseudo-random status so repeated seeds are identical:
/// roughly one leave day per three weeks, one absence per week, the rest
/// present.
fn status_for(employee_index: usize, date: NaiveDate) -> &'static str {
    let mix = date.ordinal() as usize + employee_index * 7;
    if mix % 17 == 0 {
        "On Leave"
    } else if mix % 6 == 0 {
        "Absent"
    } else {
        "Present"
    }
}

async fn seed_employees(pool: &SqlitePool) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(EMPLOYEES.len());
    for e in EMPLOYEES {
        sqlx::query(
            r#"
            INSERT INTO employees (employee_id, full_name, email, department, role, gender)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (employee_id) DO UPDATE SET
                full_name = excluded.full_name,
                email = excluded.email,
                department = excluded.department,
                role = excluded.role,
                gender = excluded.gender
            "#,
        )
        .bind(e.employee_id)
        .bind(e.full_name)
        .bind(e.email)
        .bind(e.department)
        .bind(e.role)
        .bind(e.gender)
        .execute(pool)
        .await
        .with_context(|| format!("inserting employee {}", e.employee_id))?;

        // last_insert_rowid is stale on the DO UPDATE path, so look the
        // row up by its business key instead.
        let id = sqlx::query_scalar::<_, i64>("SELECT id FROM employees WHERE employee_id = ?")
            .bind(e.employee_id)
            .fetch_one(pool)
            .await?;
        ids.push(id);
    }
    Ok(ids)
}

async fn seed_attendance(pool: &SqlitePool, employee_ids: &[i64]) -> Result<u64> {
    let today = Local::now().date_naive();
    let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
        .context("building the start of the year")?;

    let mut written = 0u64;
    for (index, &id) in employee_ids.iter().enumerate() {
        let mut day = start;
        while day <= today {
            // Weekends are not working days.
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                sqlx::query(
                    r#"
                    INSERT INTO attendance (employee_id, date, status)
                    VALUES (?, ?, ?)
                    ON CONFLICT (employee_id, date) DO UPDATE SET status = excluded.status
                    "#,
                )
                .bind(id)
                .bind(day)
                .bind(status_for(index, day))
                .execute(pool)
                .await
                .with_context(|| format!("marking attendance for employee {id} on {day}"))?;
                written += 1;
            }
            day = day.succ_opt().context("advancing the seed date")?;
        }
    }
    Ok(written)
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = Config::from_env();
    let pool = init_db(&config.database_url).await;

    let employee_ids = seed_employees(&pool).await?;
    info!(count = employee_ids.len(), "Seeded employees");

    let records = seed_attendance(&pool, &employee_ids).await?;
    info!(records, "Seeded attendance");

    Ok(())
}
