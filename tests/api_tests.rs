use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Datelike, Local};
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use hr_lite::config::Config;
use hr_lite::db::ensure_schema;
use hr_lite::routes;
use hr_lite::utils::employee_cache;

/// In-memory SQLite; a single connection so every query sees the same
/// database.
async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    ensure_schema(&pool).await.expect("schema");
    pool
}

fn test_config() -> Config {
    Config {
        server_addr: "127.0.0.1:0".to_string(),
        database_url: "sqlite::memory:".to_string(),
        // Disabled: test requests carry no peer address to key on.
        rate_api_per_min: 0,
        api_prefix: "/api".to_string(),
    }
}

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(employee_cache::build()))
                .configure(|cfg| routes::configure(cfg, test_config())),
        )
        .await
    };
}

fn employee_body(id: &str, name: &str, email: &str, department: &str, role: &str) -> Value {
    json!({
        "employeeId": id,
        "fullName": name,
        "email": email,
        "department": department,
        "role": role,
    })
}

macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri($uri)
            .set_json(&$body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

macro_rules! put_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = test::TestRequest::put()
            .uri($uri)
            .set_json(&$body)
            .to_request();
        test::call_service(&$app, req).await
    }};
}

macro_rules! get {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::get().uri($uri).to_request();
        test::call_service(&$app, req).await
    }};
}

macro_rules! delete {
    ($app:expr, $uri:expr) => {{
        let req = test::TestRequest::delete().uri($uri).to_request();
        test::call_service(&$app, req).await
    }};
}

// ---------- employee directory ----------

#[actix_web::test]
async fn create_employee_returns_the_stored_record() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Jane Roe", "Jane.Roe@Company.COM", "IT", "Backend Developer")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["employeeId"], "E1");
    assert_eq!(body["fullName"], "Jane Roe");
    // Email is lowercased on write.
    assert_eq!(body["email"], "jane.roe@company.com");
    assert!(body["id"].as_i64().is_some());
}

#[actix_web::test]
async fn create_employee_rejects_missing_fields_with_field_errors() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        json!({"employeeId": "", "fullName": "", "email": "", "department": "", "role": ""})
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"employeeId"));
    assert!(fields.contains(&"email"));
}

#[actix_web::test]
async fn employee_body_with_absent_keys_still_gets_field_errors() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    // Keys left out of the JSON entirely, not just empty.
    let resp = post_json!(app, "/api/employees", json!({"employeeId": "E1"}));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(!fields.contains(&"employeeId"));
    assert!(fields.contains(&"fullName"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"department"));
    assert!(fields.contains(&"role"));

    // Updates take the same shape of response for a partial body.
    let resp = put_json!(app, "/api/employees/1", json!({"email": "jane@co.com"}));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn create_employee_rejects_role_department_mismatch() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Jane", "jane@co.com", "Sales", "Backend Developer")
    );
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn duplicate_employee_id_conflicts() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Jane", "jane@co.com", "IT", "QA Tester")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Other", "other@co.com", "HR", "Recruiter")
    );
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn duplicate_email_conflicts_case_insensitively() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Jane", "jane@co.com", "IT", "QA Tester")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E2", "Other", "JANE@CO.COM", "HR", "Recruiter")
    );
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn list_employees_is_newest_first() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    for (id, email) in [("E1", "a@co.com"), ("E2", "b@co.com"), ("E3", "c@co.com")] {
        let resp = post_json!(
            app,
            "/api/employees",
            employee_body(id, id, email, "IT", "QA Tester")
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = get!(app, "/api/employees");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["employeeId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["E3", "E2", "E1"]);
}

#[actix_web::test]
async fn update_employee_handles_missing_conflicting_and_valid_targets() {
    let pool = memory_pool().await;
    let app = test_app!(pool);

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E1", "Jane", "jane@co.com", "IT", "QA Tester")
    );
    let first: Value = test::read_body_json(resp).await;
    let first_id = first["id"].as_i64().unwrap();

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E2", "Bob", "bob@co.com", "HR", "Recruiter")
    );
    let second: Value = test::read_body_json(resp).await;
    let second_id = second["id"].as_i64().unwrap();

    // Unknown target.
    let resp = put_json!(
        app,
        "/api/employees/99999",
        employee_body("E9", "X", "x@co.com", "IT", "QA Tester")
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Another employee already owns the email.
    let resp = put_json!(
        app,
        &format!("/api/employees/{second_id}"),
        employee_body("E2", "Bob", "jane@co.com", "HR", "Recruiter")
    );
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Updating yourself with your own identifiers is fine.
    let resp = put_json!(
        app,
        &format!("/api/employees/{first_id}"),
        employee_body("E1", "Jane Updated", "jane@co.com", "IT", "IT Manager")
    );
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fullName"], "Jane Updated");
    assert_eq!(body["role"], "IT Manager");
}

// ---------- attendance ledger ----------

macro_rules! create_employee {
    ($app:expr, $id:expr, $name:expr, $email:expr) => {{
        let resp = post_json!(
            $app,
            "/api/employees",
            employee_body($id, $name, $email, "IT", "Backend Developer")
        );
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body["id"].as_i64().unwrap()
    }};
}

fn mark_body(id: &str, date: &str, status: &str) -> Value {
    json!({"employeeId": id, "date": date, "status": status})
}

#[actix_web::test]
async fn mark_attendance_creates_then_overwrites() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");

    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "Present"));
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Present");
    assert_eq!(body["date"], "2026-02-02");
    assert_eq!(body["employeeId"], "E1");

    // Same (employee, day): overwrite, not duplicate.
    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "Absent"));
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Absent");

    let resp = get!(app, "/api/attendance/E1");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn mark_attendance_normalizes_datetimes_to_the_day() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");

    let resp = post_json!(
        app,
        "/api/attendance",
        mark_body("E1", "2026-02-02T15:45:00Z", "Present")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    // A plain date for the same day hits the same record.
    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "On Leave"));
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn mark_attendance_validates_input() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");

    let resp = post_json!(app, "/api/attendance", json!({"employeeId": "E1"}));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "Late"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(app, "/api/attendance", mark_body("E1", "not-a-date", "Present"));
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = post_json!(app, "/api/attendance", mark_body("NOBODY", "2026-02-02", "Present"));
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn attendance_by_employee_filters_and_counts_present() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");

    for (date, status) in [
        ("2026-02-01", "Present"),
        ("2026-02-02", "Absent"),
        ("2026-02-03", "Present"),
        ("2026-02-10", "On Leave"),
    ] {
        let resp = post_json!(app, "/api/attendance", mark_body("E1", date, status));
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // No filter: everything, newest date first.
    let resp = get!(app, "/api/attendance/E1");
    let body: Value = test::read_body_json(resp).await;
    let dates: Vec<&str> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2026-02-10", "2026-02-03", "2026-02-02", "2026-02-01"]);
    assert_eq!(body["totalPresent"], 2);
    assert_eq!(body["employee"]["employeeId"], "E1");

    // Inclusive range.
    let resp = get!(app, "/api/attendance/E1?start=2026-02-02&end=2026-02-10");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 3);
    assert_eq!(body["totalPresent"], 1);

    // Single day.
    let resp = get!(app, "/api/attendance/E1?date=2026-02-01");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["records"].as_array().unwrap().len(), 1);
    assert_eq!(body["records"][0]["status"], "Present");

    // Unknown employee.
    let resp = get!(app, "/api/attendance/NOBODY");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn attendance_by_date_embeds_employees() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");
    create_employee!(app, "E2", "Bob", "bob@co.com");

    for (id, status) in [("E1", "Present"), ("E2", "Absent")] {
        let resp = post_json!(app, "/api/attendance", mark_body(id, "2026-02-02", status));
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-03", "Present"));
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get!(app, "/api/attendance?date=2026-02-02");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["date"], "2026-02-02");
    let records = body["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    // Most recently created first.
    assert_eq!(records[0]["employee"]["employeeId"], "E2");
    assert_eq!(records[1]["employee"]["employeeId"], "E1");
}

// ---------- summary ----------

#[actix_web::test]
async fn summary_counts_sum_and_track_remarks() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");
    create_employee!(app, "E2", "Bob", "bob@co.com");

    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "Present"));
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get!(app, "/api/attendance/summary?date=2026-02-02");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["totalEmployees"], 2);
    assert_eq!(body["presentToday"], 1);
    assert_eq!(body["absentToday"], 0);
    assert_eq!(body["totalRecords"], 1);

    // Re-mark Present -> Absent: counts move, the record count does not.
    let resp = post_json!(app, "/api/attendance", mark_body("E1", "2026-02-02", "Absent"));
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get!(app, "/api/attendance/summary?date=2026-02-02");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["presentToday"], 0);
    assert_eq!(body["absentToday"], 1);
    assert_eq!(body["totalRecords"], 1);
    let sum = body["presentToday"].as_i64().unwrap()
        + body["absentToday"].as_i64().unwrap()
        + body["onLeaveToday"].as_i64().unwrap();
    assert_eq!(sum, body["totalRecords"].as_i64().unwrap());
}

#[actix_web::test]
async fn summary_ranks_present_tallies_with_name_tiebreak() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Zoe", "zoe@co.com");
    create_employee!(app, "E2", "Amy", "amy@co.com");
    create_employee!(app, "E3", "Max", "max@co.com");

    // Max: 2 present days; Zoe and Amy tie on 1.
    for (id, date) in [
        ("E3", "2026-03-02"),
        ("E3", "2026-03-03"),
        ("E1", "2026-03-02"),
        ("E2", "2026-03-02"),
    ] {
        let resp = post_json!(app, "/api/attendance", mark_body(id, date, "Present"));
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = get!(app, "/api/attendance/summary?date=2026-03-02");
    let body: Value = test::read_body_json(resp).await;
    let names: Vec<&str> = body["presentCounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Max", "Amy", "Zoe"]);
    assert_eq!(body["presentCounts"][0]["presentDays"], 2);
}

// ---------- cascade delete ----------

#[actix_web::test]
async fn deleting_an_employee_removes_their_attendance() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    let id = create_employee!(app, "E1", "Jane", "jane@co.com");
    create_employee!(app, "E2", "Bob", "bob@co.com");

    for eid in ["E1", "E2"] {
        let resp = post_json!(app, "/api/attendance", mark_body(eid, "2026-02-02", "Present"));
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = delete!(app, &format!("/api/employees/{id}"));
    assert_eq!(resp.status(), StatusCode::OK);

    // Gone from the directory and the ledger.
    let resp = get!(app, "/api/attendance/E1");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = get!(app, "/api/attendance?date=2026-02-02");
    let body: Value = test::read_body_json(resp).await;
    let codes: Vec<&str> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["employee"]["employeeId"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["E2"]);

    let resp = delete!(app, &format!("/api/employees/{id}"));
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------- statistics ----------

#[actix_web::test]
async fn statistics_trend_spans_january_to_the_current_month() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");

    // Mark today so the current month has data regardless of the wall clock.
    let today = Local::now().date_naive();
    let resp = post_json!(
        app,
        "/api/attendance",
        mark_body("E1", &today.format("%Y-%m-%d").to_string(), "Present")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get!(app, "/api/attendance/statistics");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;

    let trend = body["monthlyTrend"].as_array().unwrap();
    assert_eq!(trend.len(), today.month() as usize);
    assert_eq!(trend[0]["month"], "Jan");
    assert_eq!(trend[today.month0() as usize]["present"], 1);

    assert_eq!(body["today"]["present"], 1);
    assert_eq!(body["monthSummary"]["present"], 1);
    assert_eq!(body["monthSummary"]["presentPercent"], 100);
    assert_eq!(body["topPresent"][0]["employeeId"], "E1");
}

#[actix_web::test]
async fn statistics_gender_split_defaults_to_fifty_fifty() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");
    create_employee!(app, "E2", "Bob", "bob@co.com");

    let resp = get!(app, "/api/attendance/statistics");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["genderDistribution"]["malePercent"], 50);
    assert_eq!(body["genderDistribution"]["femalePercent"], 50);
    assert_eq!(body["genderDistribution"]["male"], 2);
    assert_eq!(body["genderDistribution"]["female"], 0);
}

#[actix_web::test]
async fn statistics_department_distribution_counts_descending() {
    let pool = memory_pool().await;
    let app = test_app!(pool);
    create_employee!(app, "E1", "Jane", "jane@co.com");
    create_employee!(app, "E2", "Bob", "bob@co.com");

    let resp = post_json!(
        app,
        "/api/employees",
        employee_body("E3", "Cat", "cat@co.com", "HR", "Recruiter")
    );
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get!(app, "/api/attendance/statistics");
    let body: Value = test::read_body_json(resp).await;
    let dist = body["departmentDistribution"].as_array().unwrap();
    assert_eq!(dist[0]["department"], "IT");
    assert_eq!(dist[0]["count"], 2);
    assert_eq!(dist[1]["department"], "HR");
}
