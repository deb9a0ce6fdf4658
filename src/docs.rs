use crate::api::attendance::{
    AttendanceWithEmployee, DayAttendanceResponse, EmployeeAttendanceResponse,
    MarkAttendancePayload, PresentTally, SummaryResponse,
};
use crate::api::employee::EmployeePayload;
use crate::error::FieldError;
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::Employee;
use crate::stats::{
    DepartmentCount, EmployeeTally, GenderDistribution, LeaveBreakdown, MonthSummary, MonthTrend,
    Statistics, StatusCounts,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Lite API",
        version = "1.0.0",
        description = r#"
## HR Lite

A small HR service: employee directory plus a per-day attendance ledger with
dashboard reporting.

### Key Features
- **Employee Directory**
  - Create, update, list, and delete employee records
- **Attendance Ledger**
  - One Present / Absent / On Leave status per employee per calendar day
  - Point, range, and day listings
- **Reporting**
  - Daily summary and a month/year-to-date statistics dashboard

### Response Format
- JSON-based RESTful responses
- Errors are `{"message"}` bodies with 400/404/409/500 codes
"#,
    ),
    paths(
        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_by_employee,
        crate::api::attendance::list_attendance_by_date,
        crate::api::attendance::attendance_summary,

        crate::api::statistics::get_statistics,
    ),
    components(
        schemas(
            Employee,
            EmployeePayload,
            FieldError,
            AttendanceRecord,
            MarkAttendancePayload,
            EmployeeAttendanceResponse,
            AttendanceWithEmployee,
            DayAttendanceResponse,
            SummaryResponse,
            PresentTally,
            Statistics,
            DepartmentCount,
            StatusCounts,
            MonthSummary,
            MonthTrend,
            EmployeeTally,
            LeaveBreakdown,
            GenderDistribution
        )
    ),
    tags(
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance ledger and reporting APIs"),
    )
)]
pub struct ApiDoc;
