//! Dashboard aggregation. Every figure is derived in one pass over a single
//! snapshot: the current year's attendance joined with employee metadata plus
//! one fetch of the directory, both taken at the same "now". No metric goes
//! back to the store on its own.

use crate::model::attendance::AttendanceStatus;
use crate::model::employee::Employee;
use crate::utils::date::MONTH_LABELS;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// One row of the year snapshot: an attendance record joined with the
/// metadata of the employee who owns it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct YearRecord {
    pub date: NaiveDate,
    pub status: String,
    pub employee_id: String,
    pub full_name: String,
    pub department: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DepartmentCount {
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = 5)]
    pub count: i64,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub present: i64,
    pub absent: i64,
    pub on_leave: i64,
}

impl StatusCounts {
    fn bump(&mut self, status: &str) {
        match AttendanceStatus::parse(status) {
            Some(AttendanceStatus::Present) => self.present += 1,
            Some(AttendanceStatus::Absent) => self.absent += 1,
            Some(AttendanceStatus::OnLeave) => self.on_leave += 1,
            None => {}
        }
    }

    fn total(&self) -> i64 {
        self.present + self.absent + self.on_leave
    }
}

/// Month-to-date counts with independently rounded integer percentages; they
/// need not sum to exactly 100.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub present: i64,
    pub absent: i64,
    pub on_leave: i64,
    pub present_percent: i64,
    pub absent_percent: i64,
    pub on_leave_percent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTally {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = "John Doe")]
    pub full_name: String,
    #[schema(example = "IT")]
    pub department: String,
    #[schema(example = 4)]
    pub days: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthTrend {
    #[schema(example = "Jan")]
    pub month: String,
    pub present: i64,
    pub absent: i64,
    pub on_leave: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBreakdown {
    pub total: i64,
    pub by_department: Vec<DepartmentCount>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenderDistribution {
    pub male: i64,
    pub female: i64,
    pub male_percent: i64,
    pub female_percent: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub department_distribution: Vec<DepartmentCount>,
    pub month_summary: MonthSummary,
    pub top_absentees: Vec<EmployeeTally>,
    pub top_present: Vec<EmployeeTally>,
    pub monthly_trend: Vec<MonthTrend>,
    pub leave: LeaveBreakdown,
    pub today: StatusCounts,
    pub gender_distribution: GenderDistribution,
}

pub fn compute_statistics(
    today: NaiveDate,
    employees: &[Employee],
    records: &[YearRecord],
) -> Statistics {
    Statistics {
        department_distribution: department_distribution(employees),
        month_summary: month_summary(today, records),
        top_absentees: top_by_status(records, AttendanceStatus::Absent),
        top_present: top_by_status(records, AttendanceStatus::Present),
        monthly_trend: monthly_trend(today, records),
        leave: leave_breakdown(records),
        today: day_counts(today, records),
        gender_distribution: gender_distribution(employees),
    }
}

fn department_distribution(employees: &[Employee]) -> Vec<DepartmentCount> {
    let mut by_dept: HashMap<&str, i64> = HashMap::new();
    for e in employees {
        *by_dept.entry(e.department.as_str()).or_default() += 1;
    }
    let mut out: Vec<DepartmentCount> = by_dept
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then(a.department.cmp(&b.department)));
    out
}

fn percent(count: i64, total: i64) -> i64 {
    if total == 0 {
        0
    } else {
        (count as f64 * 100.0 / total as f64).round() as i64
    }
}

fn month_summary(today: NaiveDate, records: &[YearRecord]) -> MonthSummary {
    let mut counts = StatusCounts::default();
    for r in records {
        if r.date.month() == today.month() && r.date.year() == today.year() {
            counts.bump(&r.status);
        }
    }
    let total = counts.total();
    MonthSummary {
        present_percent: percent(counts.present, total),
        absent_percent: percent(counts.absent, total),
        on_leave_percent: percent(counts.on_leave, total),
        present: counts.present,
        absent: counts.absent,
        on_leave: counts.on_leave,
    }
}

/// Year-to-date per-employee tally for one status, top 3 descending. Ties are
/// broken by name ascending so the output is stable.
fn top_by_status(records: &[YearRecord], status: AttendanceStatus) -> Vec<EmployeeTally> {
    let mut per_employee: HashMap<&str, (&YearRecord, i64)> = HashMap::new();
    for r in records {
        if AttendanceStatus::parse(&r.status) != Some(status) {
            continue;
        }
        per_employee
            .entry(r.employee_id.as_str())
            .and_modify(|(_, days)| *days += 1)
            .or_insert((r, 1));
    }
    let mut tallies: Vec<EmployeeTally> = per_employee
        .into_values()
        .map(|(r, days)| EmployeeTally {
            employee_id: r.employee_id.clone(),
            full_name: r.full_name.clone(),
            department: r.department.clone(),
            days,
        })
        .collect();
    tallies.sort_by(|a, b| b.days.cmp(&a.days).then(a.full_name.cmp(&b.full_name)));
    tallies.truncate(3);
    tallies
}

/// January through the current month, one entry per month.
fn monthly_trend(today: NaiveDate, records: &[YearRecord]) -> Vec<MonthTrend> {
    let current_month = today.month() as usize;
    let mut months: Vec<StatusCounts> = (0..current_month).map(|_| StatusCounts::default()).collect();
    for r in records {
        if r.date.year() != today.year() {
            continue;
        }
        let m = r.date.month() as usize;
        if m <= current_month {
            months[m - 1].bump(&r.status);
        }
    }
    months
        .into_iter()
        .enumerate()
        .map(|(i, counts)| MonthTrend {
            month: MONTH_LABELS[i].to_string(),
            present: counts.present,
            absent: counts.absent,
            on_leave: counts.on_leave,
        })
        .collect()
}

fn leave_breakdown(records: &[YearRecord]) -> LeaveBreakdown {
    let mut total = 0;
    let mut by_dept: HashMap<&str, i64> = HashMap::new();
    for r in records {
        if AttendanceStatus::parse(&r.status) == Some(AttendanceStatus::OnLeave) {
            total += 1;
            *by_dept.entry(r.department.as_str()).or_default() += 1;
        }
    }
    let mut by_department: Vec<DepartmentCount> = by_dept
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_string(),
            count,
        })
        .collect();
    by_department.sort_by(|a, b| b.count.cmp(&a.count).then(a.department.cmp(&b.department)));
    LeaveBreakdown {
        total,
        by_department,
    }
}

fn day_counts(day: NaiveDate, records: &[YearRecord]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for r in records {
        if r.date == day {
            counts.bump(&r.status);
        }
    }
    counts
}

/// Employees without a gender recorded are grouped into the male bucket,
/// matching the dashboard's historical grouping. When nobody has a gender set
/// the split is reported as 50/50.
fn gender_distribution(employees: &[Employee]) -> GenderDistribution {
    let mut male = 0;
    let mut female = 0;
    let mut gendered = 0;
    for e in employees {
        match e.gender.as_deref() {
            Some("Female") => {
                female += 1;
                gendered += 1;
            }
            Some(_) => {
                male += 1;
                gendered += 1;
            }
            None => male += 1,
        }
    }
    let (male_percent, female_percent) = if gendered == 0 {
        (50, 50)
    } else {
        let total = male + female;
        (percent(male, total), percent(female, total))
    };
    GenderDistribution {
        male,
        female,
        male_percent,
        female_percent,
    }
}
