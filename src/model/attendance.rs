use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Wire values are the literal strings "Present", "Absent", "On Leave".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
pub enum AttendanceStatus {
    Present,
    Absent,
    #[strum(serialize = "On Leave")]
    OnLeave,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_str(s).ok()
    }
}

/// One status per (employee, calendar day). Day granularity only, no time
/// component; the UNIQUE (employee_id, date) constraint backs the upsert.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,

    /// Business employee id of the owning employee.
    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Present")]
    pub status: String,

    #[schema(example = "2026-02-02T09:00:00", value_type = String)]
    pub created_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_wire_strings() {
        assert_eq!(AttendanceStatus::parse("Present"), Some(AttendanceStatus::Present));
        assert_eq!(AttendanceStatus::parse("Absent"), Some(AttendanceStatus::Absent));
        assert_eq!(AttendanceStatus::parse("On Leave"), Some(AttendanceStatus::OnLeave));
        assert_eq!(AttendanceStatus::OnLeave.to_string(), "On Leave");
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert_eq!(AttendanceStatus::parse("Late"), None);
        assert_eq!(AttendanceStatus::parse("present"), None);
        assert_eq!(AttendanceStatus::parse(""), None);
    }
}
