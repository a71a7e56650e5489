//! Monthly calendar view for one employee, merged from holidays, approved
//! leaves, approved regularizations and attendance.
//!
//! Sources are applied in a fixed order: holidays, then leaves, then
//! regularizations overwrite whatever the day held; attendance is merged in
//! last. Attendance on a holiday or leave day keeps that day's type, status
//! and color and only contributes its clock times.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};

use crate::database::models::{Attendance, AttendanceStatus, Holiday, LeaveRequest, Regularization, RequestStatus};
use crate::services::EngineError;

pub const HOLIDAY_STATUS: &str = "HOLIDAY";
pub const APPROVED_STATUS: &str = "Approved";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalendarEntryType {
    Holiday,
    Leave,
    Regularization,
    Attendance,
    Absent,
}

/// Presentation color of a calendar day, serialized as its hex token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarColor {
    Holiday,
    CasualLeave,
    SickLeave,
    EarnedLeave,
    MaternityLeave,
    PaternityLeave,
    BereavementLeave,
    OtherLeave,
    Regularization,
    Success,
    Warning,
    Failure,
}

impl CalendarColor {
    pub fn hex(&self) -> &'static str {
        match self {
            CalendarColor::Holiday => "#9c27b0",
            CalendarColor::CasualLeave => "#e67e22",
            CalendarColor::SickLeave => "#e74c3c",
            CalendarColor::EarnedLeave => "#f1c40f",
            CalendarColor::MaternityLeave => "#e91e63",
            CalendarColor::PaternityLeave => "#3498db",
            CalendarColor::BereavementLeave => "#95a5a6",
            CalendarColor::OtherLeave => "#ff9800",
            CalendarColor::Regularization => "#00bcd4",
            CalendarColor::Success => "#4caf50",
            CalendarColor::Warning => "#ffeb3b",
            CalendarColor::Failure => "#f44336",
        }
    }
}

impl Serialize for CalendarColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDayEntry {
    #[serde(rename = "type")]
    pub entry_type: CalendarEntryType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    pub status: String,
    pub color: CalendarColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_verified: Option<bool>,
}

impl CalendarDayEntry {
    fn new(entry_type: CalendarEntryType, status: impl Into<String>, color: CalendarColor) -> Self {
        Self {
            entry_type,
            sub_type: None,
            status: status.into(),
            color,
            title: None,
            details: None,
            reason: None,
            login_time: None,
            logout_time: None,
            location_verified: None,
        }
    }

    fn attach_attendance(&mut self, attendance: &Attendance) {
        self.login_time = Some(attendance.login_time.clone());
        self.logout_time = attendance.logout_time.clone();
        self.location_verified = Some(attendance.location_verified);
    }
}

/// Days with at least one record, keyed by calendar date.
pub type CalendarSummary = BTreeMap<NaiveDate, CalendarDayEntry>;

/// How two records of the same kind landing on the same day are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// The record later in the input list wins.
    #[default]
    InputOrder,
    /// The most recently created record wins; equal timestamps fall back
    /// to input order.
    LatestCreated,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub tie_break: TieBreak,
}

/// First and last day of the month.
pub fn month_bounds(month: u32, year: i32) -> Result<(NaiveDate, NaiveDate), EngineError> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidInput(format!("month must be 1-12, got {}", month)));
    }

    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidInput(format!("year {} is out of range", year)))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(|| EngineError::InvalidInput(format!("year {} is out of range", year)))?;

    Ok((first, last))
}

/// Color for a leave code; unknown codes get the generic leave color.
pub fn leave_color(code: &str) -> CalendarColor {
    match code.trim().to_lowercase().as_str() {
        "cl" => CalendarColor::CasualLeave,
        "sl" => CalendarColor::SickLeave,
        "el" => CalendarColor::EarnedLeave,
        "ml" => CalendarColor::MaternityLeave,
        "pl" => CalendarColor::PaternityLeave,
        "bl" => CalendarColor::BereavementLeave,
        _ => CalendarColor::OtherLeave,
    }
}

pub fn attendance_color(status: AttendanceStatus) -> CalendarColor {
    match status {
        AttendanceStatus::Present | AttendanceStatus::LateComplete => CalendarColor::Success,
        AttendanceStatus::Late => CalendarColor::Warning,
        _ => CalendarColor::Failure,
    }
}

pub fn merge_calendar(
    month: u32,
    year: i32,
    attendance: &[Attendance],
    holidays: &[Holiday],
    leaves: &[LeaveRequest],
    regularizations: &[Regularization],
) -> Result<CalendarSummary, EngineError> {
    merge_calendar_with(
        MergeOptions::default(),
        month,
        year,
        attendance,
        holidays,
        leaves,
        regularizations,
    )
}

pub fn merge_calendar_with(
    options: MergeOptions,
    month: u32,
    year: i32,
    attendance: &[Attendance],
    holidays: &[Holiday],
    leaves: &[LeaveRequest],
    regularizations: &[Regularization],
) -> Result<CalendarSummary, EngineError> {
    let (first, last) = month_bounds(month, year)?;
    let in_month = |date: NaiveDate| date >= first && date <= last;
    let mut summary = CalendarSummary::new();

    for holiday in ordered(holidays, options.tie_break, |h| h.created_at) {
        if !in_month(holiday.date) {
            continue;
        }
        let mut entry = CalendarDayEntry::new(CalendarEntryType::Holiday, HOLIDAY_STATUS, CalendarColor::Holiday);
        entry.title = Some(holiday.name.clone());
        entry.details = holiday.description.clone();
        summary.insert(holiday.date, entry);
    }

    for leave in ordered(leaves, options.tie_break, |l| l.created_at) {
        if leave.status != RequestStatus::Approved {
            continue;
        }
        let mut day = leave.from_date.max(first);
        let end = leave.to_date.min(last);
        while day <= end {
            let mut entry =
                CalendarDayEntry::new(CalendarEntryType::Leave, APPROVED_STATUS, leave_color(&leave.leave_type));
            entry.sub_type = Some(leave.leave_type.to_uppercase());
            entry.reason = Some(leave.reason.clone());
            summary.insert(day, entry);

            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
    }

    for regularization in ordered(regularizations, options.tie_break, |r| r.created_at) {
        if regularization.status != RequestStatus::Approved || !in_month(regularization.date) {
            continue;
        }
        let mut entry = CalendarDayEntry::new(
            CalendarEntryType::Regularization,
            APPROVED_STATUS,
            CalendarColor::Regularization,
        );
        entry.sub_type = Some(regularization.request_type.clone());
        entry.reason = Some(regularization.reason.clone());
        summary.insert(regularization.date, entry);
    }

    for record in ordered(attendance, options.tie_break, |a| a.created_at) {
        if !in_month(record.date) {
            continue;
        }
        let absent = record.status == AttendanceStatus::Absent;

        let entry = summary.entry(record.date).or_insert_with(|| {
            CalendarDayEntry::new(CalendarEntryType::Absent, record.status.as_str(), attendance_color(record.status))
        });

        // holidays and leaves keep their status and color under attendance
        let special = matches!(entry.entry_type, CalendarEntryType::Holiday | CalendarEntryType::Leave);
        if !absent {
            entry.entry_type = CalendarEntryType::Attendance;
        }
        if !special {
            entry.status = record.status.as_str().to_string();
            entry.color = attendance_color(record.status);
        }
        entry.attach_attendance(record);
    }

    log::debug!(
        "Merged calendar for {}-{:02}: {} day(s) across {} source record(s)",
        first.year(),
        first.month(),
        summary.len(),
        attendance.len() + holidays.len() + leaves.len() + regularizations.len()
    );

    Ok(summary)
}

fn ordered<T, K: Ord>(records: &[T], tie_break: TieBreak, key: impl Fn(&T) -> K) -> Vec<&T> {
    let mut refs: Vec<&T> = records.iter().collect();
    if tie_break == TieBreak::LatestCreated {
        // stable: equal keys keep input order
        refs.sort_by_key(|r| key(*r));
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(day: NaiveDate, name: &str) -> Holiday {
        Holiday {
            id: Uuid::new_v4(),
            date: day,
            name: name.to_string(),
            description: Some(format!("{} holiday", name)),
            created_at: Utc::now(),
        }
    }

    fn leave(code: &str, from: NaiveDate, to: NaiveDate) -> LeaveRequest {
        let now = Utc::now();
        LeaveRequest {
            id: Uuid::new_v4(),
            employee_id: "EMP001".to_string(),
            employee_name: None,
            department: None,
            leave_type: code.to_string(),
            from_date: from,
            to_date: to,
            total_days: (to - from).num_days() as f64 + 1.0,
            reason: "family".to_string(),
            description: None,
            status: RequestStatus::Approved,
            admin_remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn regularization(day: NaiveDate, kind: &str) -> Regularization {
        let now = Utc::now();
        Regularization {
            id: Uuid::new_v4(),
            employee_id: "EMP001".to_string(),
            date: day,
            request_type: kind.to_string(),
            reason: "client visit".to_string(),
            status: RequestStatus::Approved,
            admin_remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn attendance(day: NaiveDate, status: AttendanceStatus, login: &str) -> Attendance {
        let now = Utc::now();
        Attendance {
            id: Uuid::new_v4(),
            employee_id: "EMP001".to_string(),
            date: day,
            login_time: login.to_string(),
            logout_time: Some("18:05".to_string()),
            status,
            location_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_sources_give_empty_calendar() {
        let summary = merge_calendar(3, 2024, &[], &[], &[], &[]).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn rejects_invalid_month() {
        assert!(merge_calendar(0, 2024, &[], &[], &[], &[]).is_err());
        assert!(merge_calendar(13, 2024, &[], &[], &[], &[]).is_err());
    }

    #[test]
    fn month_bounds_handle_leap_february() {
        assert_eq!(month_bounds(2, 2024).unwrap(), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds(12, 2023).unwrap(), (date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn holiday_entry_carries_sentinel_status() {
        let summary = merge_calendar(1, 2024, &[], &[holiday(date(2024, 1, 26), "Republic Day")], &[], &[]).unwrap();
        let entry = &summary[&date(2024, 1, 26)];

        assert_eq!(entry.entry_type, CalendarEntryType::Holiday);
        assert_eq!(entry.status, HOLIDAY_STATUS);
        assert_eq!(entry.color, CalendarColor::Holiday);
        assert_eq!(entry.title.as_deref(), Some("Republic Day"));
    }

    #[test]
    fn leave_overwrites_holiday_and_is_clipped_to_month() {
        let summary = merge_calendar(
            1,
            2024,
            &[],
            &[holiday(date(2024, 1, 1), "New Year")],
            &[leave("cl", date(2023, 12, 30), date(2024, 1, 2))],
            &[],
        )
        .unwrap();

        assert_eq!(summary.len(), 2);
        let entry = &summary[&date(2024, 1, 1)];
        assert_eq!(entry.entry_type, CalendarEntryType::Leave);
        assert_eq!(entry.sub_type.as_deref(), Some("CL"));
        assert_eq!(entry.status, APPROVED_STATUS);
        assert_eq!(entry.color, CalendarColor::CasualLeave);
        assert!(!summary.contains_key(&date(2023, 12, 31)));
    }

    #[test]
    fn unknown_leave_code_uses_default_color() {
        assert_eq!(leave_color("MML"), CalendarColor::OtherLeave);
        assert_eq!(leave_color("wfh"), CalendarColor::OtherLeave);
        assert_eq!(leave_color("SL"), CalendarColor::SickLeave);
    }

    #[test]
    fn regularization_overwrites_leave() {
        let day = date(2024, 5, 10);
        let summary =
            merge_calendar(5, 2024, &[], &[], &[leave("el", day, day)], &[regularization(day, "on_duty")]).unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Regularization);
        assert_eq!(entry.sub_type.as_deref(), Some("on_duty"));
        assert_eq!(entry.color, CalendarColor::Regularization);
    }

    #[test]
    fn attendance_on_leave_day_keeps_leave_status_and_adds_times() {
        let day = date(2024, 5, 13);
        let summary = merge_calendar(
            5,
            2024,
            &[attendance(day, AttendanceStatus::Present, "09:02")],
            &[],
            &[leave("sl", day, day)],
            &[],
        )
        .unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Attendance);
        assert_eq!(entry.sub_type.as_deref(), Some("SL"));
        assert_eq!(entry.status, APPROVED_STATUS);
        assert_eq!(entry.color, CalendarColor::SickLeave);
        assert_eq!(entry.login_time.as_deref(), Some("09:02"));
        assert_eq!(entry.location_verified, Some(true));
    }

    #[test]
    fn attendance_on_holiday_keeps_holiday_status_and_adds_times() {
        let day = date(2024, 8, 15);
        let mut record = attendance(day, AttendanceStatus::Present, "09:05");
        record.logout_time = Some("17:20".to_string());

        let summary =
            merge_calendar(8, 2024, &[record], &[holiday(day, "Independence Day")], &[], &[]).unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Attendance);
        assert_eq!(entry.status, HOLIDAY_STATUS);
        assert_eq!(entry.color, CalendarColor::Holiday);
        assert_eq!(entry.title.as_deref(), Some("Independence Day"));
        assert_eq!(entry.login_time.as_deref(), Some("09:05"));
        assert_eq!(entry.logout_time.as_deref(), Some("17:20"));
        assert_eq!(entry.location_verified, Some(true));
    }

    #[test]
    fn absent_attendance_on_holiday_stays_a_holiday() {
        let day = date(2024, 8, 15);
        let summary = merge_calendar(
            8,
            2024,
            &[attendance(day, AttendanceStatus::Absent, "10:00")],
            &[holiday(day, "Independence Day")],
            &[],
            &[],
        )
        .unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Holiday);
        assert_eq!(entry.status, HOLIDAY_STATUS);
        assert_eq!(entry.color, CalendarColor::Holiday);
        assert_eq!(entry.login_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn attendance_on_regularized_day_takes_over_status() {
        let day = date(2024, 5, 14);
        let summary = merge_calendar(
            5,
            2024,
            &[attendance(day, AttendanceStatus::Late, "09:40")],
            &[],
            &[],
            &[regularization(day, "on_duty")],
        )
        .unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Attendance);
        assert_eq!(entry.status, "Late");
        assert_eq!(entry.color, CalendarColor::Warning);
        assert_eq!(entry.sub_type.as_deref(), Some("on_duty"));
    }

    #[test]
    fn absent_on_regularized_day_keeps_regularization_type() {
        let day = date(2024, 5, 15);
        let summary = merge_calendar(
            5,
            2024,
            &[attendance(day, AttendanceStatus::Absent, "09:00")],
            &[],
            &[],
            &[regularization(day, "on_duty")],
        )
        .unwrap();
        let entry = &summary[&day];

        assert_eq!(entry.entry_type, CalendarEntryType::Regularization);
        assert_eq!(entry.status, "Absent");
        assert_eq!(entry.color, CalendarColor::Failure);
    }

    #[test]
    fn lone_absent_record_is_absent() {
        let day = date(2024, 5, 16);
        let summary = merge_calendar(5, 2024, &[attendance(day, AttendanceStatus::Absent, "09:00")], &[], &[], &[])
            .unwrap();

        assert_eq!(summary[&day].entry_type, CalendarEntryType::Absent);
        assert_eq!(summary[&day].color, CalendarColor::Failure);
    }

    #[test]
    fn attendance_colors_follow_status() {
        assert_eq!(attendance_color(AttendanceStatus::Present), CalendarColor::Success);
        assert_eq!(attendance_color(AttendanceStatus::LateComplete), CalendarColor::Success);
        assert_eq!(attendance_color(AttendanceStatus::Late), CalendarColor::Warning);
        assert_eq!(attendance_color(AttendanceStatus::Complete), CalendarColor::Failure);
        assert_eq!(attendance_color(AttendanceStatus::Absent), CalendarColor::Failure);
    }

    #[test]
    fn pending_requests_are_ignored() {
        let day = date(2024, 5, 17);
        let mut pending = leave("cl", day, day);
        pending.status = RequestStatus::Pending;

        let summary = merge_calendar(5, 2024, &[], &[], &[pending], &[]).unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn tie_break_by_creation_time() {
        let day = date(2024, 6, 3);
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut newer = leave("el", day, day);
        newer.created_at = base + Duration::days(2);
        let mut older = leave("sl", day, day);
        older.created_at = base;

        let input = [newer, older];
        let by_order = merge_calendar(6, 2024, &[], &[], &input, &[]).unwrap();
        let by_created = merge_calendar_with(
            MergeOptions { tie_break: TieBreak::LatestCreated },
            6,
            2024,
            &[],
            &[],
            &input,
            &[],
        )
        .unwrap();

        assert_eq!(by_order[&day].sub_type.as_deref(), Some("SL"));
        assert_eq!(by_created[&day].sub_type.as_deref(), Some("EL"));
    }

    #[test]
    fn merging_twice_gives_identical_results() {
        let day = date(2024, 7, 1);
        let attendance = [attendance(day, AttendanceStatus::Present, "08:55")];
        let holidays = [holiday(date(2024, 7, 4), "Founders Day")];

        let first = merge_calendar(7, 2024, &attendance, &holidays, &[], &[]).unwrap();
        let second = merge_calendar(7, 2024, &attendance, &holidays, &[], &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_with_day_keys_and_hex_colors() {
        let summary = merge_calendar(1, 2024, &[], &[holiday(date(2024, 1, 26), "Republic Day")], &[], &[]).unwrap();
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["2024-01-26"]["type"], "Holiday");
        assert_eq!(json["2024-01-26"]["status"], "HOLIDAY");
        assert_eq!(json["2024-01-26"]["color"], "#9c27b0");
        assert!(json["2024-01-26"].get("loginTime").is_none());
    }
}
