use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Timelike, Utc};

use crate::database::models::AttendanceStatus;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Hours on the clock needed for a day to count as worked.
pub const REQUIRED_SHIFT_HOURS: i64 = 8;

/// Shift start and the last on-time minute of the start hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start_hour: u32,
    pub late_after_minute: u32,
}

impl ShiftWindow {
    pub const GENERAL: ShiftWindow = ShiftWindow {
        start_hour: 9,
        late_after_minute: 10,
    };
    pub const ROTATIONAL: ShiftWindow = ShiftWindow {
        start_hour: 13,
        late_after_minute: 10,
    };

    pub fn for_employee(is_rotational: bool) -> Self {
        if is_rotational {
            Self::ROTATIONAL
        } else {
            Self::GENERAL
        }
    }
}

/// Great-circle distance between two coordinates, in meters.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * 1000.0
}

pub fn within_geofence(distance: f64, radius_meters: f64) -> bool {
    distance <= radius_meters
}

pub fn clock_in_status(local_time: NaiveTime, shift: ShiftWindow) -> AttendanceStatus {
    let late = local_time.hour() > shift.start_hour
        || (local_time.hour() == shift.start_hour && local_time.minute() > shift.late_after_minute);
    if late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}

/// Final status once the employee clocks out. A short day is recorded as
/// absent regardless of how it started.
pub fn clock_out_status(initial: AttendanceStatus, worked: Duration) -> AttendanceStatus {
    if worked >= Duration::hours(REQUIRED_SHIFT_HOURS) {
        if initial == AttendanceStatus::Late {
            AttendanceStatus::LateComplete
        } else {
            AttendanceStatus::Present
        }
    } else {
        AttendanceStatus::Absent
    }
}

/// Office-local wall clock for a UTC instant.
pub struct OfficeClock {
    offset: FixedOffset,
}

impl OfficeClock {
    pub fn new(offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn local_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    pub fn local_time(&self, at: DateTime<Utc>) -> NaiveTime {
        at.with_timezone(&self.offset).time()
    }

    pub fn local_datetime(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.offset).naive_local()
    }
}

/// "HH:MM" as stored on attendance records
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Time worked from a stored clock-in (office-local day and "HH:MM") up to
/// `logout`. Never negative.
pub fn worked_since(login_day: NaiveDate, login_time: NaiveTime, logout: NaiveDateTime) -> Duration {
    let worked = logout - login_day.and_time(login_time);
    worked.max(Duration::zero())
}

/// Hours as shown to the employee, rounded to two decimals.
pub fn hours_worked(worked: Duration) -> f64 {
    (worked.num_minutes() as f64 / 60.0 * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn distance_between_nearby_points() {
        // roughly 111 m per 0.001 degree of latitude
        let d = distance_meters(12.9716, 77.5946, 12.9726, 77.5946);
        assert!((d - 111.2).abs() < 1.0, "got {}", d);
        assert_eq!(distance_meters(12.9716, 77.5946, 12.9716, 77.5946), 0.0);
    }

    #[test]
    fn geofence_includes_its_radius() {
        assert!(within_geofence(500.0, 500.0));
        assert!(!within_geofence(500.1, 500.0));
    }

    #[test]
    fn late_after_ten_past_the_hour() {
        assert_eq!(clock_in_status(hm(9, 10), ShiftWindow::GENERAL), AttendanceStatus::Present);
        assert_eq!(clock_in_status(hm(9, 11), ShiftWindow::GENERAL), AttendanceStatus::Late);
        assert_eq!(clock_in_status(hm(10, 0), ShiftWindow::GENERAL), AttendanceStatus::Late);
        assert_eq!(clock_in_status(hm(12, 59), ShiftWindow::ROTATIONAL), AttendanceStatus::Present);
        assert_eq!(clock_in_status(hm(13, 30), ShiftWindow::ROTATIONAL), AttendanceStatus::Late);
    }

    #[test]
    fn clock_out_requires_a_full_shift() {
        let full = Duration::hours(8);
        let short = Duration::hours(7) + Duration::minutes(59);

        assert_eq!(clock_out_status(AttendanceStatus::Present, full), AttendanceStatus::Present);
        assert_eq!(clock_out_status(AttendanceStatus::Late, full), AttendanceStatus::LateComplete);
        assert_eq!(clock_out_status(AttendanceStatus::Late, short), AttendanceStatus::Absent);
    }

    #[test]
    fn worked_time_spans_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let same_day = day.and_hms_opt(17, 30, 0).unwrap();
        let next_morning = day.succ_opt().unwrap().and_hms_opt(6, 0, 0).unwrap();

        assert_eq!(worked_since(day, hm(9, 0), same_day), Duration::minutes(510));
        assert_eq!(worked_since(day, hm(22, 0), next_morning), Duration::hours(8));
        assert_eq!(worked_since(day, hm(18, 0), same_day), Duration::zero());
        assert_eq!(hours_worked(Duration::minutes(510)), 8.5);
        assert_eq!(hours_worked(Duration::minutes(20)), 0.33);
    }

    #[test]
    fn office_clock_applies_offset() {
        let clock = OfficeClock::new(330);
        let at = DateTime::parse_from_rfc3339("2024-03-31T20:00:00Z").unwrap().with_timezone(&Utc);

        assert_eq!(clock.local_day(at), NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(format_clock(clock.local_time(at)), "01:30");
        assert_eq!(parse_clock("01:30"), Some(hm(1, 30)));
    }
}
