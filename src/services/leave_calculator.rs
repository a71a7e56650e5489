//! Accrued-to-date leave entitlement, net of usage.
//!
//! EL accrues every month from the joining month and carries forward up to a
//! lifetime cap. CL and SL accrue the same way but only within the current
//! calendar year. MML, ML, PL and BL are fixed grants gated by gender.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::database::models::{Gender, LeaveType};
use crate::services::EngineError;

/// Full and half (joined after the 15th) monthly rates.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyRate {
    pub full: f64,
    pub half: f64,
}

pub const EL_RATE: MonthlyRate = MonthlyRate { full: 1.75, half: 0.87 };
pub const EL_CAP: f64 = 45.0;
pub const CL_RATE: MonthlyRate = MonthlyRate { full: 0.83, half: 0.41 };
pub const SL_RATE: MonthlyRate = MonthlyRate { full: 0.75, half: 0.37 };

pub const MML_MONTHLY: f64 = 1.0;
pub const ML_YEARLY: f64 = 182.0;
pub const PL_YEARLY: f64 = 5.0;
pub const BL_YEARLY: f64 = 5.0;

/// Joining on or before this day of the month earns the full rate.
pub const HALF_RATE_CUTOFF_DAY: u32 = 15;

pub type UsedDays = HashMap<LeaveType, f64>;

/// Available days per leave type, always non-negative and rounded to
/// two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LeaveBalance(BTreeMap<LeaveType, f64>);

impl LeaveBalance {
    pub fn get(&self, leave_type: LeaveType) -> f64 {
        self.0.get(&leave_type).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LeaveType, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// Computes balances as of the current UTC date.
pub fn compute_balance(
    join_date: Option<NaiveDate>,
    gender: Gender,
    used: &UsedDays,
) -> Result<LeaveBalance, EngineError> {
    compute_balance_as_of(join_date, gender, used, Utc::now().date_naive())
}

pub fn compute_balance_as_of(
    join_date: Option<NaiveDate>,
    gender: Gender,
    used: &UsedDays,
    today: NaiveDate,
) -> Result<LeaveBalance, EngineError> {
    let join_date =
        join_date.ok_or_else(|| EngineError::InvalidInput("date of joining is missing".into()))?;

    let accrued = accrue(join_date, gender, today);

    let balance = LeaveType::ALL
        .iter()
        .map(|&leave_type| {
            let accrued = accrued.get(&leave_type).copied().unwrap_or(0.0);
            let used = used.get(&leave_type).copied().unwrap_or(0.0);
            (leave_type, clamp_non_negative(round2(accrued - used)))
        })
        .collect();

    Ok(LeaveBalance(balance))
}

/// Parses a joining date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp, in which case only its date part is used.
pub fn parse_join_date(raw: &str) -> Result<NaiveDate, EngineError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(EngineError::InvalidInput("date of joining is missing".into()));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| EngineError::InvalidInput(format!("malformed date of joining: {}", raw)))
}

fn accrue(join_date: NaiveDate, gender: Gender, today: NaiveDate) -> BTreeMap<LeaveType, f64> {
    let mut accrued = BTreeMap::new();

    let el = accrue_monthly(join_date, join_date, today, EL_RATE).min(EL_CAP);
    accrued.insert(LeaveType::El, el);

    let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    let window_start = year_start.max(join_date);
    accrued.insert(
        LeaveType::Cl,
        accrue_monthly(window_start, join_date, today, CL_RATE),
    );
    accrued.insert(
        LeaveType::Sl,
        accrue_monthly(window_start, join_date, today, SL_RATE),
    );

    accrued.insert(LeaveType::Bl, BL_YEARLY);
    if gender.is_female() {
        accrued.insert(LeaveType::Ml, ML_YEARLY);
        accrued.insert(LeaveType::Mml, MML_MONTHLY);
        accrued.insert(LeaveType::Pl, 0.0);
    } else {
        accrued.insert(LeaveType::Pl, PL_YEARLY);
        accrued.insert(LeaveType::Ml, 0.0);
        accrued.insert(LeaveType::Mml, 0.0);
    }

    accrued
}

/// Walks month by month from the first day of `start`'s month while the
/// cursor is not after `today`. Months of the joining year before the
/// joining month earn nothing; the joining month earns the half rate when
/// the employee joined after the cutoff day.
fn accrue_monthly(start: NaiveDate, join_date: NaiveDate, today: NaiveDate, rate: MonthlyRate) -> f64 {
    let mut total = 0.0;
    let mut cursor = first_of_month(start);

    while cursor <= today {
        let before_joining = cursor.year() == join_date.year() && cursor.month() < join_date.month();
        let joining_month = cursor.year() == join_date.year() && cursor.month() == join_date.month();

        if !before_joining {
            total += if joining_month && join_date.day() > HALF_RATE_CUTOFF_DAY {
                rate.half
            } else {
                rate.full
            };
        }

        cursor = match cursor.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    total
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn clamp_non_negative(value: f64) -> f64 {
    if value <= 0.0 { 0.0 } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn accrues_full_months_from_joining_month() {
        let balance =
            compute_balance_as_of(Some(date(2023, 1, 10)), Gender::Male, &UsedDays::new(), date(2023, 3, 1))
                .unwrap();

        assert_eq!(balance.get(LeaveType::El), 5.25);
        assert_eq!(balance.get(LeaveType::Cl), 2.49);
        assert_eq!(balance.get(LeaveType::Sl), 2.25);
    }

    #[test]
    fn half_rate_only_after_the_fifteenth() {
        let today = date(2024, 6, 20);
        let on_15th =
            compute_balance_as_of(Some(date(2024, 6, 15)), Gender::Male, &UsedDays::new(), today).unwrap();
        let on_16th =
            compute_balance_as_of(Some(date(2024, 6, 16)), Gender::Male, &UsedDays::new(), today).unwrap();

        assert_eq!(on_15th.get(LeaveType::El), 1.75);
        assert_eq!(on_15th.get(LeaveType::Cl), 0.83);
        assert_eq!(on_15th.get(LeaveType::Sl), 0.75);
        assert_eq!(on_16th.get(LeaveType::El), 0.87);
        assert_eq!(on_16th.get(LeaveType::Cl), 0.41);
        assert_eq!(on_16th.get(LeaveType::Sl), 0.37);
    }

    #[test]
    fn current_month_counts_from_its_first_day() {
        let balance =
            compute_balance_as_of(Some(date(2024, 1, 5)), Gender::Male, &UsedDays::new(), date(2024, 2, 1))
                .unwrap();

        assert_eq!(balance.get(LeaveType::El), 3.5);
    }

    #[test]
    fn earned_leave_is_capped() {
        let balance =
            compute_balance_as_of(Some(date(2014, 3, 1)), Gender::Other, &UsedDays::new(), date(2024, 3, 1))
                .unwrap();

        assert_eq!(balance.get(LeaveType::El), EL_CAP);
    }

    #[test]
    fn cap_applies_before_usage_is_deducted() {
        let used = UsedDays::from([(LeaveType::El, 5.0)]);
        let balance =
            compute_balance_as_of(Some(date(2010, 1, 1)), Gender::Male, &used, date(2024, 1, 1)).unwrap();

        assert_eq!(balance.get(LeaveType::El), 40.0);
    }

    #[test]
    fn casual_and_sick_reset_each_year() {
        let balance =
            compute_balance_as_of(Some(date(2015, 7, 20)), Gender::Male, &UsedDays::new(), date(2024, 1, 2))
                .unwrap();

        assert_eq!(balance.get(LeaveType::Cl), 0.83);
        assert_eq!(balance.get(LeaveType::Sl), 0.75);
    }

    #[test]
    fn joining_mid_year_starts_casual_window_at_joining_month() {
        let balance =
            compute_balance_as_of(Some(date(2024, 4, 20)), Gender::Male, &UsedDays::new(), date(2024, 6, 30))
                .unwrap();

        // April half, May and June full
        assert_eq!(balance.get(LeaveType::Cl), 2.07);
        assert_eq!(balance.get(LeaveType::Sl), 1.87);
        assert_eq!(balance.get(LeaveType::El), 4.37);
    }

    #[test]
    fn fixed_grants_depend_on_gender() {
        let female =
            compute_balance_as_of(Some(date(2024, 1, 1)), Gender::Female, &UsedDays::new(), date(2024, 5, 1))
                .unwrap();
        let male =
            compute_balance_as_of(Some(date(2024, 1, 1)), Gender::Male, &UsedDays::new(), date(2024, 5, 1))
                .unwrap();

        assert_eq!(female.get(LeaveType::Ml), 182.0);
        assert_eq!(female.get(LeaveType::Mml), 1.0);
        assert_eq!(female.get(LeaveType::Pl), 0.0);
        assert_eq!(female.get(LeaveType::Bl), 5.0);
        assert_eq!(male.get(LeaveType::Pl), 5.0);
        assert_eq!(male.get(LeaveType::Ml), 0.0);
        assert_eq!(male.get(LeaveType::Mml), 0.0);
        assert_eq!(male.get(LeaveType::Bl), 5.0);
    }

    #[test]
    fn usage_never_drives_a_balance_negative() {
        let used = UsedDays::from([(LeaveType::Cl, 10.0), (LeaveType::Bl, 5.0), (LeaveType::Pl, 6.5)]);
        let balance =
            compute_balance_as_of(Some(date(2024, 1, 1)), Gender::Male, &used, date(2024, 2, 1)).unwrap();

        assert_eq!(balance.get(LeaveType::Cl), 0.0);
        assert_eq!(balance.get(LeaveType::Bl), 0.0);
        assert_eq!(balance.get(LeaveType::Pl), 0.0);
        assert!(balance.iter().all(|(_, v)| v >= 0.0 && v.is_sign_positive()));
    }

    #[test]
    fn future_joiner_accrues_nothing_monthly() {
        let balance =
            compute_balance_as_of(Some(date(2025, 1, 1)), Gender::Male, &UsedDays::new(), date(2024, 12, 1))
                .unwrap();

        assert_eq!(balance.get(LeaveType::El), 0.0);
        assert_eq!(balance.get(LeaveType::Cl), 0.0);
        assert_eq!(balance.get(LeaveType::Bl), 5.0);
    }

    #[test]
    fn missing_join_date_is_rejected() {
        let err = compute_balance_as_of(None, Gender::Male, &UsedDays::new(), date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn parses_plain_and_timestamp_join_dates() {
        assert_eq!(parse_join_date("2023-05-17").unwrap(), date(2023, 5, 17));
        assert_eq!(parse_join_date("2023-05-17T00:00:00Z").unwrap(), date(2023, 5, 17));
        assert!(parse_join_date("").is_err());
        assert!(parse_join_date("17/05/2023").is_err());
    }

    #[test]
    fn gender_parsing_is_case_insensitive_and_permissive() {
        assert_eq!(Gender::from_optional(Some("FEMALE")), Gender::Female);
        assert_eq!(Gender::from_optional(Some("female")), Gender::Female);
        assert_eq!(Gender::from_optional(Some("other")), Gender::Other);
        assert_eq!(Gender::from_optional(Some("unknown")), Gender::Male);
        assert_eq!(Gender::from_optional(None), Gender::Male);
    }
}
