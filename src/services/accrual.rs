//! Period-boundary mutations of the stored leave accumulators.
//!
//! Each tick records the period it was applied for on the record itself,
//! so invoking it again for the same period is a no-op.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::LeaveBalanceRecord;
use crate::services::EngineError;
use crate::services::leave_calculator::{CL_RATE, EL_RATE, MML_MONTHLY, SL_RATE, round2};

/// A calendar month a monthly tick applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccrualPeriod {
    pub year: i32,
    pub month: u32,
}

impl AccrualPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(EngineError::InvalidInput(format!(
                "invalid accrual period {}-{}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the period, the value stored as the monthly marker.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn starts_year(&self) -> bool {
        self.month == 1
    }
}

impl fmt::Display for AccrualPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    Applied,
    AlreadyApplied,
}

/// Monthly accrual: refills MML to exactly one day for women and adds the
/// full monthly EL, CL and SL rates.
pub fn apply_monthly_accrual_tick(record: &mut LeaveBalanceRecord, period: AccrualPeriod) -> TickOutcome {
    let marker = period.first_day();
    if record.last_monthly_tick.is_some_and(|last| last >= marker) {
        return TickOutcome::AlreadyApplied;
    }

    if record.gender.is_female() {
        record.mml = MML_MONTHLY;
    }
    record.el = round2(record.el + EL_RATE.full);
    record.cl = round2(record.cl + CL_RATE.full);
    record.sl = round2(record.sl + SL_RATE.full);

    record.last_monthly_tick = Some(marker);
    touch(record);
    TickOutcome::Applied
}

/// Yearly reset: CL and SL expire, EL carries over.
pub fn apply_yearly_reset_tick(record: &mut LeaveBalanceRecord, year: i32) -> TickOutcome {
    if record.last_yearly_tick.is_some_and(|last| last >= year) {
        return TickOutcome::AlreadyApplied;
    }

    record.cl = 0.0;
    record.sl = 0.0;

    record.last_yearly_tick = Some(year);
    touch(record);
    TickOutcome::Applied
}

fn touch(record: &mut LeaveBalanceRecord) {
    record.version += 1;
    record.updated_at = Utc::now();
}
