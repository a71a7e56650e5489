use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{Gender, LeaveType};

/// Stored leave accumulator for one employee, mutated only by the
/// scheduled ticks. The markers record the last period each tick was
/// applied for; `version` guards concurrent writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaveBalanceRecord {
    pub employee_id: String,
    pub gender: Gender,
    pub el: f64,
    pub cl: f64,
    pub sl: f64,
    pub mml: f64,
    pub ml: f64,
    pub pl: f64,
    pub bl: f64,
    /// First day of the last month the monthly accrual ran for
    pub last_monthly_tick: Option<NaiveDate>,
    pub last_yearly_tick: Option<i32>,
    pub version: i64,
    pub updated_at: DateTime<Utc>,
}

impl LeaveBalanceRecord {
    pub const INITIAL_ML: f64 = 182.0;
    pub const INITIAL_PL: f64 = 5.0;
    pub const INITIAL_BL: f64 = 5.0;

    pub fn new(employee_id: impl Into<String>, gender: Gender) -> Self {
        Self {
            employee_id: employee_id.into(),
            gender,
            el: 0.0,
            cl: 0.0,
            sl: 0.0,
            mml: 0.0,
            ml: Self::INITIAL_ML,
            pl: Self::INITIAL_PL,
            bl: Self::INITIAL_BL,
            last_monthly_tick: None,
            last_yearly_tick: None,
            version: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn get(&self, leave_type: LeaveType) -> f64 {
        match leave_type {
            LeaveType::El => self.el,
            LeaveType::Cl => self.cl,
            LeaveType::Sl => self.sl,
            LeaveType::Mml => self.mml,
            LeaveType::Ml => self.ml,
            LeaveType::Pl => self.pl,
            LeaveType::Bl => self.bl,
        }
    }
}
