use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, bail};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use hmis::database::models::{Gender, LeaveBalanceRecord};
use hmis::services::accrual::AccrualPeriod;
use hmis::services::scheduler::{BalanceStore, TickKind, TickRunner};

mod common;

/// Balances kept in memory with the same optimistic version check as the
/// database store. Saves for `failing` always error.
#[derive(Clone, Default)]
struct MemoryStore {
    records: Arc<Mutex<BTreeMap<String, LeaveBalanceRecord>>>,
    failing: Option<String>,
}

impl MemoryStore {
    fn with(records: Vec<LeaveBalanceRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(
                records
                    .into_iter()
                    .map(|r| (r.employee_id.clone(), r))
                    .collect(),
            )),
            failing: None,
        }
    }

    fn failing_for(mut self, employee_id: &str) -> Self {
        self.failing = Some(employee_id.to_string());
        self
    }

    fn get(&self, employee_id: &str) -> LeaveBalanceRecord {
        self.records.lock().unwrap()[employee_id].clone()
    }
}

impl BalanceStore for MemoryStore {
    async fn list_balances(&self) -> Result<Vec<LeaveBalanceRecord>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }

    async fn save_balance(&self, record: &LeaveBalanceRecord, expected_version: i64) -> Result<()> {
        if self.failing.as_deref() == Some(record.employee_id.as_str()) {
            bail!("storage unavailable for {}", record.employee_id);
        }

        let mut records = self.records.lock().unwrap();
        let stored = records
            .get_mut(&record.employee_id)
            .ok_or_else(|| anyhow::anyhow!("unknown employee {}", record.employee_id))?;
        if stored.version != expected_version {
            bail!("version conflict for {}", record.employee_id);
        }
        *stored = record.clone();
        Ok(())
    }
}

fn period(year: i32, month: u32) -> AccrualPeriod {
    AccrualPeriod::new(year, month).unwrap()
}

fn staff() -> Vec<LeaveBalanceRecord> {
    vec![
        common::balance("EMP001", Gender::Female),
        common::balance("EMP002", Gender::Male),
        common::balance("EMP003", Gender::Other),
    ]
}

#[actix_web::test]
async fn monthly_run_accrues_every_employee_once() {
    let store = MemoryStore::with(staff());
    let runner = TickRunner::new(store.clone());

    let first = runner.run_monthly(period(2024, 3)).await.unwrap();
    let second = runner.run_monthly(period(2024, 3)).await.unwrap();

    assert_eq!(first.kind, TickKind::MonthlyAccrual);
    assert_eq!(first.period, "2024-03");
    assert_eq!(first.applied, vec!["EMP001", "EMP002", "EMP003"]);
    assert!(first.is_clean());
    assert!(second.applied.is_empty());
    assert_eq!(second.skipped.len(), 3);

    let female = store.get("EMP001");
    assert_eq!(female.el, 1.75);
    assert_eq!(female.mml, 1.0);
    assert_eq!(female.version, 1);
    assert_eq!(female.last_monthly_tick, NaiveDate::from_ymd_opt(2024, 3, 1));
    assert_eq!(store.get("EMP002").mml, 0.0);
}

#[actix_web::test]
async fn january_resets_before_accruing() {
    let mut record = common::balance("EMP001", Gender::Male);
    record.el = 10.0;
    record.cl = 6.5;
    record.sl = 3.0;
    let store = MemoryStore::with(vec![record]);
    let runner = TickRunner::new(store.clone());

    let reports = runner.run_period(period(2025, 1)).await.unwrap();

    let kinds: Vec<TickKind> = reports.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, vec![TickKind::YearlyReset, TickKind::MonthlyAccrual]);

    let stored = store.get("EMP001");
    assert_eq!(stored.el, 11.75);
    assert_eq!(stored.cl, 0.83);
    assert_eq!(stored.sl, 0.75);
    assert_eq!(stored.last_yearly_tick, Some(2025));
    assert_eq!(stored.version, 2);
}

#[actix_web::test]
async fn other_months_skip_the_yearly_reset() {
    let store = MemoryStore::with(staff());
    let runner = TickRunner::new(store.clone());

    let reports = runner.run_period(period(2025, 2)).await.unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].kind, TickKind::MonthlyAccrual);
    assert_eq!(store.get("EMP002").last_yearly_tick, None);
}

#[actix_web::test]
async fn one_failure_does_not_stop_the_others() {
    let store = MemoryStore::with(staff()).failing_for("EMP002");
    let runner = TickRunner::new(store.clone());

    let report = runner.run_monthly(period(2024, 6)).await.unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.applied, vec!["EMP001", "EMP003"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].employee_id, "EMP002");
    assert_eq!(store.get("EMP002").el, 0.0);
    assert_eq!(store.get("EMP003").el, 1.75);
}

#[actix_web::test]
async fn concurrent_runs_apply_once() {
    let store = MemoryStore::with(staff());
    let runner = TickRunner::new(store.clone());

    let (a, b) = tokio::join!(
        runner.run_monthly(period(2024, 9)),
        runner.run_monthly(period(2024, 9))
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.applied.len() + b.applied.len(), 3);
    assert_eq!(a.skipped.len() + b.skipped.len(), 3);
    assert_eq!(store.get("EMP001").el, 1.75);
    assert_eq!(store.get("EMP001").version, 1);
}

#[actix_web::test]
async fn yearly_reset_keeps_earned_leave() {
    let mut record = common::balance("EMP002", Gender::Male);
    record.el = 44.5;
    record.cl = 9.96;
    let store = MemoryStore::with(vec![record]);
    let runner = TickRunner::new(store.clone());

    let report = runner.run_yearly(2026).await.unwrap();

    assert_eq!(report.period, "2026");
    let stored = store.get("EMP002");
    assert_eq!(stored.el, 44.5);
    assert_eq!(stored.cl, 0.0);
    assert_eq!(stored.sl, 0.0);
    assert_eq!(stored.ml, LeaveBalanceRecord::INITIAL_ML);
}
