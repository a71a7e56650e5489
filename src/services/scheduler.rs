use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::database::models::LeaveBalanceRecord;
use crate::services::accrual::{
    AccrualPeriod, TickOutcome, apply_monthly_accrual_tick, apply_yearly_reset_tick,
};

/// Storage the tick runner reads and writes balances through.
pub trait BalanceStore {
    fn list_balances(&self) -> impl Future<Output = Result<Vec<LeaveBalanceRecord>>> + Send;

    /// Persists `record` only if the stored version still equals
    /// `expected_version`.
    fn save_balance(
        &self,
        record: &LeaveBalanceRecord,
        expected_version: i64,
    ) -> impl Future<Output = Result<()>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    MonthlyAccrual,
    YearlyReset,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickFailure {
    pub employee_id: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub kind: TickKind,
    pub period: String,
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
    pub failures: Vec<TickFailure>,
}

impl TickReport {
    fn new(kind: TickKind, period: String) -> Self {
        Self {
            kind,
            period,
            applied: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies ticks to every stored balance, one run at a time.
pub struct TickRunner<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S: BalanceStore> TickRunner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub async fn run_monthly(&self, period: AccrualPeriod) -> Result<TickReport> {
        let _guard = self.lock.lock().await;
        self.monthly(period).await
    }

    pub async fn run_yearly(&self, year: i32) -> Result<TickReport> {
        let _guard = self.lock.lock().await;
        self.yearly(year).await
    }

    /// Runs everything due at the start of `period`: in January the yearly
    /// reset goes first so the new year's first accrual survives it.
    pub async fn run_period(&self, period: AccrualPeriod) -> Result<Vec<TickReport>> {
        let _guard = self.lock.lock().await;

        let mut reports = Vec::with_capacity(2);
        if period.starts_year() {
            reports.push(self.yearly(period.year).await?);
        }
        reports.push(self.monthly(period).await?);
        Ok(reports)
    }

    async fn monthly(&self, period: AccrualPeriod) -> Result<TickReport> {
        self.apply_to_all(TickKind::MonthlyAccrual, period.to_string(), |record| {
            apply_monthly_accrual_tick(record, period)
        })
        .await
    }

    async fn yearly(&self, year: i32) -> Result<TickReport> {
        self.apply_to_all(TickKind::YearlyReset, year.to_string(), |record| {
            apply_yearly_reset_tick(record, year)
        })
        .await
    }

    async fn apply_to_all(
        &self,
        kind: TickKind,
        period: String,
        apply: impl Fn(&mut LeaveBalanceRecord) -> TickOutcome,
    ) -> Result<TickReport> {
        log::info!("Running {:?} tick for {}", kind, period);

        let balances = self.store.list_balances().await?;
        let mut report = TickReport::new(kind, period);

        for original in balances {
            let mut record = original.clone();
            match apply(&mut record) {
                TickOutcome::AlreadyApplied => report.skipped.push(record.employee_id),
                TickOutcome::Applied => {
                    match self.store.save_balance(&record, original.version).await {
                        Ok(()) => report.applied.push(record.employee_id),
                        Err(err) => {
                            log::error!(
                                "{:?} tick for {} failed for employee {}: {}",
                                kind,
                                report.period,
                                record.employee_id,
                                err
                            );
                            report.failures.push(TickFailure {
                                employee_id: record.employee_id,
                                error: err.to_string(),
                            });
                        }
                    }
                }
            }
        }

        log::info!(
            "{:?} tick for {} done: {} applied, {} skipped, {} failed",
            kind,
            report.period,
            report.applied.len(),
            report.skipped.len(),
            report.failures.len()
        );

        Ok(report)
    }
}

/// First moment of the month after `now`, in the office's local time.
pub fn next_period_boundary(now: DateTime<Utc>, offset: FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(&offset).date_naive();
    let next_month = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .unwrap_or(NaiveDate::MAX);

    next_month
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Background loop: catches up the current period once, then sleeps until
/// each month boundary and runs that period's ticks.
pub fn spawn_scheduler<S>(runner: Arc<TickRunner<S>>, offset: FixedOffset)
where
    S: BalanceStore + 'static,
{
    actix_web::rt::spawn(async move {
        let current = AccrualPeriod::containing(Utc::now().with_timezone(&offset).date_naive());
        log_run(current, runner.run_period(current).await);

        loop {
            let now = Utc::now();
            let boundary = next_period_boundary(now, offset);
            let wait = (boundary - now).to_std().unwrap_or_default();
            log::info!("Next leave tick scheduled for {}", boundary);
            tokio::time::sleep(wait).await;

            let period = AccrualPeriod::containing(boundary.with_timezone(&offset).date_naive());
            log_run(period, runner.run_period(period).await);
        }
    });
}

fn log_run(period: AccrualPeriod, result: Result<Vec<TickReport>>) {
    match result {
        Ok(reports) => {
            for report in reports.iter().filter(|r| !r.is_clean()) {
                log::warn!(
                    "{:?} tick for {} left {} employee(s) unprocessed",
                    report.kind,
                    report.period,
                    report.failures.len()
                );
            }
        }
        Err(err) => log::error!("Leave ticks for {} could not run: {}", period, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn boundary_is_start_of_next_local_month() {
        let ist = FixedOffset::east_opt(330 * 60).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();

        // 2024-02-01 01:30 IST, already February locally
        let boundary = next_period_boundary(now, ist);
        assert_eq!(boundary, Utc.with_ymd_and_hms(2024, 2, 29, 18, 30, 0).unwrap());
    }

    #[test]
    fn boundary_rolls_over_the_year() {
        let utc = FixedOffset::east_opt(0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 12, 15, 0, 0, 0).unwrap();

        assert_eq!(
            next_period_boundary(now, utc),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
        );
    }
}
