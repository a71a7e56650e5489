use std::collections::HashMap;

use anyhow::{Result, anyhow};
use chrono::Utc;
use sqlx::PgPool;

use crate::database::{
    models::{Gender, LeaveBalanceRecord},
    utils::sql,
};
use crate::services::scheduler::BalanceStore;

const BALANCE_COLUMNS: &str = r#"
    employee_id,
    gender,
    el,
    cl,
    sl,
    mml,
    ml,
    pl,
    bl,
    last_monthly_tick,
    last_yearly_tick,
    version,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveBalanceRepository {
    pool: PgPool,
}

impl LeaveBalanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, employee_id: &str) -> Result<Option<LeaveBalanceRecord>> {
        let record = sqlx::query_as::<_, LeaveBalanceRecord>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                leave_balances
            WHERE
                employee_id = ?
            "#,
            BALANCE_COLUMNS
        )))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Creates a default accumulator for every employee that has none yet.
    /// Returns the number of records created.
    pub async fn seed_missing(&self) -> Result<u64> {
        let employees = sqlx::query_as::<_, (String, Option<String>)>(&sql(r#"
            SELECT
                e.employee_id,
                e.gender
            FROM
                employees e
                LEFT JOIN leave_balances b ON b.employee_id = e.employee_id
            WHERE
                b.employee_id IS NULL
        "#))
        .fetch_all(&self.pool)
        .await?;

        let mut created = 0;
        for (employee_id, gender) in employees {
            let record = LeaveBalanceRecord::new(employee_id, Gender::from_optional(gender.as_deref()));
            created += self.insert_if_missing(&record).await?;
        }

        if created > 0 {
            log::info!("Seeded {} leave balance record(s)", created);
        }

        Ok(created)
    }

    async fn insert_if_missing(&self, record: &LeaveBalanceRecord) -> Result<u64> {
        let result = sqlx::query(&sql(r#"
            INSERT INTO
                leave_balances (
                    employee_id,
                    gender,
                    el,
                    cl,
                    sl,
                    mml,
                    ml,
                    pl,
                    bl,
                    version,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (employee_id) DO NOTHING
        "#))
        .bind(&record.employee_id)
        .bind(record.gender)
        .bind(record.el)
        .bind(record.cl)
        .bind(record.sl)
        .bind(record.mml)
        .bind(record.ml)
        .bind(record.pl)
        .bind(record.bl)
        .bind(record.version)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl BalanceStore for LeaveBalanceRepository {
    async fn list_balances(&self) -> Result<Vec<LeaveBalanceRecord>> {
        let records = sqlx::query_as::<_, LeaveBalanceRecord>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                leave_balances
            ORDER BY
                employee_id
            "#,
            BALANCE_COLUMNS
        )))
        .fetch_all(&self.pool)
        .await?;

        let genders: HashMap<String, Option<String>> =
            sqlx::query_as::<_, (String, Option<String>)>(&sql(r#"
                SELECT
                    employee_id,
                    gender
                FROM
                    employees
            "#))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .collect();

        Ok(with_current_gender(records, &genders))
    }

    async fn save_balance(&self, record: &LeaveBalanceRecord, expected_version: i64) -> Result<()> {
        let result = sqlx::query(&sql(r#"
            UPDATE
                leave_balances
            SET
                gender = ?,
                el = ?,
                cl = ?,
                sl = ?,
                mml = ?,
                ml = ?,
                pl = ?,
                bl = ?,
                last_monthly_tick = ?,
                last_yearly_tick = ?,
                version = ?,
                updated_at = ?
            WHERE
                employee_id = ?
                AND version = ?
        "#))
        .bind(record.gender)
        .bind(record.el)
        .bind(record.cl)
        .bind(record.sl)
        .bind(record.mml)
        .bind(record.ml)
        .bind(record.pl)
        .bind(record.bl)
        .bind(record.last_monthly_tick)
        .bind(record.last_yearly_tick)
        .bind(record.version)
        .bind(Utc::now())
        .bind(&record.employee_id)
        .bind(expected_version)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!(
                "leave balance for {} changed concurrently (expected version {})",
                record.employee_id,
                expected_version
            ));
        }

        Ok(())
    }
}

/// Replaces the gender captured at seed time with the employee's current
/// one. Balances whose employee no longer exists keep the stored value.
fn with_current_gender(
    mut records: Vec<LeaveBalanceRecord>,
    genders: &HashMap<String, Option<String>>,
) -> Vec<LeaveBalanceRecord> {
    for record in &mut records {
        if let Some(gender) = genders.get(&record.employee_id) {
            record.gender = Gender::from_optional(gender.as_deref());
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn balances_follow_corrected_employee_gender() {
        let records = vec![
            LeaveBalanceRecord::new("EMP001", Gender::Male),
            LeaveBalanceRecord::new("EMP002", Gender::Female),
            LeaveBalanceRecord::new("EMP404", Gender::Female),
        ];
        let genders = HashMap::from([
            ("EMP001".to_string(), Some("female".to_string())),
            ("EMP002".to_string(), None),
        ]);

        let refreshed = with_current_gender(records, &genders);

        assert_eq!(refreshed[0].gender, Gender::Female);
        assert_eq!(refreshed[1].gender, Gender::Male);
        assert_eq!(refreshed[2].gender, Gender::Female);
    }
}
