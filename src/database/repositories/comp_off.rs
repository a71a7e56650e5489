use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{COMP_OFF_VALIDITY_DAYS, CompOff, CompOffInput, RequestStatus},
    utils::sql,
};

const COMP_OFF_COLUMNS: &str = r#"
    id,
    employee_id,
    employee_name,
    department,
    days,
    reason,
    work_date,
    awarded_by,
    awarded_date,
    expiry_date,
    status,
    admin_remarks,
    created_at,
    updated_at
"#;

/// Expiry for a comp-off awarded on `awarded`, unless one was given.
pub fn comp_off_expiry(awarded: NaiveDate, requested: Option<NaiveDate>) -> NaiveDate {
    requested.unwrap_or(awarded + Duration::days(COMP_OFF_VALIDITY_DAYS))
}

#[derive(Clone)]
pub struct CompOffRepository {
    pool: PgPool,
}

impl CompOffRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records a pending comp-off awarded today
    pub async fn create_request(&self, input: CompOffInput, awarded_date: NaiveDate) -> Result<CompOff> {
        let now = Utc::now();
        let expiry_date = comp_off_expiry(awarded_date, input.expiry_date);

        let comp_off = sqlx::query_as::<_, CompOff>(&sql(&format!(
            r#"
            INSERT INTO
                comp_offs (
                    employee_id,
                    employee_name,
                    department,
                    days,
                    reason,
                    work_date,
                    awarded_by,
                    awarded_date,
                    expiry_date,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {}
            "#,
            COMP_OFF_COLUMNS
        )))
        .bind(input.employee_id)
        .bind(input.employee_name)
        .bind(input.department)
        .bind(input.days.unwrap_or(1.0))
        .bind(input.reason)
        .bind(input.work_date)
        .bind(input.awarded_by)
        .bind(awarded_date)
        .bind(expiry_date)
        .bind(RequestStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(comp_off)
    }

    pub async fn find_by_employee(&self, employee_id: &str) -> Result<Vec<CompOff>> {
        let comp_offs = sqlx::query_as::<_, CompOff>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                comp_offs
            WHERE
                employee_id = ?
            ORDER BY
                work_date DESC
            "#,
            COMP_OFF_COLUMNS
        )))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comp_offs)
    }

    pub async fn find_pending_for(&self, employee_ids: &[String]) -> Result<Vec<CompOff>> {
        let comp_offs = sqlx::query_as::<_, CompOff>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                comp_offs
            WHERE
                employee_id = ANY(?)
                AND status = ?
            ORDER BY
                created_at DESC
            "#,
            COMP_OFF_COLUMNS
        )))
        .bind(employee_ids)
        .bind(RequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(comp_offs)
    }

    pub async fn respond(
        &self,
        id: Uuid,
        status: RequestStatus,
        admin_remarks: Option<String>,
    ) -> Result<Option<CompOff>> {
        let comp_off = sqlx::query_as::<_, CompOff>(&sql(&format!(
            r#"
            UPDATE
                comp_offs
            SET
                status = ?,
                admin_remarks = ?,
                updated_at = ?
            WHERE
                id = ?
                AND status = ?
            RETURNING
                {}
            "#,
            COMP_OFF_COLUMNS
        )))
        .bind(status)
        .bind(admin_remarks)
        .bind(Utc::now())
        .bind(id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comp_off)
    }
}
