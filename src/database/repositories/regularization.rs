use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Regularization, RegularizationInput, RequestStatus},
    utils::sql,
};

const REGULARIZATION_COLUMNS: &str = r#"
    id,
    employee_id,
    date,
    request_type,
    reason,
    status,
    admin_remarks,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct RegularizationRepository {
    pool: PgPool,
}

impl RegularizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_request(&self, input: RegularizationInput) -> Result<Regularization> {
        let now = Utc::now();

        let request = sqlx::query_as::<_, Regularization>(&sql(&format!(
            r#"
            INSERT INTO
                regularizations (
                    employee_id,
                    date,
                    request_type,
                    reason,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {}
            "#,
            REGULARIZATION_COLUMNS
        )))
        .bind(input.employee_id)
        .bind(input.date)
        .bind(input.request_type)
        .bind(input.reason)
        .bind(RequestStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_employee(&self, employee_id: &str) -> Result<Vec<Regularization>> {
        let requests = sqlx::query_as::<_, Regularization>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                regularizations
            WHERE
                employee_id = ?
            ORDER BY
                date DESC
            "#,
            REGULARIZATION_COLUMNS
        )))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn find_approved_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Regularization>> {
        let requests = sqlx::query_as::<_, Regularization>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                regularizations
            WHERE
                employee_id = ?
                AND status = ?
                AND date BETWEEN ? AND ?
            ORDER BY
                created_at
            "#,
            REGULARIZATION_COLUMNS
        )))
        .bind(employee_id)
        .bind(RequestStatus::Approved)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn find_pending_for(&self, employee_ids: &[String]) -> Result<Vec<Regularization>> {
        let requests = sqlx::query_as::<_, Regularization>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                regularizations
            WHERE
                employee_id = ANY(?)
                AND status = ?
            ORDER BY
                created_at DESC
            "#,
            REGULARIZATION_COLUMNS
        )))
        .bind(employee_ids)
        .bind(RequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn respond(
        &self,
        id: Uuid,
        status: RequestStatus,
        admin_remarks: Option<String>,
    ) -> Result<Option<Regularization>> {
        let request = sqlx::query_as::<_, Regularization>(&sql(&format!(
            r#"
            UPDATE
                regularizations
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
            REGULARIZATION_COLUMNS
        )))
        .bind(status)
        .bind(admin_remarks)
        .bind(Utc::now())
        .bind(id)
        .bind(RequestStatus::Pending)
        .fetch_optional(&self.pool)
        .await?;

        Ok(request)
    }
}
