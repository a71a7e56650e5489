use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{LeaveRequest, LeaveRequestInput, LeaveType, RequestStatus, UsedLeaveRow},
    utils::sql,
};
use crate::services::leave_calculator::UsedDays;

const LEAVE_COLUMNS: &str = r#"
    id,
    employee_id,
    employee_name,
    department,
    leave_type,
    from_date,
    to_date,
    total_days,
    reason,
    description,
    status,
    admin_remarks,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct LeaveRepository {
    pool: PgPool,
}

impl LeaveRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new pending leave request
    pub async fn create_request(&self, input: LeaveRequestInput) -> Result<LeaveRequest> {
        let now = Utc::now();
        let to_date = input.to_date.unwrap_or(input.from_date);
        let reason = input.reason.unwrap_or_else(|| "N/A".to_string());

        let request = sqlx::query_as::<_, LeaveRequest>(&sql(&format!(
            r#"
            INSERT INTO
                leave_requests (
                    employee_id,
                    employee_name,
                    department,
                    leave_type,
                    from_date,
                    to_date,
                    total_days,
                    reason,
                    description,
                    status,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {}
            "#,
            LEAVE_COLUMNS
        )))
        .bind(input.employee_id)
        .bind(input.employee_name)
        .bind(input.department)
        .bind(input.leave_type.as_str())
        .bind(input.from_date)
        .bind(to_date)
        .bind(input.total_days)
        .bind(reason)
        .bind(input.description)
        .bind(RequestStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_employee(&self, employee_id: &str) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                leave_requests
            WHERE
                employee_id = ?
            ORDER BY
                from_date DESC
            "#,
            LEAVE_COLUMNS
        )))
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Approved leaves overlapping `[from, to]`, in creation order
    pub async fn find_approved_overlapping(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                leave_requests
            WHERE
                employee_id = ?
                AND status = ?
                AND from_date <= ?
                AND to_date >= ?
            ORDER BY
                created_at
            "#,
            LEAVE_COLUMNS
        )))
        .bind(employee_id)
        .bind(RequestStatus::Approved)
        .bind(to)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn find_pending_for(&self, employee_ids: &[String]) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                leave_requests
            WHERE
                employee_id = ANY(?)
                AND status = ?
            ORDER BY
                created_at DESC
            "#,
            LEAVE_COLUMNS
        )))
        .bind(employee_ids)
        .bind(RequestStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Sums approved `total_days` per leave code. Codes outside the known
    /// leave types are dropped with a warning.
    pub async fn used_days(&self, employee_id: &str) -> Result<UsedDays> {
        let rows = sqlx::query_as::<_, UsedLeaveRow>(&sql(r#"
            SELECT
                UPPER(leave_type) AS leave_type,
                COALESCE(SUM(total_days), 0) AS total
            FROM
                leave_requests
            WHERE
                employee_id = ?
                AND status = ?
            GROUP BY
                UPPER(leave_type)
        "#))
        .bind(employee_id)
        .bind(RequestStatus::Approved)
        .fetch_all(&self.pool)
        .await?;

        let mut used = UsedDays::new();
        for row in rows {
            match row.leave_type.parse::<LeaveType>() {
                Ok(leave_type) => {
                    *used.entry(leave_type).or_insert(0.0) += row.total;
                }
                Err(_) => log::warn!(
                    "Ignoring {} approved day(s) of unknown leave type {} for {}",
                    row.total,
                    row.leave_type,
                    employee_id
                ),
            }
        }

        Ok(used)
    }

    /// Decides a pending request. Returns `None` when no pending request
    /// with that id exists.
    pub async fn respond(
        &self,
        id: Uuid,
        status: RequestStatus,
        admin_remarks: Option<String>,
    ) -> Result<Option<LeaveRequest>> {
        let request = sqlx::query_as::<_, LeaveRequest>(&sql(&format!(
            r#"
            UPDATE
                leave_requests
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
            LEAVE_COLUMNS
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
