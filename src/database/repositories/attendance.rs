use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::database::{
    models::{Attendance, AttendanceStatus},
    transaction::DatabaseTransaction,
    utils::sql,
};
use crate::error::AppError;

const ATTENDANCE_COLUMNS: &str = r#"
    id,
    employee_id,
    date,
    login_time,
    logout_time,
    status,
    location_verified,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens today's attendance record. Fails with `Conflict` when the
    /// employee already has an open record for `date`.
    pub async fn clock_in(
        &self,
        employee_id: &str,
        date: NaiveDate,
        login_time: String,
        status: AttendanceStatus,
        location_verified: bool,
    ) -> Result<Attendance, AppError> {
        let employee_id = employee_id.to_string();

        DatabaseTransaction::run(&self.pool, |tx| {
            Box::pin(async move {
                let open = sqlx::query_scalar::<_, i64>(&sql(r#"
                    SELECT
                        COUNT(*)
                    FROM
                        attendance
                    WHERE
                        employee_id = ?
                        AND date = ?
                        AND logout_time IS NULL
                "#))
                .bind(&employee_id)
                .bind(date)
                .fetch_one(&mut **tx)
                .await?;

                if open > 0 {
                    return Err(AppError::Conflict("Already clocked in today".to_string()));
                }

                let now = Utc::now();
                let attendance = sqlx::query_as::<_, Attendance>(&sql(&format!(
                    r#"
                    INSERT INTO
                        attendance (
                            employee_id,
                            date,
                            login_time,
                            status,
                            location_verified,
                            created_at,
                            updated_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?, ?)
                    RETURNING
                        {}
                    "#,
                    ATTENDANCE_COLUMNS
                )))
                .bind(&employee_id)
                .bind(date)
                .bind(login_time)
                .bind(status)
                .bind(location_verified)
                .bind(now)
                .bind(now)
                .fetch_one(&mut **tx)
                .await?;

                Ok(attendance)
            })
        })
        .await
    }

    /// Most recent record still missing a logout, dated on or after `since`
    pub async fn find_open(&self, employee_id: &str, since: NaiveDate) -> Result<Option<Attendance>> {
        let attendance = sqlx::query_as::<_, Attendance>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                attendance
            WHERE
                employee_id = ?
                AND date >= ?
                AND logout_time IS NULL
            ORDER BY
                date DESC,
                created_at DESC
            LIMIT 1
            "#,
            ATTENDANCE_COLUMNS
        )))
        .bind(employee_id)
        .bind(since)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendance)
    }

    pub async fn clock_out(
        &self,
        id: uuid::Uuid,
        logout_time: &str,
        status: AttendanceStatus,
    ) -> Result<Attendance> {
        let attendance = sqlx::query_as::<_, Attendance>(&sql(&format!(
            r#"
            UPDATE
                attendance
            SET
                logout_time = ?,
                status = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                {}
            "#,
            ATTENDANCE_COLUMNS
        )))
        .bind(logout_time)
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendance)
    }

    /// Records dated within `[from, to]`, in creation order
    pub async fn find_between(
        &self,
        employee_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Attendance>> {
        let records = sqlx::query_as::<_, Attendance>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                attendance
            WHERE
                employee_id = ?
                AND date BETWEEN ? AND ?
            ORDER BY
                created_at
            "#,
            ATTENDANCE_COLUMNS
        )))
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
