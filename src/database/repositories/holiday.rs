use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;

use crate::database::{models::Holiday, utils::sql};

#[derive(Clone)]
pub struct HolidayRepository {
    pool: PgPool,
}

impl HolidayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        date: NaiveDate,
        name: &str,
        description: Option<&str>,
    ) -> Result<Holiday> {
        let holiday = sqlx::query_as::<_, Holiday>(&sql(r#"
            INSERT INTO
                holidays (date, name, description, created_at)
            VALUES
                (?, ?, ?, ?)
            RETURNING
                id,
                date,
                name,
                description,
                created_at
        "#))
        .bind(date)
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(holiday)
    }

    /// Holidays dated within `[from, to]`, oldest first
    pub async fn find_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Holiday>> {
        let holidays = sqlx::query_as::<_, Holiday>(&sql(r#"
            SELECT
                id,
                date,
                name,
                description,
                created_at
            FROM
                holidays
            WHERE
                date BETWEEN ? AND ?
            ORDER BY
                date,
                created_at
        "#))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(holidays)
    }
}
