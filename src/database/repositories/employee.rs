use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;

use crate::database::{
    models::{Employee, EmployeeInput},
    utils::sql,
};

const EMPLOYEE_COLUMNS: &str = r#"
    id,
    employee_id,
    name,
    email,
    designation,
    department,
    password_hash,
    status,
    gender,
    date_of_birth,
    date_of_joining,
    reporting_manager,
    latitude,
    longitude,
    is_rotational,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new employee with an already-hashed password
    pub async fn create(&self, input: EmployeeInput, password_hash: &str) -> Result<Employee> {
        let now = Utc::now();

        let employee = sqlx::query_as::<_, Employee>(&sql(&format!(
            r#"
            INSERT INTO
                employees (
                    employee_id,
                    name,
                    email,
                    designation,
                    department,
                    password_hash,
                    gender,
                    date_of_birth,
                    date_of_joining,
                    reporting_manager,
                    latitude,
                    longitude,
                    is_rotational,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                {}
            "#,
            EMPLOYEE_COLUMNS
        )))
        .bind(input.employee_id)
        .bind(input.name)
        .bind(input.email)
        .bind(input.designation)
        .bind(input.department)
        .bind(password_hash)
        .bind(input.gender)
        .bind(input.date_of_birth)
        .bind(input.date_of_joining)
        .bind(input.reporting_manager)
        .bind(input.latitude)
        .bind(input.longitude)
        .bind(input.is_rotational)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(employee)
    }

    pub async fn find_by_employee_id(&self, employee_id: &str) -> Result<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                employees
            WHERE
                employee_id = ?
            "#,
            EMPLOYEE_COLUMNS
        )))
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Employees whose reporting manager is recorded as either the
    /// manager's name or their employee id
    pub async fn find_reports(&self, manager_id: &str, manager_name: &str) -> Result<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                employees
            WHERE
                reporting_manager = ?
                OR reporting_manager = ?
            ORDER BY
                employee_id
            "#,
            EMPLOYEE_COLUMNS
        )))
        .bind(manager_name)
        .bind(manager_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    pub async fn update_password(&self, employee_id: &str, password_hash: &str) -> Result<()> {
        sqlx::query(&sql(r#"
            UPDATE
                employees
            SET
                password_hash = ?,
                updated_at = ?
            WHERE
                employee_id = ?
        "#))
        .bind(password_hash)
        .bind(Utc::now())
        .bind(employee_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
