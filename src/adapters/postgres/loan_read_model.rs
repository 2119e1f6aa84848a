use crate::domain::value_objects::{Amount, UserId};
use crate::ports::loan_read_model::{LoanReadModel as LoanReadModelTrait, LoanView, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::invalid_data;

fn map_row_to_loan_view(row: &PgRow) -> Result<LoanView> {
    let user_id: i64 = row.get("user_id");

    Ok(LoanView {
        user_id: UserId::new(user_id).map_err(invalid_data)?,
        amount: Amount::new(row.get("amount")).map_err(invalid_data)?,
        granted_at: row.get("granted_at"),
    })
}

/// LoanReadModelのPostgreSQL実装
pub struct LoanReadModel {
    pool: PgPool,
}

impl LoanReadModel {
    /// PostgreSQLコネクションプールから新しいLoanReadModelを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoanReadModelTrait for LoanReadModel {
    async fn save(&self, loan_view: LoanView) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO loans_view (user_id, amount, granted_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id)
            DO UPDATE SET
                amount = EXCLUDED.amount,
                granted_at = EXCLUDED.granted_at
            "#,
        )
        .bind(loan_view.user_id.value())
        .bind(loan_view.amount.value())
        .bind(loan_view.granted_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<LoanView>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, amount, granted_at
            FROM loans_view
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_loan_view).transpose()
    }

    async fn list_all(&self) -> Result<Vec<LoanView>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, amount, granted_at
            FROM loans_view
            ORDER BY user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_loan_view).collect()
    }
}
