use crate::domain::value_objects::{Money, UserId};
use crate::ports::user_read_model::{Result, UserReadModel as UserReadModelTrait, UserView};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::invalid_data;

/// PostgreSQLの行データをUserViewに変換する
///
/// user_idの範囲、balanceの符号、versionの符号を検証する。
fn map_row_to_user_view(row: &PgRow) -> Result<UserView> {
    let user_id: i64 = row.get("user_id");
    let user_id = UserId::new(user_id).map_err(invalid_data)?;

    let balance = Money::new(row.get("balance")).map_err(invalid_data)?;

    let version_i64: i64 = row.get("version");
    let version: u64 = version_i64
        .try_into()
        .map_err(|_| invalid_data(format!("version out of range: {}", version_i64)))?;

    Ok(UserView {
        user_id,
        name: row.get("name"),
        balance,
        version,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// UserReadModelのPostgreSQL実装
pub struct UserReadModel {
    pool: PgPool,
}

impl UserReadModel {
    /// PostgreSQLコネクションプールから新しいUserReadModelを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserReadModelTrait for UserReadModel {
    /// ユーザービューを保存（upsert）
    ///
    /// 保存済みの行よりバージョンが古い場合、ON CONFLICTのWHERE句で更新を捨てる。
    async fn save(&self, user_view: UserView) -> Result<()> {
        let version: i64 = user_view
            .version
            .try_into()
            .map_err(|_| invalid_data(format!("version out of range: {}", user_view.version)))?;

        sqlx::query(
            r#"
            INSERT INTO users_view (
                user_id,
                name,
                balance,
                version,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                balance = EXCLUDED.balance,
                version = EXCLUDED.version,
                updated_at = EXCLUDED.updated_at
            WHERE users_view.version <= EXCLUDED.version
            "#,
        )
        .bind(user_view.user_id.value())
        .bind(&user_view.name)
        .bind(user_view.balance.value())
        .bind(version)
        .bind(user_view.created_at)
        .bind(user_view.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserView>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, name, balance, version, created_at, updated_at
            FROM users_view
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_user_view).transpose()
    }

    async fn list_all(&self) -> Result<Vec<UserView>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, name, balance, version, created_at, updated_at
            FROM users_view
            ORDER BY user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_user_view).collect()
    }
}
