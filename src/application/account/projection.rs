use crate::domain::{self, DomainEvent, value_objects::UserId};
use futures::StreamExt;
use std::collections::BTreeMap;

use super::account_service::{ServiceDependencies, save_views};
use super::errors::{AccountApplicationError, Result};

/// Read Model再構築バッチ
///
/// イベントストアの全イベントから口座ごとの状態を復元し、
/// ユーザービューと融資ビューを保存し直す。
///
/// 処理フロー：
/// 1. 全イベントを挿入順に読み込み、口座ごとにまとめる
/// 2. 各口座について：
///    - イベントから現在の状態を復元
///    - 復元に失敗した口座はログに記録してスキップ
///    - Read Modelを更新
/// 3. 反映した口座の件数を返す
pub async fn rebuild_read_models(deps: &ServiceDependencies) -> Result<usize> {
    let mut histories: BTreeMap<UserId, Vec<DomainEvent>> = BTreeMap::new();

    {
        let mut stream = deps.event_store.stream_all();
        while let Some(event) = stream.next().await {
            let event = event.map_err(AccountApplicationError::EventStoreError)?;
            histories.entry(event.user_id()).or_default().push(event);
        }
    }

    let mut projected = 0;
    for (user_id, events) in histories {
        let account = match domain::account::replay_events(&events) {
            Ok(Some(account)) => account,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(%user_id, "skipping corrupted history: {}", e);
                continue;
            }
        };

        save_views(deps, &account).await?;
        projected += 1;
    }

    tracing::info!(projected, "read models rebuilt");
    Ok(projected)
}
