use crate::domain::{
    self, DomainEvent, LoanError, TransactionError,
    account::{Account, Loan},
    commands::*,
    value_objects::*,
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{AccountApplicationError, Result};

/// 楽観的ロック競合時の最大試行回数
const MAX_APPEND_ATTEMPTS: usize = 3;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub event_store: Arc<dyn EventStore>,
    pub user_read_model: Arc<dyn UserReadModel>,
    pub loan_read_model: Arc<dyn LoanReadModel>,
}

/// イベントストアから口座集約を復元するヘルパー関数
///
/// # 戻り値
/// イベントが存在しない場合は`None`
///
/// # エラー
/// - EventStoreError: イベント読み込み失敗
/// - CorruptedHistory: イベント列が口座の不変条件を満たさない
async fn load_account(
    event_store: &Arc<dyn EventStore>,
    user_id: UserId,
) -> Result<Option<Account>> {
    let events = event_store
        .load(user_id)
        .await
        .map_err(AccountApplicationError::EventStoreError)?;

    domain::account::replay_events(&events).map_err(AccountApplicationError::CorruptedHistory)
}

/// 口座の現在の状態を取得する
///
/// Read Modelではなくイベント列から復元するため、残高と融資は
/// 常に同じバージョンの状態を表す。
///
/// # エラー
/// - UserNotFound: イベントが存在しない
pub async fn get_account(deps: &ServiceDependencies, user_id: UserId) -> Result<Account> {
    load_account(&deps.event_store, user_id)
        .await?
        .ok_or(AccountApplicationError::UserNotFound(user_id))
}

/// 口座集約からRead Model用のユーザービューを構築する
pub(super) fn build_user_view(account: &Account) -> UserView {
    UserView {
        user_id: account.user_id,
        name: account.name.clone(),
        balance: account.balance,
        version: account.version,
        created_at: account.created_at,
        updated_at: account.updated_at,
    }
}

/// 融資からRead Model用の融資ビューを構築する
pub(super) fn build_loan_view(loan: &Loan) -> LoanView {
    LoanView {
        user_id: loan.user_id,
        amount: loan.amount,
        granted_at: loan.granted_at,
    }
}

/// 口座の完全な状態をRead Modelに反映する
pub(super) async fn save_views(deps: &ServiceDependencies, account: &Account) -> Result<()> {
    deps.user_read_model
        .save(build_user_view(account))
        .await
        .map_err(AccountApplicationError::ReadModelError)?;

    if let Some(loan) = &account.loan {
        deps.loan_read_model
            .save(build_loan_view(loan))
            .await
            .map_err(AccountApplicationError::ReadModelError)?;
    }

    Ok(())
}

/// 既存口座へのコマンドを実行する
///
/// 読み込み → 再生 → 判定（ドメインの純粋関数）→ バージョン指定の追記 →
/// Read Model更新、の順で処理する。追記がバージョン競合した場合は
/// 読み込みからやり直し、`MAX_APPEND_ATTEMPTS`回で諦める。
async fn execute<F>(deps: &ServiceDependencies, user_id: UserId, decide: F) -> Result<Account>
where
    F: Fn(&Account) -> Result<(Account, Vec<DomainEvent>)>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        let account = load_account(&deps.event_store, user_id)
            .await?
            .ok_or(AccountApplicationError::UserNotFound(user_id))?;
        let expected_version = account.version;

        let (updated, events) = decide(&account)?;

        match deps
            .event_store
            .append(user_id, expected_version, events)
            .await
        {
            Ok(()) => {
                save_views(deps, &updated).await?;
                return Ok(updated);
            }
            Err(AppendError::VersionConflict { expected, actual })
                if attempt < MAX_APPEND_ATTEMPTS =>
            {
                tracing::warn!(
                    %user_id,
                    expected,
                    actual,
                    attempt,
                    "version conflict, retrying"
                );
            }
            Err(AppendError::VersionConflict { .. }) => {
                return Err(AccountApplicationError::ConcurrencyConflict(user_id));
            }
            Err(AppendError::Storage(e)) => {
                return Err(AccountApplicationError::EventStoreError(e));
            }
        }
    }
}

fn balance_overflow() -> AccountApplicationError {
    AccountApplicationError::InvalidInput(
        "Amount would exceed the maximum supported balance.".to_string(),
    )
}

/// ユーザーを作成する
///
/// ビジネスルール：
/// - ユーザーIDが未使用であること
/// - 残高は0で開始する
///
/// # 戻り値
/// 作成された口座
pub async fn create_user(deps: &ServiceDependencies, cmd: CreateUser) -> Result<Account> {
    // 1. ID重複確認
    if load_account(&deps.event_store, cmd.user_id).await?.is_some() {
        return Err(AccountApplicationError::UserAlreadyExists(cmd.user_id));
    }

    // 2. ドメイン層の純粋関数を呼び出し
    let (account, event) =
        domain::account::open_account(cmd.user_id, cmd.name, cmd.requested_at);

    // 3. イベントストアに保存（同時作成は競合として検出される）
    match deps
        .event_store
        .append(cmd.user_id, 0, vec![DomainEvent::UserRegistered(event)])
        .await
    {
        Ok(()) => {}
        Err(AppendError::VersionConflict { .. }) => {
            return Err(AccountApplicationError::UserAlreadyExists(cmd.user_id));
        }
        Err(AppendError::Storage(e)) => return Err(AccountApplicationError::EventStoreError(e)),
    }

    // 4. Read Modelを更新
    save_views(deps, &account).await?;

    tracing::info!(user_id = %account.user_id, "user created");
    Ok(account)
}

/// 取引を記帳する
///
/// ビジネスルール：
/// - ユーザーが存在すること
/// - 出金は残高以内であること
///
/// # 戻り値
/// 記帳後の口座
pub async fn post_transaction(deps: &ServiceDependencies, cmd: PostTransaction) -> Result<Account> {
    let account = execute(deps, cmd.user_id, |account| {
        let (updated, event) =
            domain::account::post_transaction(account, cmd.kind, cmd.amount, cmd.posted_at)
                .map_err(|e| match e {
                    TransactionError::InsufficientFunds { balance, requested } => {
                        AccountApplicationError::InsufficientFunds { balance, requested }
                    }
                    TransactionError::BalanceOverflow { .. } => balance_overflow(),
                })?;

        Ok((updated, vec![DomainEvent::TransactionPosted(event)]))
    })
    .await?;

    tracing::info!(
        user_id = %cmd.user_id,
        kind = cmd.kind.as_str(),
        amount = %cmd.amount.value(),
        balance = %account.balance.value(),
        "transaction posted"
    );
    Ok(account)
}

/// 融資を実行する
///
/// ビジネスルール：
/// - ユーザーが存在すること
/// - 融資は1ユーザーにつき1件まで
/// - 融資額は融資の記録と同じ追記で残高に入金される
///
/// # 戻り値
/// 実行された融資
pub async fn take_loan(deps: &ServiceDependencies, cmd: TakeLoan) -> Result<Loan> {
    execute(deps, cmd.user_id, |account| {
        domain::account::grant_loan(account, cmd.amount, cmd.requested_at).map_err(|e| match e {
            LoanError::LoanAlreadyActive => AccountApplicationError::LoanAlreadyActive(cmd.user_id),
            LoanError::BalanceOverflow { .. } => balance_overflow(),
        })
    })
    .await?;

    tracing::info!(user_id = %cmd.user_id, amount = %cmd.amount.value(), "loan granted");
    Ok(Loan {
        user_id: cmd.user_id,
        amount: cmd.amount,
        granted_at: cmd.requested_at,
    })
}
