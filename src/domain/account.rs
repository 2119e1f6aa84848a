use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    Amount, DomainEvent, LoanError, LoanGranted, Money, ReplayError, TransactionError,
    TransactionKind, TransactionPosted, UserId, UserRegistered,
};

/// 融資 - 1ユーザーにつき1件まで
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    pub user_id: UserId,
    pub amount: Amount,
    pub granted_at: DateTime<Utc>,
}

/// Account集約 - 1ユーザーの口座
///
/// イベント列から復元される。`version`は適用済みイベント数で、
/// 楽観的同時実行制御のトークンとして使われる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    // 識別子
    pub user_id: UserId,
    pub name: String,

    // 口座管理の責務
    pub balance: Money,
    pub loan: Option<Loan>,

    // 監査情報
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn has_loan(&self) -> bool {
        self.loan.is_some()
    }
}

/// 純粋関数：口座を開設する
///
/// ビジネスルール：
/// - 残高は0から始まる（リクエストの残高は使わない）
///
/// 副作用なし。新しいAccountとイベントを返す。
pub fn open_account(
    user_id: UserId,
    name: String,
    registered_at: DateTime<Utc>,
) -> (Account, UserRegistered) {
    let account = Account {
        user_id,
        name: name.clone(),
        balance: Money::zero(),
        loan: None,
        version: 1,
        created_at: registered_at,
        updated_at: registered_at,
    };

    let event = UserRegistered {
        user_id,
        name,
        registered_at,
    };

    (account, event)
}

/// 純粋関数：取引を記帳する
///
/// ビジネスルール：
/// - 出金は残高以内（当座貸越なし）
/// - 入金後の残高がDecimalの表現範囲に収まること
///
/// 副作用なし。新しいAccountとイベントを返す。
pub fn post_transaction(
    account: &Account,
    kind: TransactionKind,
    amount: Amount,
    posted_at: DateTime<Utc>,
) -> Result<(Account, TransactionPosted), TransactionError> {
    match kind {
        TransactionKind::Credit => credit(account, amount, posted_at),
        TransactionKind::Debit => {
            let balance_after = account.balance.checked_debit(amount).ok_or(
                TransactionError::InsufficientFunds {
                    balance: account.balance,
                    requested: amount,
                },
            )?;

            Ok(record(account, kind, amount, balance_after, posted_at))
        }
    }
}

/// 純粋関数：融資を実行する
///
/// ビジネスルール：
/// - 融資は1ユーザーにつき1件まで
/// - 融資額はそのまま残高に入金される
///
/// 副作用なし。新しいAccountと、LoanGranted・入金のTransactionPostedの
/// 2イベントをこの順で返す。
pub fn grant_loan(
    account: &Account,
    amount: Amount,
    granted_at: DateTime<Utc>,
) -> Result<(Account, Vec<DomainEvent>), LoanError> {
    if account.has_loan() {
        return Err(LoanError::LoanAlreadyActive);
    }

    let loan_event = LoanGranted {
        user_id: account.user_id,
        amount,
        granted_at,
    };

    let with_loan = Account {
        loan: Some(Loan {
            user_id: account.user_id,
            amount,
            granted_at,
        }),
        version: account.version + 1,
        updated_at: granted_at,
        ..account.clone()
    };

    let (credited, credit_event) =
        credit(&with_loan, amount, granted_at).map_err(|_| LoanError::BalanceOverflow {
            balance: account.balance,
            requested: amount,
        })?;

    Ok((
        credited,
        vec![
            DomainEvent::LoanGranted(loan_event),
            DomainEvent::TransactionPosted(credit_event),
        ],
    ))
}

fn credit(
    account: &Account,
    amount: Amount,
    at: DateTime<Utc>,
) -> Result<(Account, TransactionPosted), TransactionError> {
    let balance_after =
        account
            .balance
            .checked_credit(amount)
            .ok_or(TransactionError::BalanceOverflow {
                balance: account.balance,
                requested: amount,
            })?;
    Ok(record(account, TransactionKind::Credit, amount, balance_after, at))
}

fn record(
    account: &Account,
    kind: TransactionKind,
    amount: Amount,
    balance_after: Money,
    posted_at: DateTime<Utc>,
) -> (Account, TransactionPosted) {
    let new_account = Account {
        balance: balance_after,
        version: account.version + 1,
        updated_at: posted_at,
        ..account.clone()
    };

    let event = TransactionPosted {
        user_id: account.user_id,
        kind,
        amount,
        balance_after,
        posted_at,
    };

    (new_account, event)
}

/// イベントを適用して新しい状態を生成する純粋関数
///
/// 残高は記録された`balance_after`ではなく、取引額から再計算する。
/// 不正な遷移（登録前のイベント、二重登録、残高不足の出金、二重融資、
/// 他ユーザーのイベント）は`ReplayError`として返す。
pub fn apply_event(account: Option<Account>, event: &DomainEvent) -> Result<Account, ReplayError> {
    if let Some(current) = &account {
        if current.user_id != event.user_id() {
            return Err(ReplayError::ForeignEvent {
                account: current.user_id,
                event: event.user_id(),
            });
        }
    }

    match (account, event) {
        (None, DomainEvent::UserRegistered(e)) => Ok(Account {
            user_id: e.user_id,
            name: e.name.clone(),
            balance: Money::zero(),
            loan: None,
            version: 1,
            created_at: e.registered_at,
            updated_at: e.registered_at,
        }),
        (Some(_), DomainEvent::UserRegistered(e)) => Err(ReplayError::AlreadyRegistered(e.user_id)),
        (None, other) => Err(ReplayError::NotRegistered(other.user_id())),

        (Some(current), DomainEvent::TransactionPosted(e)) => {
            let balance = match e.kind {
                TransactionKind::Credit => current.balance.checked_credit(e.amount).ok_or(
                    ReplayError::BalanceOverflow {
                        user_id: e.user_id,
                        balance: current.balance,
                        requested: e.amount,
                    },
                )?,
                TransactionKind::Debit => current.balance.checked_debit(e.amount).ok_or(
                    ReplayError::NegativeBalance {
                        user_id: e.user_id,
                        balance: current.balance,
                        requested: e.amount,
                    },
                )?,
            };

            Ok(Account {
                balance,
                version: current.version + 1,
                updated_at: e.posted_at,
                ..current
            })
        }

        (Some(current), DomainEvent::LoanGranted(e)) => {
            if current.has_loan() {
                return Err(ReplayError::DuplicateLoan(e.user_id));
            }

            Ok(Account {
                loan: Some(Loan {
                    user_id: e.user_id,
                    amount: e.amount,
                    granted_at: e.granted_at,
                }),
                version: current.version + 1,
                updated_at: e.granted_at,
                ..current
            })
        }
    }
}

/// イベント列から現在の状態を復元する純粋関数
///
/// # 戻り値
/// * イベントが空の場合は`Ok(None)`
/// * それ以外は復元されたAccountを`Ok(Some)`で返す
pub fn replay_events(events: &[DomainEvent]) -> Result<Option<Account>, ReplayError> {
    events
        .iter()
        .try_fold(None, |account, event| apply_event(account, event).map(Some))
}
