use crate::domain::value_objects::UserId;
use crate::ports::loan_read_model::{LoanReadModel as LoanReadModelTrait, LoanView, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory implementation of LoanReadModel
pub struct LoanReadModel {
    loans: Mutex<BTreeMap<UserId, LoanView>>,
}

impl LoanReadModel {
    pub fn new() -> Self {
        Self {
            loans: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for LoanReadModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoanReadModelTrait for LoanReadModel {
    async fn save(&self, loan_view: LoanView) -> Result<()> {
        let mut loans = self.loans.lock().map_err(|_| "loans view lock poisoned")?;
        loans.insert(loan_view.user_id, loan_view);
        Ok(())
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Option<LoanView>> {
        let loans = self.loans.lock().map_err(|_| "loans view lock poisoned")?;
        Ok(loans.get(&user_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<LoanView>> {
        let loans = self.loans.lock().map_err(|_| "loans view lock poisoned")?;
        Ok(loans.values().cloned().collect())
    }
}
