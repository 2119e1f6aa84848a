use crate::domain::value_objects::UserId;
use crate::ports::user_read_model::{Result, UserReadModel as UserReadModelTrait, UserView};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-memory implementation of UserReadModel
///
/// Views are kept in a BTreeMap so listing is ordered by user id.
pub struct UserReadModel {
    users: Mutex<BTreeMap<UserId, UserView>>,
}

impl UserReadModel {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for UserReadModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserReadModelTrait for UserReadModel {
    async fn save(&self, user_view: UserView) -> Result<()> {
        let mut users = self.users.lock().map_err(|_| "users view lock poisoned")?;
        match users.get(&user_view.user_id) {
            Some(current) if current.version > user_view.version => {}
            _ => {
                users.insert(user_view.user_id, user_view);
            }
        }
        Ok(())
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<UserView>> {
        let users = self.users.lock().map_err(|_| "users view lock poisoned")?;
        Ok(users.get(&user_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<UserView>> {
        let users = self.users.lock().map_err(|_| "users view lock poisoned")?;
        Ok(users.values().cloned().collect())
    }
}
