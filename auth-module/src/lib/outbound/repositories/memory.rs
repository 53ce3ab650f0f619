use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::errors::UserError;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUserRecord;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Process local user storage.
///
/// Contents are lost on restart. The duplicate check and the insert happen
/// under one write lock.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    users: HashMap<EmailAddress, User>,
    last_id: i64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUserRecord) -> Result<User, UserError> {
        let mut store = self.store.write().await;

        if store.users.contains_key(&user.email) {
            return Err(UserError::AlreadyExists(user.email.to_string()));
        }

        store.last_id += 1;
        let created = User {
            id: UserId(store.last_id),
            email: user.email,
            password_hash: user.password_hash,
        };
        store.users.insert(created.email.clone(), created.clone());

        Ok(created)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self.store.read().await.users.get(email).cloned())
    }
}
