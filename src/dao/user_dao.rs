use super::traits::UserStore;
use crate::constants;
use crate::model::user::User;
use crate::types::error::{Error, Result};
use crate::utils::{generator::IdGenerator, hasher};
use std::sync::Arc;

pub struct UserRepository {
    store: Arc<dyn UserStore>,
    ids: Arc<dyn IdGenerator>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn UserStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(Error::NoUser)?;
        if !hasher::verify_password(password, &user.password) {
            return Err(Error::BadPass);
        }
        Ok(user)
    }

    /// A taken username surfaces as `Error::AlreadyExist` from the store.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let user = User::new(
            self.ids.generate_id(constants::ID_LEN),
            username,
            hasher::hash_password(password),
        );
        self.store.insert(&user).await?;
        tracing::info!(user = %user.username, "user registered");
        Ok(user)
    }
}
