use secrecy::Secret;
use std::collections::HashMap;

use crate::domain::{Email, User, UserId, UserStore, UserStoreError};

#[derive(Default)]
pub struct HashmapUserStore {
    users: HashMap<Email, User>,
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&mut self, user: User) -> Result<(), UserStoreError> {
        let email = &user.email;

        if self.users.contains_key(email) {
            return Err(UserStoreError::UserAlreadyExists);
        }

        self.users.insert(email.clone(), user);
        Ok(())
    }

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        match self.users.get(email) {
            Some(user) => Ok(user.clone()),
            None => Err(UserStoreError::UserNotFound),
        }
    }

    async fn get_user_by_id(
        &self,
        id: &UserId,
    ) -> Result<User, UserStoreError> {
        self.users
            .values()
            .find(|user| &user.id == id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn update_user(
        &mut self,
        user: &User,
    ) -> Result<(), UserStoreError> {
        let existing = self
            .users
            .values_mut()
            .find(|existing| existing.id == user.id)
            .ok_or(UserStoreError::UserNotFound)?;
        *existing = user.clone();
        Ok(())
    }

    async fn validate_user(
        &self,
        email: &Email,
        password: &Secret<String>,
    ) -> Result<User, UserStoreError> {
        let user = self.get_user(email).await?;
        if user.is_active && user.check_password(password).await {
            Ok(user)
        } else {
            Err(UserStoreError::InvalidCredentials)
        }
    }
}
