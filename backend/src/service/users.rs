use rand::RngExt;
use rand::rng;
use tracing::info;
use uuid::Uuid;

use crate::db::models::{NewUser, User};
use crate::db::repo::Store;
use crate::error::AppError;

/// Uniform over 000000..=999999, zero padded.
pub fn generate_secret_code() -> String {
    format!("{:06}", rng().random_range(0..1_000_000u32))
}

#[derive(Clone)]
pub struct UserService {
    store: Store,
}

impl UserService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Creates the user and hands back its secret code. This is the only
    /// response that ever carries a freshly issued code.
    pub async fn register(&self, new_user: NewUser) -> Result<User, AppError> {
        let user = User {
            id: Uuid::new_v4(),
            secret_code: generate_secret_code(),
            name: new_user.name,
            email: new_user.email,
            complaints: Vec::new(),
        };

        self.store.insert_user(&user).await?;
        info!("Registered user {}", user.id);

        Ok(user)
    }

    pub async fn login(&self, secret_code: &str) -> Result<User, AppError> {
        self.store
            .find_user_by_secret_code(secret_code)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    pub async fn find(&self, id: Uuid) -> Result<User, AppError> {
        self.store
            .find_user_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }

    /// Read-modify-write of the user's complaint list. Two concurrent calls
    /// for the same user can lose one of the appended ids.
    pub async fn append_complaint(
        &self,
        user_id: Uuid,
        complaint_id: Uuid,
    ) -> Result<(), AppError> {
        let mut user = self.find(user_id).await?;
        user.complaints.push(complaint_id);

        self.store.set_user_complaints(user.id, &user.complaints).await?;

        Ok(())
    }
}
