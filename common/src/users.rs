// User persistence operation

use crate::db::repositories::UserRepository;
use crate::db::UnitOfWork;
use crate::errors::PersistenceError;
use crate::models::{NewUser, RegisterUser, UserPublic};
use tracing::{error, info, instrument};

/// bcrypt cost used for stored credentials
pub const PASSWORD_HASH_COST: u32 = bcrypt::DEFAULT_COST;

/// Create one user inside `uow` and commit it.
///
/// `data` must already be validated. Exactly one row is written on success;
/// on any error the unit of work is dropped uncommitted, so nothing is written.
#[instrument(skip(uow, data), fields(username = %data.username))]
pub async fn create_user(
    mut uow: UnitOfWork,
    data: RegisterUser,
) -> Result<UserPublic, PersistenceError> {
    let password_hash = hash_password(data.password, PASSWORD_HASH_COST).await?;
    let new_user = NewUser::new(data.username, data.email, password_hash);

    let user = UserRepository::insert(uow.conn(), &new_user)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert user");
            PersistenceError::from(e)
        })?;

    uow.commit().await?;

    info!(user_id = %user.id, "User created");
    Ok(UserPublic::from(user))
}

/// Hash a password on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, PersistenceError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| PersistenceError::Credential(e.to_string()))?
        .map_err(|e| {
            error!(error = %e, "Failed to hash password");
            PersistenceError::Credential(e.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_password_produces_verifiable_hash() {
        let hash = hash_password("secret123".to_string(), 4).await.unwrap();
        assert_ne!(hash, "secret123");
        assert!(bcrypt::verify("secret123", &hash).unwrap());
        assert!(!bcrypt::verify("secret124", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_hash_password_rejects_invalid_cost() {
        let result = hash_password("secret123".to_string(), 2).await;
        assert!(matches!(result, Err(PersistenceError::Credential(_))));
    }
}
