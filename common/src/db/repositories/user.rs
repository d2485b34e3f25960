// User repository: queries run on whatever executor the caller holds,
// normally the connection of a unit of work

use crate::errors::DatabaseError;
use crate::models::{NewUser, User};
use sqlx::postgres::PgExecutor;
use tracing::instrument;
use uuid::Uuid;

/// Repository for user-related database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user and return the stored row
    #[instrument(skip(executor, user), fields(user_id = %user.id, username = %user.username))]
    pub async fn insert<'e, E>(executor: E, user: &NewUser) -> Result<User, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let stored = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(executor)
        .await?;

        tracing::debug!("User row inserted");
        Ok(stored)
    }

    /// Find a user by username
    #[instrument(skip(executor))]
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<User>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    #[instrument(skip(executor))]
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Count stored users
    #[instrument(skip(executor))]
    pub async fn count<'e, E>(executor: E) -> Result<i64, DatabaseError>
    where
        E: PgExecutor<'e>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }
}
