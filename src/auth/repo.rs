use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{NewUser, PublicUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The email is already taken; raised by the `users.email` unique constraint.
    #[error("user with this email already exists")]
    Duplicate,
    #[error("user store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

/// Persistence boundary for the `users` table.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a user and return its public projection.
    async fn insert(&self, user: NewUser<'_>) -> Result<PublicUser, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, role,
                   created_at AT TIME ZONE 'UTC' AS created_at,
                   updated_at AT TIME ZONE 'UTC' AS updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser<'_>) -> Result<PublicUser, StoreError> {
        // RETURNING never includes the password column.
        sqlx::query_as::<_, PublicUser>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role, created_at AT TIME ZONE 'UTC' AS created_at
            "#,
        )
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.db)
        .await
        .map_err(map_insert_error)
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Unavailable(err),
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryUserStore;
    use super::*;
    use crate::auth::repo_types::Role;

    fn new_user<'a>(email: &'a str) -> NewUser<'a> {
        NewUser {
            name: "Ada",
            email,
            password_hash: "$2b$04$hash",
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn insert_returns_projection_and_find_sees_it() {
        let store = MemoryUserStore::default();
        let public = store.insert(new_user("ada@example.com")).await.unwrap();
        assert_eq!(public.id, 1);
        assert_eq!(public.email, "ada@example.com");

        let found = store.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(found.password_hash, "$2b$04$hash");
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_insert_with_same_email_is_duplicate() {
        let store = MemoryUserStore::default();
        store.insert(new_user("ada@example.com")).await.unwrap();
        let err = store.insert(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
    }

    #[test]
    fn non_database_errors_are_unavailable() {
        let err = map_insert_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
