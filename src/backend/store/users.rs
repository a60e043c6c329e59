/**
 * User Storage Primitives
 *
 * The raw insert and lookup that the credential manager builds on. This
 * layer never sees plaintext passwords and does not interpret constraint
 * failures; it returns them as [`StorageError`] for the caller to classify.
 */

use crate::backend::error::StorageError;
use crate::backend::store::ContentStore;
use crate::shared::UserId;

/// Id and stored hash for one email address
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredCredentials {
    pub id: UserId,
    pub password_hash: String,
}

impl ContentStore {
    /// Insert a user row. A second row with the same email fails with a
    /// unique violation (see [`StorageError::is_unique_violation`]).
    pub async fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, StorageError> {
        let created = self.clock.now();
        let result = self
            .bounded(
                "insert_user",
                sqlx::query(
                    r#"
                    INSERT INTO users (name, email, password_hash, created)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(name)
                .bind(email)
                .bind(password_hash)
                .bind(created)
                .execute(&self.pool),
            )
            .await?;
        Ok(result.last_insert_rowid())
    }

    /// Look up the stored hash for an exact (case-sensitive) email.
    pub async fn credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, StorageError> {
        self.bounded(
            "credentials_by_email",
            sqlx::query_as::<_, StoredCredentials>(
                "SELECT id, password_hash FROM users WHERE email = ?",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn user_count(&self) -> Result<i64, StorageError> {
        self.bounded(
            "user_count",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users").fetch_one(&self.pool),
        )
        .await
    }
}
