/**
 * Credential Manager
 *
 * Hashes and verifies passwords on top of the content store's user
 * primitives, and classifies storage failures into domain errors.
 *
 * # Security
 *
 * - Passwords are hashed with bcrypt at the configured cost (12 by default)
 * - Hashing and verification run on the blocking thread pool
 * - An unknown email still pays for one bcrypt verification, and both
 *   failure paths return the same `InvalidCredentials` error
 */

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::backend::error::BackendError;
use crate::backend::store::ContentStore;
use crate::shared::UserId;

/// Verified against when the email is unknown
const DUMMY_PASSWORD: &str = "snippetbox-dummy-password";

#[derive(Clone)]
pub struct CredentialManager {
    store: ContentStore,
    cost: u32,
    dummy_hash: Arc<OnceCell<String>>,
}

impl CredentialManager {
    pub fn new(store: ContentStore, cost: u32) -> Self {
        Self {
            store,
            cost,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// * `DuplicateEmail` - a user with this exact email already exists
    /// * `Storage` - any other persistence fault
    /// * `Hashing` - bcrypt failed
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserId, BackendError> {
        let password_hash = hash_password(password, self.cost).await?;

        match self.store.insert_user(name, email, &password_hash).await {
            Ok(id) => {
                tracing::info!(user_id = id, "User created successfully");
                Ok(id)
            }
            Err(e) if e.is_unique_violation() => {
                tracing::warn!("Signup rejected: email already registered");
                Err(BackendError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check an email/password pair and return the user's id.
    ///
    /// # Errors
    ///
    /// * `InvalidCredentials` - unknown email or wrong password
    /// * `Storage` / `Hashing` - server-side faults
    pub async fn verify_user(&self, email: &str, password: &str) -> Result<UserId, BackendError> {
        let Some(stored) = self.store.credentials_by_email(email).await? else {
            // Burn the same work as a real check before answering.
            let dummy = self.dummy_hash().await?;
            let _ = verify_password(password, &dummy).await?;
            tracing::warn!("Login rejected: invalid credentials");
            return Err(BackendError::InvalidCredentials);
        };

        if !verify_password(password, &stored.password_hash).await? {
            tracing::warn!("Login rejected: invalid credentials");
            return Err(BackendError::InvalidCredentials);
        }

        tracing::info!(user_id = stored.id, "User logged in successfully");
        Ok(stored.id)
    }

    async fn dummy_hash(&self) -> Result<String, BackendError> {
        self.dummy_hash
            .get_or_try_init(|| hash_password(DUMMY_PASSWORD, self.cost))
            .await
            .cloned()
    }
}

async fn hash_password(password: &str, cost: u32) -> Result<String, BackendError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::Hashing(e.to_string()))??;
    Ok(hashed)
}

async fn verify_password(password: &str, hash: &str) -> Result<bool, BackendError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::Hashing(e.to_string()))??;
    Ok(valid)
}
