/**
 * Session Management
 *
 * Server-side sessions keyed by an opaque random token. The token travels
 * in a cookie; the values stay in memory on the server.
 *
 * # Semantics
 *
 * - [`SessionManager::load`] gives an unknown or expired token a fresh
 *   token; the record itself is only created on the first write. It fails
 *   only when the backing map stays locked past the timeout.
 * - Every write (`put_*`, `remove`, and a `pop_string` that removed a
 *   value) goes straight to the backing map and pushes the expiry out to
 *   `now + lifetime`.
 * - `pop_string` reads and deletes under one write lock, so a value read
 *   once is gone for every later reader until it is written again.
 *
 * # Thread Safety
 *
 * The backing map sits behind a `tokio::sync::RwLock`. All mutations take
 * the write lock, which gives sequential consistency per token. Lock
 * acquisition is bounded by the store timeout and reported as
 * [`SessionError::Timeout`].
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::backend::error::SessionError;
use crate::backend::store::Clock;

/// Session key holding the one-shot user message
pub const FLASH_KEY: &str = "flash";
/// Session key whose presence marks an authenticated session
pub const CURRENT_USER_KEY: &str = "currentUserID";

/// A typed session value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionValue {
    Str(String),
    Int(i64),
}

#[derive(Debug, Clone)]
struct SessionRecord {
    values: HashMap<String, SessionValue>,
    expires_at: DateTime<Utc>,
}

impl SessionRecord {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

type Records = HashMap<String, SessionRecord>;

/// Owns every session and hands out per-token [`Session`] handles.
#[derive(Clone)]
pub struct SessionManager {
    records: Arc<RwLock<Records>>,
    clock: Arc<dyn Clock>,
    lifetime: chrono::Duration,
    timeout: Duration,
}

impl SessionManager {
    pub fn new(clock: Arc<dyn Clock>, lifetime: Duration, timeout: Duration) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            clock,
            lifetime: chrono::Duration::from_std(lifetime).unwrap_or(chrono::Duration::hours(12)),
            timeout,
        }
    }

    /// Session lifetime, measured from the last write
    pub fn lifetime(&self) -> Duration {
        self.lifetime.to_std().unwrap_or_default()
    }

    /// Resolve `token` to a session handle.
    ///
    /// A token is reused only while a live record exists for it; anything
    /// else gets a new random token so clients cannot pick their own.
    ///
    /// # Errors
    ///
    /// * `SessionError::Timeout` - the backing map could not be read in time.
    ///   The caller's token is neither honoured nor replaced.
    pub async fn load(&self, token: Option<&str>) -> Result<Session, SessionError> {
        if let Some(token) = token {
            let now = self.clock.now();
            let known = self
                .read("load")
                .await?
                .get(token)
                .is_some_and(|r| r.is_live(now));
            if known {
                return Ok(Session::new(token.to_string(), false, self.clone()));
            }
        }
        Ok(Session::new(new_token(), true, self.clone()))
    }

    /// Drop every expired record. Returns the number evicted.
    pub async fn sweep_expired(&self) -> usize {
        let now = self.clock.now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, record| record.is_live(now));
        before - records.len()
    }

    async fn read(&self, operation: &'static str) -> Result<RwLockReadGuard<'_, Records>, SessionError> {
        tokio::time::timeout(self.timeout, self.records.read())
            .await
            .map_err(|_| SessionError::Timeout { operation })
    }

    async fn write(
        &self,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, Records>, SessionError> {
        tokio::time::timeout(self.timeout, self.records.write())
            .await
            .map_err(|_| SessionError::Timeout { operation })
    }

    /// Run `f` against the live record for `token`, creating or resetting it
    /// as needed, and renew its expiry.
    async fn mutate<T>(
        &self,
        operation: &'static str,
        token: &str,
        f: impl FnOnce(&mut HashMap<String, SessionValue>) -> T,
    ) -> Result<T, SessionError> {
        let now = self.clock.now();
        let mut records = self.write(operation).await?;
        let record = records.entry(token.to_string()).or_insert_with(|| SessionRecord {
            values: HashMap::new(),
            expires_at: now,
        });
        if !record.is_live(now) {
            record.values.clear();
        }
        let out = f(&mut record.values);
        record.expires_at = now + self.lifetime;
        Ok(out)
    }

    /// Remove and return a string value. The expiry is renewed only when
    /// something was actually removed.
    async fn take_string(&self, token: &str, key: &str) -> Result<Option<String>, SessionError> {
        let now = self.clock.now();
        let mut records = self.write("pop_string").await?;
        let Some(record) = records.get_mut(token).filter(|r| r.is_live(now)) else {
            return Ok(None);
        };
        if !matches!(record.values.get(key), Some(SessionValue::Str(_))) {
            return Ok(None);
        }
        let popped = match record.values.remove(key) {
            Some(SessionValue::Str(value)) => Some(value),
            _ => None,
        };
        record.expires_at = now + self.lifetime;
        Ok(popped)
    }

    async fn get(&self, operation: &'static str, token: &str, key: &str) -> Result<Option<SessionValue>, SessionError> {
        let now = self.clock.now();
        let records = self.read(operation).await?;
        Ok(records
            .get(token)
            .filter(|r| r.is_live(now))
            .and_then(|r| r.values.get(key).cloned()))
    }
}

fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Handle to one client's session for the duration of a request.
///
/// Cheap to clone; clones share the "written" flag that the session
/// middleware uses to decide whether to (re)issue the cookie.
#[derive(Clone)]
pub struct Session {
    token: Arc<str>,
    is_new: bool,
    written: Arc<AtomicBool>,
    manager: SessionManager,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("is_new", &self.is_new)
            .field("written", &self.was_written())
            .finish_non_exhaustive()
    }
}

impl Session {
    fn new(token: String, is_new: bool, manager: SessionManager) -> Self {
        Self {
            token: token.into(),
            is_new,
            written: Arc::new(AtomicBool::new(false)),
            manager,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the token was minted for this request
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// Whether anything was written through this handle
    pub fn was_written(&self) -> bool {
        self.written.load(Ordering::Acquire)
    }

    fn mark_written(&self) {
        self.written.store(true, Ordering::Release);
    }

    pub async fn put_string(&self, key: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let value = SessionValue::Str(value.into());
        self.manager
            .mutate("put_string", &self.token, |values| {
                values.insert(key.to_string(), value);
            })
            .await?;
        self.mark_written();
        Ok(())
    }

    pub async fn put_int(&self, key: &str, value: i64) -> Result<(), SessionError> {
        self.manager
            .mutate("put_int", &self.token, |values| {
                values.insert(key.to_string(), SessionValue::Int(value));
            })
            .await?;
        self.mark_written();
        Ok(())
    }

    /// Read and delete a string value in one step.
    ///
    /// Returns `None` when the key is absent. A non-string value under the
    /// key is left in place and also reported as `None`.
    pub async fn pop_string(&self, key: &str) -> Result<Option<String>, SessionError> {
        let popped = self.manager.take_string(&self.token, key).await?;
        if popped.is_some() {
            self.mark_written();
        }
        Ok(popped)
    }

    pub async fn get_int(&self, key: &str) -> Result<Option<i64>, SessionError> {
        match self.manager.get("get_int", &self.token, key).await? {
            Some(SessionValue::Int(v)) => Ok(Some(v)),
            _ => Ok(None),
        }
    }

    /// Non-destructive membership check
    pub async fn exists(&self, key: &str) -> Result<bool, SessionError> {
        Ok(self.manager.get("exists", &self.token, key).await?.is_some())
    }

    /// Delete a key without reading it
    pub async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.manager
            .mutate("remove", &self.token, |values| {
                values.remove(key);
            })
            .await?;
        self.mark_written();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::ManualClock;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn manager() -> (SessionManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = SessionManager::new(
            clock.clone(),
            Duration::from_secs(12 * 60 * 60),
            Duration::from_secs(1),
        );
        (manager, clock)
    }

    #[tokio::test]
    async fn test_pop_reads_once() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();

        session.put_string(FLASH_KEY, "x").await.unwrap();
        assert_eq!(session.pop_string(FLASH_KEY).await.unwrap(), Some("x".to_string()));
        assert_eq!(session.pop_string(FLASH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_pop_is_once_across_handles() {
        let (manager, _clock) = manager();
        let first = manager.load(None).await.unwrap();
        first.put_string(FLASH_KEY, "saved").await.unwrap();

        let second = manager.load(Some(first.token())).await.unwrap();
        assert!(!second.is_new());
        assert_eq!(second.pop_string(FLASH_KEY).await.unwrap().as_deref(), Some("saved"));

        let third = manager.load(Some(first.token())).await.unwrap();
        assert_eq!(third.pop_string(FLASH_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rewrite_after_pop() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();
        session.put_string(FLASH_KEY, "a").await.unwrap();
        session.pop_string(FLASH_KEY).await.unwrap();
        session.put_string(FLASH_KEY, "b").await.unwrap();
        assert_eq!(session.pop_string(FLASH_KEY).await.unwrap().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_exists_and_remove() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();
        assert!(!session.exists(CURRENT_USER_KEY).await.unwrap());

        session.put_int(CURRENT_USER_KEY, 7).await.unwrap();
        assert!(session.exists(CURRENT_USER_KEY).await.unwrap());
        assert!(session.exists(CURRENT_USER_KEY).await.unwrap());
        assert_eq!(session.get_int(CURRENT_USER_KEY).await.unwrap(), Some(7));

        session.remove(CURRENT_USER_KEY).await.unwrap();
        assert!(!session.exists(CURRENT_USER_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_pop_leaves_int_values_alone() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();
        session.put_int(CURRENT_USER_KEY, 1).await.unwrap();
        assert_eq!(session.pop_string(CURRENT_USER_KEY).await.unwrap(), None);
        assert_eq!(session.get_int(CURRENT_USER_KEY).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_token_is_replaced() {
        let (manager, _clock) = manager();
        let session = manager.load(Some("attacker-chosen")).await.unwrap();
        assert!(session.is_new());
        assert_ne!(session.token(), "attacker-chosen");
    }

    #[tokio::test]
    async fn test_session_expires_after_lifetime_since_last_write() {
        let (manager, clock) = manager();
        let session = manager.load(None).await.unwrap();
        session.put_int(CURRENT_USER_KEY, 1).await.unwrap();
        let token = session.token().to_string();

        clock.advance(chrono::Duration::hours(11));
        session.put_string(FLASH_KEY, "renew").await.unwrap();

        clock.advance(chrono::Duration::hours(11));
        let still_live = manager.load(Some(&token)).await.unwrap();
        assert!(!still_live.is_new());
        assert!(still_live.exists(CURRENT_USER_KEY).await.unwrap());

        clock.advance(chrono::Duration::hours(2));
        let expired = manager.load(Some(&token)).await.unwrap();
        assert!(expired.is_new());
        assert!(!session.exists(CURRENT_USER_KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_sweep_evicts_only_expired() {
        let (manager, clock) = manager();
        let old = manager.load(None).await.unwrap();
        old.put_string("k", "v").await.unwrap();

        clock.advance(chrono::Duration::hours(13));
        let fresh = manager.load(None).await.unwrap();
        fresh.put_string("k", "v").await.unwrap();

        assert_eq!(manager.sweep_expired().await, 1);
        assert_eq!(manager.records.read().await.len(), 1);
        assert!(fresh.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_pops_deliver_once() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();
        session.put_string(FLASH_KEY, "only-once").await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..16 {
            let handle = manager.load(Some(session.token())).await.unwrap();
            handles.push(tokio::spawn(async move { handle.pop_string(FLASH_KEY).await.unwrap() }));
        }

        let mut delivered = 0;
        for handle in handles {
            if handle.await.unwrap().is_some() {
                delivered += 1;
            }
        }
        assert_eq!(delivered, 1);
    }

    #[tokio::test]
    async fn test_written_flag() {
        let (manager, _clock) = manager();
        let session = manager.load(None).await.unwrap();
        assert!(!session.was_written());
        assert_eq!(session.pop_string(FLASH_KEY).await.unwrap(), None);
        assert!(!session.was_written());
        session.put_string(FLASH_KEY, "x").await.unwrap();
        assert!(session.clone().was_written());
    }

    #[tokio::test]
    async fn test_locked_store_times_out_without_losing_the_session() {
        let clock = Arc::new(ManualClock::starting_now());
        let manager = SessionManager::new(clock, Duration::from_secs(43_200), Duration::from_millis(50));
        let session = manager.load(None).await.unwrap();
        session.put_int(CURRENT_USER_KEY, 1).await.unwrap();
        let token = session.token().to_string();

        let held = manager.records.write().await;
        assert_matches!(
            session.put_string(FLASH_KEY, "x").await,
            Err(SessionError::Timeout { operation: "put_string" })
        );
        assert_matches!(
            session.pop_string(FLASH_KEY).await,
            Err(SessionError::Timeout { operation: "pop_string" })
        );
        assert_matches!(
            session.exists(CURRENT_USER_KEY).await,
            Err(SessionError::Timeout { operation: "exists" })
        );
        assert_matches!(
            manager.load(Some(&token)).await,
            Err(SessionError::Timeout { operation: "load" })
        );
        drop(held);

        let reloaded = manager.load(Some(&token)).await.unwrap();
        assert!(!reloaded.is_new());
        assert_eq!(reloaded.token(), token);
        assert_eq!(reloaded.get_int(CURRENT_USER_KEY).await.unwrap(), Some(1));
    }
}
