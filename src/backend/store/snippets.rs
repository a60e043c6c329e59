/**
 * Snippet Queries
 *
 * Insert and read snippets. Expiry is computed here from the store clock at
 * insertion time, never taken from the client.
 */

use chrono::Duration;

use crate::backend::error::StorageError;
use crate::backend::store::ContentStore;
use crate::shared::{Expiry, Snippet, SnippetId};

/// Maximum number of snippets on the home page
pub const LATEST_LIMIT: i64 = 10;

impl ContentStore {
    /// Insert a snippet that expires `expiry` after now.
    ///
    /// # Returns
    /// The new snippet's id
    pub async fn insert_snippet(
        &self,
        title: &str,
        content: &str,
        expiry: Expiry,
    ) -> Result<SnippetId, StorageError> {
        let created = self.clock.now();
        let expires = created + Duration::seconds(expiry.as_secs());

        let result = self
            .bounded(
                "insert_snippet",
                sqlx::query(
                    r#"
                    INSERT INTO snippets (title, content, created, expires)
                    VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(title)
                .bind(content)
                .bind(created)
                .bind(expires)
                .execute(&self.pool),
            )
            .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, expires = %expires, "snippet inserted");
        Ok(id)
    }

    /// Fetch a snippet if it is live.
    ///
    /// An expired snippet and one that never existed both come back as
    /// `Ok(None)`.
    pub async fn get_snippet(&self, id: SnippetId) -> Result<Option<Snippet>, StorageError> {
        let now = self.clock.now();
        self.bounded(
            "get_snippet",
            sqlx::query_as::<_, Snippet>(
                r#"
                SELECT id, title, content, created, expires
                FROM snippets
                WHERE expires > ? AND id = ?
                "#,
            )
            .bind(now)
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    /// Up to ten live snippets, newest first. Snippets created in the same
    /// second keep their insertion order.
    pub async fn latest_snippets(&self) -> Result<Vec<Snippet>, StorageError> {
        let now = self.clock.now();
        self.bounded(
            "latest_snippets",
            sqlx::query_as::<_, Snippet>(
                r#"
                SELECT id, title, content, created, expires
                FROM snippets
                WHERE expires > ?
                ORDER BY created DESC, id ASC
                LIMIT ?
                "#,
            )
            .bind(now)
            .bind(LATEST_LIMIT)
            .fetch_all(&self.pool),
        )
        .await
    }

    /// Number of stored snippet rows, expired ones included.
    pub async fn stored_snippet_count(&self) -> Result<i64, StorageError> {
        self.bounded(
            "stored_snippet_count",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM snippets").fetch_one(&self.pool),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::backend::store::test_support::memory_store;
    use crate::shared::Expiry;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_expires_is_created_plus_duration() {
        let (store, _clock) = memory_store().await;
        for expiry in Expiry::ALL {
            let id = store.insert_snippet("title", "content", expiry).await.unwrap();
            let snippet = store.get_snippet(id).await.unwrap().expect("live snippet");
            assert_eq!(snippet.expires - snippet.created, Duration::seconds(expiry.as_secs()));
            assert_eq!(snippet.created, store.now());
        }
    }

    #[tokio::test]
    async fn test_expired_and_missing_look_the_same() {
        let (store, clock) = memory_store().await;
        let id = store.insert_snippet("t", "c", Expiry::OneHour).await.unwrap();

        clock.advance(Duration::seconds(3600));
        let expired = store.get_snippet(id).await.unwrap();
        let missing = store.get_snippet(id + 1000).await.unwrap();
        assert_eq!(expired, None);
        assert_eq!(missing, None);

        // still physically stored
        assert_eq!(store.stored_snippet_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_snippet_visible_until_expiry() {
        let (store, clock) = memory_store().await;
        let id = store.insert_snippet("Café", "Hello", Expiry::OneHour).await.unwrap();

        clock.advance(Duration::seconds(10));
        let snippet = store.get_snippet(id).await.unwrap().unwrap();
        assert_eq!(snippet.title, "Café");
        assert_eq!(snippet.content, "Hello");

        clock.advance(Duration::seconds(3589));
        assert!(store.get_snippet(id).await.unwrap().is_some());

        clock.advance(Duration::seconds(2));
        assert!(store.get_snippet(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_snippets_limit_order_and_liveness() {
        let (store, clock) = memory_store().await;

        // will be expired by the time we list
        store.insert_snippet("short", "c", Expiry::OneHour).await.unwrap();
        clock.advance(Duration::seconds(1));

        let mut ids = Vec::new();
        for i in 0..12 {
            ids.push(store.insert_snippet(&format!("s{i}"), "c", Expiry::OneDay).await.unwrap());
            clock.advance(Duration::seconds(1));
        }
        clock.advance(Duration::seconds(3600));

        let latest = store.latest_snippets().await.unwrap();
        assert_eq!(latest.len(), 10);

        let now = store.now();
        assert!(latest.iter().all(|s| s.expires > now));
        assert!(latest.windows(2).all(|w| w[0].created >= w[1].created));

        let expected: Vec<_> = ids.iter().rev().take(10).copied().collect();
        let got: Vec<_> = latest.iter().map(|s| s.id).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_latest_snippets_same_second_ties() {
        let (store, _clock) = memory_store().await;
        let a = store.insert_snippet("a", "c", Expiry::OneDay).await.unwrap();
        let b = store.insert_snippet("b", "c", Expiry::OneDay).await.unwrap();
        let c = store.insert_snippet("c", "c", Expiry::OneDay).await.unwrap();

        let got: Vec<_> = store.latest_snippets().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(got, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_latest_snippets_empty() {
        let (store, _clock) = memory_store().await;
        assert!(store.latest_snippets().await.unwrap().is_empty());
    }
}
