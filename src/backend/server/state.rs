/**
 * Application State Management
 *
 * This module defines the application state structure shared by handlers
 * and the stateful pipeline stages.
 *
 * # Architecture
 *
 * `AppState` is the explicit application context handed to every handler
 * and every stateful pipeline stage. It holds:
 * - the validated configuration
 * - the content store (snippets and users)
 * - the credential manager
 * - the session manager
 * - the page renderer
 *
 * There are no globals; everything a handler touches arrives through this
 * struct.
 *
 * # Thread Safety
 *
 * Every field is cheap to clone and safe to share. The store wraps a
 * connection pool and the session manager an `Arc<RwLock<..>>`.
 */

use std::sync::Arc;

use crate::backend::auth::{CredentialManager, SessionManager};
use crate::backend::render::Renderer;
use crate::backend::store::{Clock, ContentStore};
use crate::shared::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: ContentStore,
    pub credentials: CredentialManager,
    pub sessions: SessionManager,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    /// Assemble the state around an already connected store.
    ///
    /// `clock` should be the same clock the store was connected with, so
    /// session and snippet expiry agree on the time.
    pub fn new(
        config: AppConfig,
        store: ContentStore,
        clock: Arc<dyn Clock>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let credentials = CredentialManager::new(store.clone(), config.bcrypt_cost);
        let sessions = SessionManager::new(clock, config.session_lifetime, config.store_timeout);
        Self {
            config: Arc::new(config),
            store,
            credentials,
            sessions,
            renderer,
        }
    }
}
