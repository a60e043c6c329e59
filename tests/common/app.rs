//! Application test fixture
//!
//! Builds the full router on top of an in-memory SQLite database. Time is
//! driven by a [`ManualClock`] so expiry can be tested without sleeping.

use std::sync::Arc;

use axum::Router;
use snippetbox::backend::render::HtmlRenderer;
use snippetbox::backend::routes::create_router;
use snippetbox::backend::server::{create_state, AppState};
use snippetbox::backend::store::ManualClock;
use snippetbox::shared::AppConfig;

use super::client::TestClient;

/// Test application fixture
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a fresh application with its own empty database
    pub async fn new() -> Self {
        let config = AppConfig::builder()
            .database_url("sqlite::memory:")
            .bcrypt_cost(4)
            .build()
            .expect("test config is valid");
        let clock = Arc::new(ManualClock::starting_now());

        let state = create_state(config, clock.clone(), Arc::new(HtmlRenderer))
            .await
            .expect("Failed to create test state");
        let router = create_router(state.clone()).expect("pipeline is valid");

        Self {
            router,
            state,
            clock,
        }
    }

    /// A client with an empty cookie jar
    pub fn client(&self) -> TestClient {
        TestClient::new(self.router.clone())
    }

    pub fn advance(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }
}

/// Test user credentials
pub struct TestUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "pa55word!".to_string(),
        }
    }
}

/// Sign up `user` through the HTTP interface and assert it worked
pub async fn signup_user(client: &mut TestClient, user: &TestUser) {
    let response = client
        .post_form(
            "/user/signup",
            &[
                ("name", user.name.as_str()),
                ("email", user.email.as_str()),
                ("password", user.password.as_str()),
            ],
        )
        .await;
    assert_eq!(response.status, 303, "signup failed: {}", response.body);
    assert_eq!(response.location(), Some("/user/login"));
}

/// Log `user` in through the HTTP interface and assert it worked
pub async fn login_user(client: &mut TestClient, user: &TestUser) {
    let response = client
        .post_form(
            "/user/login",
            &[("email", user.email.as_str()), ("password", user.password.as_str())],
        )
        .await;
    assert_eq!(response.status, 303, "login failed: {}", response.body);
    assert_eq!(response.location(), Some("/snippet/new"));
}

/// Sign up and log in a default user, returning a logged-in client
pub async fn logged_in_client(app: &TestApp) -> TestClient {
    let mut client = app.client();
    let user = TestUser::default();
    signup_user(&mut client, &user).await;
    login_user(&mut client, &user).await;
    client
}
