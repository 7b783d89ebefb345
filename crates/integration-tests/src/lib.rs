//! Integration tests for Lunchdesk.
//!
//! Every test starts its own [`MockBackend`]: an axum server bound to an
//! ephemeral port that speaks the admin API, keeps its data in memory and
//! records every request it receives. Tests drive a real
//! [`lunchdesk_client::Console`] against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lunchdesk-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session` - Bearer token, sign-in and session expiry
//! - `locations` - Location CRUD and cache invalidation
//! - `meals` - Multipart uploads and per-day invalidation
//! - `accounts` - Users, orders, profile and passwords
//! - `concurrency` - Request coalescing and pending mutations

#![cfg_attr(not(test), forbid(unsafe_code))]

mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lunchdesk_client::{ApiClient, ClientConfig, Console, QueryCache, Session, SessionStore};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use state::{ADMIN_EMAIL, ADMIN_NAME, ADMIN_PASSWORD, RecordedRequest, VALID_OTP};

use state::{Backend, Injected, MockState};

/// Page size the test consoles use.
pub const PAGE_SIZE: u32 = 10;

/// An in-process admin API.
pub struct MockBackend {
    addr: SocketAddr,
    state: MockState,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a server seeded with two locations, four meals, three users and
    /// two orders.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start() -> Self {
        let state = MockState(Arc::new(Mutex::new(Backend::seeded())));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock admin API");
        let addr = listener.local_addr().expect("mock admin API address");
        let app = routes::router(state.clone());
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            addr,
            state,
            server,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the URL is rejected, which would be a bug in the mock.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        let base_url = self.base_url();
        ClientConfig::from_lookup(|key| match key {
            "LUNCHDESK_BASE_URL" => Some(base_url.clone()),
            "LUNCHDESK_PAGE_SIZE" => Some(PAGE_SIZE.to_string()),
            "LUNCHDESK_TIMEOUT_SECS" => Some("5".to_string()),
            _ => None,
        })
        .expect("mock client config")
    }

    /// A console with no session.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build.
    #[must_use]
    pub fn console(&self) -> Console {
        Console::new(&self.config()).expect("console")
    }

    /// A console whose session already carries the current token.
    pub async fn signed_in_console(&self) -> Console {
        let console = self.console();
        console
            .resume(Session::from_token(SecretString::from(self.token())))
            .await;
        console
    }

    /// A bare API client, for tests below the console.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client fails to build.
    #[must_use]
    pub fn api(&self, session: SessionStore) -> ApiClient {
        ApiClient::new(&self.config(), session).expect("api client")
    }

    /// A cache with the default capacity and TTL.
    #[must_use]
    pub fn cache(&self) -> QueryCache {
        QueryCache::from_config(&self.config())
    }

    /// The token the server currently accepts.
    #[must_use]
    pub fn token(&self) -> String {
        self.state.lock().token.clone()
    }

    /// Issue a new token; requests bearing the old one get 401.
    pub fn revoke_token(&self) {
        let mut backend = self.state.lock();
        let next = backend.next_id("token");
        backend.token = next;
    }

    /// Delay every response.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = Some(latency);
    }

    /// Handle the next `method path` request at once but hold its response
    /// back for `delay`, so it carries data from before anything that
    /// happens meanwhile.
    pub fn hold_next(&self, method: &str, path: &str, delay: Duration) {
        self.state
            .lock()
            .held
            .push((method.to_string(), path.to_string(), delay));
    }

    /// Answer the next `method path` request with `status` and
    /// `{"message": message}`.
    pub fn fail_next(&self, method: &str, path: &str, status: u16, message: &str) {
        self.respond_next(method, path, status, json!({ "message": message }));
    }

    /// Answer the next `method path` request with `status` and `body`.
    pub fn respond_next(&self, method: &str, path: &str, status: u16, body: Value) {
        self.state.lock().injected.push(Injected {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body,
        });
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests matching `method` and `path`.
    #[must_use]
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    #[must_use]
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn clear_requests(&self) {
        self.state.lock().requests.clear();
    }

    /// Current stored record with `_id == id` from `collection`.
    #[must_use]
    pub fn record(&self, collection: &str, id: &str) -> Option<Value> {
        let backend = self.state.lock();
        let items = match collection {
            "locations" => &backend.locations,
            "meals" => &backend.meals,
            "users" => &backend.users,
            "orders" => &backend.orders,
            _ => return None,
        };
        items.iter().find(|item| item["_id"] == id).cloned()
    }

    /// Ids of stored records in `collection`.
    #[must_use]
    pub fn ids(&self, collection: &str) -> Vec<String> {
        let backend = self.state.lock();
        let items = match collection {
            "locations" => &backend.locations,
            "meals" => &backend.meals,
            "users" => &backend.users,
            "orders" => &backend.orders,
            _ => return Vec::new(),
        };
        items
            .iter()
            .filter_map(|item| item["_id"].as_str().map(str::to_string))
            .collect()
    }

    /// Add a location directly, bypassing the API.
    pub fn seed_location(&self, name: &str, address: &str, is_active: bool) -> Value {
        self.state.lock().add_location(name, address, is_active)
    }

    /// Add a meal directly, bypassing the API.
    pub fn seed_meal(&self, day: &str, description: &str, price: f64) -> Value {
        self.state.lock().add_meal(day, description, price)
    }

    /// The stored admin profile.
    #[must_use]
    pub fn profile(&self) -> Value {
        self.state.lock().profile.clone()
    }

    /// The admin password the server currently accepts.
    #[must_use]
    pub fn password(&self) -> String {
        self.state.lock().password.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}
