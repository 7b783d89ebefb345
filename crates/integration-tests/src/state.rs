//! In-memory data and request log of the mock admin API.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::{Value, json};

pub const ADMIN_EMAIL: &str = "admin@lunch.example";
pub const ADMIN_PASSWORD: &str = "correct-horse";
pub const ADMIN_NAME: &str = "Dana Admin";
pub const VALID_OTP: &str = "123456";
pub const CREATED_AT: &str = "2026-01-05T10:00:00Z";

/// One request as the mock server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// Parsed body of JSON requests.
    pub json: Option<Value>,
}

impl RecordedRequest {
    /// Value of query parameter `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<String> {
        self.query.as_deref()?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
    }
}

/// A canned response for the next matching request.
#[derive(Debug, Clone)]
pub(crate) struct Injected {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, Default)]
pub(crate) struct Backend {
    pub token: String,
    pub password: String,
    pub locations: Vec<Value>,
    pub meals: Vec<Value>,
    pub users: Vec<Value>,
    pub orders: Vec<Value>,
    pub profile: Value,
    pub requests: Vec<RecordedRequest>,
    pub injected: Vec<Injected>,
    /// Responses held back after the handler ran: `(method, path, delay)`.
    pub held: Vec<(String, String, Duration)>,
    pub latency: Option<Duration>,
    next_id: u64,
}

impl Backend {
    pub fn seeded() -> Self {
        let mut backend = Self {
            token: "token-1".to_string(),
            password: ADMIN_PASSWORD.to_string(),
            profile: json!({ "name": ADMIN_NAME, "companyName": "Preissler's Lunch" }),
            ..Self::default()
        };
        backend.add_location("Head Office", "1 Main St", true);
        backend.add_location("Warehouse", "22 Dock Rd", false);
        for (day, description, price) in [
            ("Monday", "Grilled salmon with rice", 12.5),
            ("Monday", "Vegetable lasagne", 9.0),
            ("Tuesday", "Chicken curry", 10.75),
            ("Wednesday", "Beef stew", 11.0),
        ] {
            backend.add_meal(day, description, price);
        }
        for (name, email, total, delivered) in [
            ("Ana Lopez", "ana@example.com", 12, 10),
            ("Ben Okafor", "ben@example.com", 3, 3),
            ("Chen Wei", "chen@example.com", 0, 0),
        ] {
            backend.add_user(name, email, total, delivered);
        }
        backend.add_order("pending", "Ana Lopez", 25.5);
        backend.add_order("delivered", "Ben Okafor", 9.0);
        backend
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    pub fn add_location(&mut self, name: &str, address: &str, is_active: bool) -> Value {
        let location = json!({
            "_id": self.next_id("loc"),
            "name": name,
            "address": address,
            "isActive": is_active,
            "createdBy": { "name": ADMIN_NAME, "email": ADMIN_EMAIL },
            "createdAt": CREATED_AT,
        });
        self.locations.push(location.clone());
        location
    }

    pub fn add_meal(&mut self, day: &str, description: &str, price: f64) -> Value {
        let meal = json!({
            "_id": self.next_id("meal"),
            "description": description,
            "price": price,
            "availableDay": day,
            "mainImage": "https://cdn.lunch.example/meal.jpg",
            "otherImages": [],
            "createdAt": CREATED_AT,
        });
        self.meals.push(meal.clone());
        meal
    }

    pub fn add_user(&mut self, name: &str, email: &str, total: u32, delivered: u32) -> Value {
        let user = json!({
            "_id": self.next_id("user"),
            "name": name,
            "email": email,
            "totalOrders": total,
            "deliveredOrders": delivered,
            "pendingOrders": total - delivered,
        });
        self.users.push(user.clone());
        user
    }

    pub fn add_order(&mut self, status: &str, customer: &str, total: f64) -> Value {
        let order = json!({
            "_id": self.next_id("order"),
            "status": status,
            "customerName": customer,
            "total": total,
            "items": [{ "meal": "Chicken curry", "quantity": 1 }],
        });
        self.orders.push(order.clone());
        order
    }

    pub fn take_held(&mut self, method: &str, path: &str) -> Option<Duration> {
        let index = self
            .held
            .iter()
            .position(|(m, p, _)| m == method && p == path)?;
        Some(self.held.remove(index).2)
    }

    pub fn take_injected(&mut self, method: &str, path: &str) -> Option<Injected> {
        let index = self
            .injected
            .iter()
            .position(|i| i.method == method && i.path == path)?;
        Some(self.injected.remove(index))
    }
}

/// Shared mock state. The lock is never held across an await.
#[derive(Clone)]
pub struct MockState(pub(crate) Arc<Mutex<Backend>>);

impl MockState {
    pub(crate) fn lock(&self) -> MutexGuard<'_, Backend> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
