//! Route handlers of the mock admin API.

use std::collections::HashMap;

use axum::body::{Body, to_bytes};
use axum::extract::{FromRequestParts, Multipart, Path, Query, Request, State};
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::state::{ADMIN_EMAIL, ADMIN_NAME, CREATED_AT, MockState, RecordedRequest, VALID_OTP};

type ApiResult = Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)>;

const MAX_BODY: usize = 10 * 1024 * 1024;

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/locations", get(list_locations).post(create_location))
        .route("/admin/locations/{id}", put(update_location).delete(delete_location))
        .route("/admin/meals", get(list_meals).post(create_meal))
        .route("/admin/meals/{id}", put(update_meal).delete(delete_meal))
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", get(get_user).delete(delete_user))
        .route("/admin/orders", get(list_orders))
        .route("/admin/orders/{id}/status", put(update_order_status))
        .route("/admin/profile", put(update_profile))
        .route("/admin/change-password", put(change_password))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

fn ok(body: Value) -> ApiResult {
    Ok((StatusCode::OK, Json(body)))
}

fn created(body: Value) -> ApiResult {
    Ok((StatusCode::CREATED, Json(body)))
}

fn fail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

/// Log every request, apply latency, held responses and injected responses.
async fn record(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_BODY).await.unwrap_or_default();
    let header_value = |name: header::HeaderName| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header_value(header::CONTENT_TYPE);
    let json = content_type
        .as_deref()
        .filter(|ct| ct.starts_with("application/json"))
        .and_then(|_| serde_json::from_slice(&bytes).ok());

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type,
        json,
    };

    let (latency, held, injected) = {
        let mut backend = state.lock();
        let injected = backend.take_injected(&recorded.method, &recorded.path);
        let held = backend.take_held(&recorded.method, &recorded.path);
        backend.requests.push(recorded);
        (backend.latency, held, injected)
    };

    if let Some(latency) = latency {
        tokio::time::sleep(latency).await;
    }
    if let Some(injected) = injected {
        let status = StatusCode::from_u16(injected.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(injected.body)).into_response();
    }

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;
    if let Some(held) = held {
        tokio::time::sleep(held).await;
    }
    response
}

/// Requires `Authorization: Bearer <current token>`.
struct Authorized;

impl FromRequestParts<MockState> for Authorized {
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request_parts(parts: &mut Parts, state: &MockState) -> Result<Self, Self::Rejection> {
        let expected = format!("Bearer {}", state.lock().token);
        let given = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if given == Some(expected.as_str()) {
            Ok(Self)
        } else {
            Err(fail(StatusCode::UNAUTHORIZED, "Invalid or expired token"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
    day: Option<String>,
    filter: Option<String>,
    status: Option<String>,
}

fn paginate(items: &[Value], collection: &str, params: &ListParams) -> Value {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(10).max(1);
    let total = items.len();
    let start = ((page - 1) * limit) as usize;
    let slice: Vec<Value> = items.iter().skip(start).take(limit as usize).cloned().collect();
    json!({
        collection: slice,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "pages": total.div_ceil(limit as usize),
        }
    })
}

fn find<'a>(items: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    items.iter_mut().find(|item| item["_id"] == id)
}

fn remove(items: &mut Vec<Value>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item["_id"] != id);
    items.len() != before
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(state): State<MockState>, Json(body): Json<Value>) -> ApiResult {
    let backend = state.lock();
    if body["email"] == ADMIN_EMAIL && body["password"] == backend.password.as_str() {
        ok(json!({
            "token": backend.token,
            "user": { "_id": "admin-1", "name": ADMIN_NAME }
        }))
    } else {
        Err(fail(StatusCode::UNAUTHORIZED, "Invalid credentials"))
    }
}

async fn forgot_password(Json(body): Json<Value>) -> ApiResult {
    if body["email"] == ADMIN_EMAIL {
        ok(json!({ "success": true, "message": "OTP sent" }))
    } else {
        Err(fail(StatusCode::NOT_FOUND, "Email not found"))
    }
}

async fn reset_password(State(state): State<MockState>, Json(body): Json<Value>) -> ApiResult {
    if body["email"] != ADMIN_EMAIL || body["otp"] != VALID_OTP {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid or expired OTP"));
    }
    let Some(password) = body["newPassword"].as_str() else {
        return Err(fail(StatusCode::BAD_REQUEST, "newPassword is required"));
    };
    state.lock().password = password.to_string();
    ok(json!({ "success": true, "message": "Password reset" }))
}

// =============================================================================
// Dashboard
// =============================================================================

async fn dashboard(_: Authorized, State(state): State<MockState>) -> ApiResult {
    let backend = state.lock();
    ok(json!({
        "totalRevenue": "1234.50",
        "totalUsers": backend.users.len(),
        "todaysOrders": backend.orders.len(),
    }))
}

// =============================================================================
// Locations
// =============================================================================

async fn list_locations(
    _: Authorized,
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
) -> ApiResult {
    ok(paginate(&state.lock().locations, "locations", &params))
}

async fn create_location(_: Authorized, State(state): State<MockState>, Json(body): Json<Value>) -> ApiResult {
    let (Some(name), Some(address)) = (body["name"].as_str(), body["address"].as_str()) else {
        return Err(fail(StatusCode::BAD_REQUEST, "Name and address are required"));
    };
    let location = state.lock().add_location(name, address, true);
    created(json!({ "message": "Location created", "location": location }))
}

async fn update_location(
    _: Authorized,
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let mut backend = state.lock();
    let location = find(&mut backend.locations, &id).ok_or_else(|| fail(StatusCode::NOT_FOUND, "Location not found"))?;
    for key in ["name", "address", "isActive"] {
        if let Some(value) = body.get(key) {
            location[key] = value.clone();
        }
    }
    ok(location.clone())
}

async fn delete_location(_: Authorized, State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    if remove(&mut state.lock().locations, &id) {
        ok(json!({ "success": true, "message": "Location deleted" }))
    } else {
        Err(fail(StatusCode::NOT_FOUND, "Location not found"))
    }
}

// =============================================================================
// Meals
// =============================================================================

/// Text fields and uploaded file names of a multipart body.
async fn read_multipart(mut multipart: Multipart) -> Result<(HashMap<String, String>, Vec<(String, String)>), (StatusCode, Json<Value>)> {
    let mut fields = HashMap::new();
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field
                    .bytes()
                    .await
                    .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
                files.push((name, file_name));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| fail(StatusCode::BAD_REQUEST, &e.to_string()))?;
                fields.insert(name, text);
            }
        }
    }
    Ok((fields, files))
}

fn image_urls(files: &[(String, String)], field: &str) -> Vec<Value> {
    files
        .iter()
        .filter(|(name, _)| name == field)
        .map(|(_, file)| json!(format!("https://cdn.lunch.example/{file}")))
        .collect()
}

async fn list_meals(_: Authorized, State(state): State<MockState>, Query(params): Query<ListParams>) -> ApiResult {
    let backend = state.lock();
    let meals: Vec<Value> = backend
        .meals
        .iter()
        .filter(|meal| params.day.as_deref().is_none_or(|day| meal["availableDay"] == day))
        .cloned()
        .collect();
    ok(paginate(&meals, "meals", &params))
}

async fn create_meal(_: Authorized, State(state): State<MockState>, multipart: Multipart) -> ApiResult {
    let (fields, files) = read_multipart(multipart).await?;
    let (Some(description), Some(price), Some(day)) = (
        fields.get("description"),
        fields.get("price").and_then(|p| p.parse::<f64>().ok()),
        fields.get("availableDay"),
    ) else {
        return Err(fail(StatusCode::BAD_REQUEST, "description, price and availableDay are required"));
    };
    let mut backend = state.lock();
    let mut meal = backend.add_meal(day, description, price);
    if let Some(main) = image_urls(&files, "mainImage").pop() {
        meal["mainImage"] = main;
    }
    meal["otherImages"] = Value::Array(image_urls(&files, "otherImages"));
    if let Some(stored) = find(&mut backend.meals, meal["_id"].as_str().unwrap_or_default()) {
        *stored = meal.clone();
    }
    created(json!({ "meal": meal }))
}

async fn update_meal(
    _: Authorized,
    State(state): State<MockState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> ApiResult {
    let (fields, files) = read_multipart(multipart).await?;
    let mut backend = state.lock();
    let meal = find(&mut backend.meals, &id).ok_or_else(|| fail(StatusCode::NOT_FOUND, "Meal not found"))?;
    if let Some(description) = fields.get("description") {
        meal["description"] = json!(description);
    }
    if let Some(price) = fields.get("price").and_then(|p| p.parse::<f64>().ok()) {
        meal["price"] = json!(price);
    }
    if let Some(day) = fields.get("availableDay") {
        meal["availableDay"] = json!(day);
    }
    if let Some(main) = image_urls(&files, "mainImage").pop() {
        meal["mainImage"] = main;
    }
    ok(json!({ "data": meal.clone() }))
}

async fn delete_meal(_: Authorized, State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    if remove(&mut state.lock().meals, &id) {
        ok(json!({ "message": "Meal deleted" }))
    } else {
        Err(fail(StatusCode::NOT_FOUND, "Meal not found"))
    }
}

// =============================================================================
// Users and orders
// =============================================================================

async fn list_users(_: Authorized, State(state): State<MockState>, Query(params): Query<ListParams>) -> ApiResult {
    ok(paginate(&state.lock().users, "users", &params))
}

async fn get_user(_: Authorized, State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    let mut backend = state.lock();
    let user = find(&mut backend.users, &id).ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    ok(json!({ "user": user.clone() }))
}

async fn delete_user(_: Authorized, State(state): State<MockState>, Path(id): Path<String>) -> ApiResult {
    if remove(&mut state.lock().users, &id) {
        ok(json!({ "message": "User deleted" }))
    } else {
        Err(fail(StatusCode::NOT_FOUND, "User not found"))
    }
}

async fn list_orders(_: Authorized, State(state): State<MockState>, Query(params): Query<ListParams>) -> ApiResult {
    let backend = state.lock();
    let orders: Vec<Value> = backend
        .orders
        .iter()
        .filter(|order| params.status.as_deref().is_none_or(|s| order["status"] == s))
        .filter(|order| {
            params.filter.as_deref().is_none_or(|f| {
                order["customerName"]
                    .as_str()
                    .is_some_and(|name| name.to_lowercase().contains(&f.to_lowercase()))
            })
        })
        .cloned()
        .collect();
    ok(paginate(&orders, "orders", &params))
}

async fn update_order_status(
    _: Authorized,
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult {
    let mut backend = state.lock();
    let order = find(&mut backend.orders, &id).ok_or_else(|| fail(StatusCode::NOT_FOUND, "Order not found"))?;
    order["status"] = body["status"].clone();
    ok(json!({ "order": order.clone() }))
}

// =============================================================================
// Profile
// =============================================================================

async fn update_profile(_: Authorized, State(state): State<MockState>, multipart: Multipart) -> ApiResult {
    let (fields, files) = read_multipart(multipart).await?;
    let mut backend = state.lock();
    let mut profile = json!({});
    for (key, value) in fields {
        profile[key] = json!(value);
    }
    if let Some(image) = image_urls(&files, "profileImage").pop() {
        profile["profileImage"] = image;
    }
    backend.profile = profile.clone();
    ok(json!({ "profile": profile, "updatedAt": CREATED_AT }))
}

async fn change_password(_: Authorized, State(state): State<MockState>, Json(body): Json<Value>) -> ApiResult {
    let mut backend = state.lock();
    if body["currentPassword"] != backend.password.as_str() {
        return Err(fail(StatusCode::BAD_REQUEST, "Current password is incorrect"));
    }
    let Some(password) = body["newPassword"].as_str() else {
        return Err(fail(StatusCode::BAD_REQUEST, "newPassword is required"));
    };
    backend.password = password.to_string();
    ok(json!({ "success": true, "message": "Password changed" }))
}
