//! Test support: an in-process stub of the commerce API.
//!
//! The stub speaks the same `{ message, code, metadata }` envelope as the
//! real API, records the credential headers of every request, and binds an
//! ephemeral port so tests run hermetically and in parallel.
//!
//! Stub credentials: any email with password `letmein` signs in.

#![cfg_attr(not(test), forbid(unsafe_code))]
// Test support favors loud failures over error plumbing.
#![allow(clippy::expect_used)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use green_papaya_storefront::config::StorefrontConfig;

/// The password the stub accepts for every account.
pub const STUB_PASSWORD: &str = "letmein";

/// The access token the stub issues.
pub const STUB_ACCESS_TOKEN: &str = "stub-access-token";

/// The refresh token the stub issues.
pub const STUB_REFRESH_TOKEN: &str = "stub-refresh-token";

/// The customer ID the stub issues.
pub const STUB_CUSTOMER_ID: &str = "66a0b1c2d3e4";

/// Credential headers observed on one request.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    /// Request path (without the API prefix).
    pub path: String,
    /// The `authorization` header, if present.
    pub authorization: Option<String>,
    /// The `x-client-id` header, if present.
    pub client_id: Option<String>,
}

/// Stub behavior knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubOptions {
    /// When true, `POST /logout` answers 500.
    pub logout_fails: bool,
}

#[derive(Clone)]
struct StubState {
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    options: StubOptions,
}

impl StubState {
    fn record(&self, path: &str, headers: &HeaderMap) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };

        self.seen
            .lock()
            .expect("seen-request lock")
            .push(SeenRequest {
                path: path.to_owned(),
                authorization: header("authorization"),
                client_id: header("x-client-id"),
            });
    }
}

/// A running stub commerce API.
pub struct StubApi {
    /// Base URL of the stub, including the `/v1/api` prefix.
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl StubApi {
    /// Spawn a stub with default behavior.
    pub async fn spawn() -> Self {
        Self::spawn_with(StubOptions::default()).await
    }

    /// Spawn a stub with the given behavior.
    pub async fn spawn_with(options: StubOptions) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            seen: Arc::clone(&seen),
            options,
        };

        let api = Router::new()
            .route("/login", post(login))
            .route("/signup", post(signup))
            .route("/logout", post(logout))
            .route("/products/published", get(published))
            .route("/products/search/{category}", get(search))
            .route("/products/{id}", get(product))
            .with_state(state);
        let app = Router::new().nest("/v1/api", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{addr}/v1/api"),
            seen,
        }
    }

    /// Build a `StorefrontConfig` pointing at this stub.
    ///
    /// Constructed directly rather than via env vars so parallel tests don't
    /// race on the process environment.
    #[must_use]
    pub fn config(&self, state_dir: &Path) -> StorefrontConfig {
        let base = format!("{}/", self.base_url);
        StorefrontConfig {
            api_base_url: url::Url::parse(&base).expect("stub base url"),
            state_dir: state_dir.to_path_buf(),
            http_timeout: Duration::from_secs(5),
        }
    }

    /// Requests observed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().expect("seen-request lock").clone()
    }

    /// Requests observed for one path.
    #[must_use]
    pub fn requests_for(&self, path: &str) -> Vec<SeenRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn envelope(code: i64, message: &str, metadata: Value) -> Json<Value> {
    Json(json!({ "message": message, "code": code, "metadata": metadata }))
}

fn auth_metadata(name: &str, email: &str) -> Value {
    json!({
        "shop": {
            "_id": STUB_CUSTOMER_ID,
            "name": name,
            "email": email,
            "roles": ["SHOP"]
        },
        "tokens": {
            "accessToken": STUB_ACCESS_TOKEN,
            "refreshToken": STUB_REFRESH_TOKEN
        }
    })
}

async fn login(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/login", &headers);

    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if body["password"].as_str() == Some(STUB_PASSWORD) {
        envelope(200, "login success", auth_metadata("Stub Owner", &email)).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            envelope(401, "invalid credentials", Value::Null),
        )
            .into_response()
    }
}

async fn signup(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("/signup", &headers);

    let name = body["name"].as_str().unwrap_or_default().to_owned();
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            envelope(400, "email is required", Value::Null),
        )
            .into_response();
    }

    (
        StatusCode::CREATED,
        envelope(201, "shop created", auth_metadata(&name, &email)),
    )
        .into_response()
}

async fn logout(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("/logout", &headers);

    if state.options.logout_fails {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            envelope(500, "logout failed", Value::Null),
        )
            .into_response()
    } else {
        envelope(200, "logout success", Value::Null).into_response()
    }
}

/// Fixture catalog served by the product endpoints.
#[must_use]
pub fn sample_products() -> Vec<Value> {
    vec![
        json!({
            "_id": "p-phone",
            "product_name": "Aster Phone 12",
            "product_thumb": "https://cdn.example.com/phone.jpg",
            "product_description": "A phone.",
            "product_price": 129_900,
            "product_quantity": 12,
            "product_type": "Electronics",
            "product_shop": { "name": "Green Papaya", "email": "shop@example.com" },
            "product_attributes": { "manufacturer": "Aster", "model": "12", "color": "black" },
            "product_colors": ["black", "white"],
            "isDraft": false,
            "isPublished": true,
            "createdAt": "2025-11-02T09:30:00.000Z",
            "updatedAt": "2025-11-02T09:30:00.000Z"
        }),
        json!({
            "_id": "p-shirt",
            "product_name": "Papaya Tee",
            "product_thumb": "https://cdn.example.com/tee.jpg",
            "product_description": "A shirt.",
            "product_price": 1999,
            "product_quantity": 0,
            "product_type": "Clothing",
            "product_shop": { "name": "Green Papaya", "email": "shop@example.com" },
            "product_colors": ["green"],
            "product_sizes": ["s", "m", "l"],
            "isDraft": false,
            "isPublished": true
        }),
    ]
}

async fn published(State(state): State<StubState>, headers: HeaderMap) -> Response {
    state.record("/products/published", &headers);
    envelope(200, "ok", Value::Array(sample_products())).into_response()
}

async fn product(
    State(state): State<StubState>,
    UrlPath(id): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/products/{id}"), &headers);

    // Single-object metadata: exercises the single-or-array normalization.
    match sample_products().into_iter().find(|p| p["_id"] == json!(id)) {
        Some(found) => envelope(200, "ok", found).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            envelope(404, "product not found", Value::Null),
        )
            .into_response(),
    }
}

async fn search(
    State(state): State<StubState>,
    UrlPath(category): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    state.record(&format!("/products/search/{category}"), &headers);

    let matches: Vec<Value> = sample_products()
        .into_iter()
        .filter(|p| p["product_type"] == json!(category))
        .collect();
    envelope(200, "ok", Value::Array(matches)).into_response()
}
