#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use storefront_api::{
    middleware::auth::{SESSION_COOKIE, SessionKeys},
    models::{NewUser, Product},
    routes::create_app,
    state::AppState,
    store::{MemoryStore, StorefrontStore},
};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub sessions: SessionKeys,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Catalog product whose age in minutes orders it in listings.
pub fn product(id: &str, name: &str, description: &str, cents: i64, minutes_old: i64) -> Product {
    let epoch = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::new(cents, 2),
        image_url: format!("https://via.placeholder.com/300?text={id}"),
        created_at: epoch - Duration::minutes(minutes_old),
    }
}

pub fn default_catalog() -> Vec<Product> {
    vec![
        product(
            "p1",
            "Wireless Headphones",
            "Premium noise-cancelling wireless headphones.",
            1999,
            0,
        ),
        product(
            "p2",
            "Smartphone",
            "Latest model with high-resolution camera.",
            500,
            1,
        ),
        product(
            "p3",
            "Laptop",
            "Powerful laptop for professionals.",
            129999,
            2,
        ),
    ]
}

pub fn spawn_app(catalog: Vec<Product>) -> TestApp {
    let store = Arc::new(MemoryStore::with_catalog(catalog));
    let sessions = SessionKeys::new("test-secret");
    let state = AppState::new(store.clone(), sessions.clone());
    TestApp {
        app: create_app(state),
        store,
        sessions,
    }
}

impl TestApp {
    /// Mirror a fresh user into the store and return a session for them.
    pub async fn signed_in(&self) -> String {
        let user = self
            .store
            .upsert_user(NewUser {
                email: format!("{}@example.com", Uuid::new_v4()),
                name: None,
                image: None,
            })
            .await
            .expect("mirror user");
        self.session_for(user.id)
    }

    pub fn session_for(&self, user_id: Uuid) -> String {
        self.sessions
            .issue(user_id, None, Duration::hours(1))
            .expect("issue session")
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a JSON request carrying `session` as the session cookie.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        session: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = session {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");
        self.send(request).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.call(Method::GET, uri, None, None).await
    }
}
