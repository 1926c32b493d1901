//! Shared harness: spawns the full application on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use petrealm::app_state::AppState;
use petrealm::build_app;
use petrealm::config::GameConfig;
use petrealm::domain::{EventBus, GameStore, ManualClock};
use serde_json::{Value, json};

/// A running server plus the clock that drives it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub clock: Arc<ManualClock>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let start = DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_000) + Duration::hours(12);
        let clock = Arc::new(ManualClock::new(start));
        let config = GameConfig::default();
        let state = AppState::new(
            &config,
            Arc::new(GameStore::new()),
            Arc::clone(&clock) as Arc<dyn petrealm::domain::Clock>,
            EventBus::new(256),
        );
        let app = build_app(state, &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server crashed");
        });

        Self {
            addr,
            clock,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Registers a user and returns `(token, body)`.
    pub async fn register(&self, username: &str) -> (String, Value) {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": "secret1",
            }))
            .send()
            .await
            .expect("register request");
        assert_eq!(resp.status().as_u16(), 201);
        let body: Value = resp.json().await.expect("register body");
        let token = body["token"].as_str().expect("token").to_string();
        (token, body)
    }

    pub async fn get(&self, path: &str, token: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: &str,
        body: Value,
    ) -> (u16, Value) {
        let resp = self
            .client
            .request(method, self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("request");
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap_or(Value::Null))
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, token, body).await
    }
}
