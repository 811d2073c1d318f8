#![allow(dead_code)]

use std::collections::HashMap;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tower::ServiceExt;

use person_directory::database::{MemoryPersonRepository, Person, PersonRepository};
use person_directory::{app, AppState, BasicAuthGate};

pub const USER: &str = "root";
pub const PASSWORD: &str = "test-password";

/// Low-cost hash so the tests stay fast.
pub fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| bcrypt::hash(PASSWORD, 4).expect("hash test password"))
}

pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", user, password)))
}

pub fn valid_auth() -> String {
    basic_auth(USER, PASSWORD)
}

/// Router over a fresh memory store, plus a handle on that store.
pub fn test_app() -> (Router, Arc<MemoryPersonRepository>) {
    let repo = Arc::new(MemoryPersonRepository::new());
    let gate = BasicAuthGate::new(HashMap::from([(USER.to_string(), password_hash().to_string())]));
    let router = app(AppState::new(repo.clone()), gate);
    (router, repo)
}

pub async fn seed_person(repo: &MemoryPersonRepository, person: Person) -> i64 {
    repo.create(&person).await.expect("seed person")
}

pub struct TestRequest {
    method: Method,
    uri: String,
    auth: Option<String>,
    body: Option<String>,
}

impl TestRequest {
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self { method, uri: uri.into(), auth: None, body: None }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn authorized(mut self) -> Self {
        self.auth = Some(valid_auth());
        self
    }

    pub fn auth(mut self, value: impl Into<String>) -> Self {
        self.auth = Some(value.into());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Send through the router and decode the JSON body (`Null` when empty).
    pub async fn send(self, router: &Router) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(auth) = self.auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = match self.body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body)
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is JSON")
        };
        (status, value)
    }
}

/// The compiled binary running on a free port; killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    pub fn spawn(seed_file: Option<&std::path::Path>) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_person-directory"));
        cmd.args(["serve", "--bind", "127.0.0.1", "--port", &port.to_string()])
            // Empty URL selects the memory store and keeps a .env from overriding it
            .env("DATABASE_URL", "")
            .env("BASIC_AUTH_USERS", format!("{}:{}", USER, password_hash()))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        match seed_file {
            Some(path) => cmd.env("SEED_FILE", path).env("SEED_RESET", "true"),
            None => cmd.env("SEED_FILE", ""),
        };

        let child = cmd.spawn().context("failed to spawn server binary")?;
        Ok(Self { port, base_url, child })
    }

    pub async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
