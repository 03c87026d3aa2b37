//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::{extract::Path as UrlPath, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use watchtower::detector::Kind;
use watchtower::observability::metrics::MetricsSink;
use watchtower::platform::{Platform, PlatformError, PlatformResult};

pub const BASIC_CONFIG: &str = r#"---
apps:
  enabled: true
  resources:
    - name: my-cool-app
    - name: another-app
      optional: true
    - name: third-app
      routes:
        - third-app-host.app.cloudfoundry
        - third-app-second-route.app.second.domain
spaces:
  enabled: true
  resources:
    - name: dev
      allow_ssh: true
    - name: test
      allow_ssh: true
    - name: prod
      allow_ssh: false
"#;

pub fn names(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Write `contents` to `config.yaml` inside `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.yaml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[derive(Default)]
struct Inventory {
    apps: HashSet<String>,
    spaces: HashSet<(String, bool)>,
    routes: HashSet<String>,
    failing: HashSet<Kind>,
    calls: HashMap<Kind, usize>,
}

/// In-memory platform whose inventories and failures are set by the test.
#[derive(Default)]
pub struct FakePlatform {
    inner: Mutex<Inventory>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform that matches `BASIC_CONFIG` exactly.
    pub fn compliant() -> Self {
        let platform = Self::new();
        platform.set_apps(&["my-cool-app", "another-app", "third-app"]);
        platform.set_spaces(&[("dev", true), ("test", true), ("prod", false)]);
        platform.set_routes(&[
            "third-app-host.app.cloudfoundry",
            "third-app-second-route.app.second.domain",
        ]);
        platform
    }

    pub fn set_apps(&self, apps: &[&str]) {
        self.inner.lock().unwrap().apps = names(apps);
    }

    pub fn set_routes(&self, routes: &[&str]) {
        self.inner.lock().unwrap().routes = names(routes);
    }

    pub fn set_spaces(&self, spaces: &[(&str, bool)]) {
        self.inner.lock().unwrap().spaces =
            spaces.iter().map(|(n, ssh)| (n.to_string(), *ssh)).collect();
    }

    pub fn set_failing(&self, kind: Kind, failing: bool) {
        let mut inner = self.inner.lock().unwrap();
        if failing {
            inner.failing.insert(kind);
        } else {
            inner.failing.remove(&kind);
        }
    }

    pub fn calls(&self, kind: Kind) -> usize {
        self.inner.lock().unwrap().calls.get(&kind).copied().unwrap_or(0)
    }

    fn begin(&self, kind: Kind) -> PlatformResult<std::sync::MutexGuard<'_, Inventory>> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(kind).or_default() += 1;
        if inner.failing.contains(&kind) {
            return Err(PlatformError::Status {
                status: 503,
                url: format!("fake://{}", kind),
            });
        }
        Ok(inner)
    }
}

#[async_trait]
impl Platform for FakePlatform {
    async fn list_apps(&self) -> PlatformResult<HashSet<String>> {
        Ok(self.begin(Kind::Apps)?.apps.clone())
    }

    async fn list_spaces(&self) -> PlatformResult<HashSet<(String, bool)>> {
        Ok(self.begin(Kind::Spaces)?.spaces.clone())
    }

    async fn list_routes(&self) -> PlatformResult<HashSet<String>> {
        Ok(self.begin(Kind::Routes)?.routes.clone())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SinkState {
    pub successes: HashMap<Kind, u64>,
    pub failures: HashMap<Kind, u64>,
    pub unknown: HashMap<Kind, usize>,
    pub missing: HashMap<Kind, usize>,
    pub ssh_violations: Option<usize>,
    pub config_failures: u64,
}

impl SinkState {
    pub fn successes(&self, kind: Kind) -> u64 {
        self.successes.get(&kind).copied().unwrap_or(0)
    }

    pub fn failures(&self, kind: Kind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }

    /// `(unknown, missing)` gauges, if ever set.
    pub fn drift(&self, kind: Kind) -> Option<(usize, usize)> {
        Some((*self.unknown.get(&kind)?, *self.missing.get(&kind)?))
    }
}

/// Metrics sink that records values instead of exporting them.
#[derive(Default)]
pub struct RecordingSink {
    state: Mutex<SinkState>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SinkState {
        self.state.lock().unwrap().clone()
    }
}

impl MetricsSink for RecordingSink {
    fn record_check(&self, kind: Kind, success: bool) {
        let mut state = self.state.lock().unwrap();
        let counters = if success { &mut state.successes } else { &mut state.failures };
        *counters.entry(kind).or_default() += 1;
    }

    fn set_drift(&self, kind: Kind, unknown: usize, missing: usize) {
        let mut state = self.state.lock().unwrap();
        state.unknown.insert(kind, unknown);
        state.missing.insert(kind, missing);
    }

    fn set_ssh_violations(&self, count: usize) {
        self.state.lock().unwrap().ssh_violations = Some(count);
    }

    fn record_config_failure(&self) {
        self.state.lock().unwrap().config_failures += 1;
    }
}

fn page(resources: Vec<Value>, next: Option<String>) -> Json<Value> {
    Json(json!({
        "pagination": {
            "total_results": resources.len(),
            "next": next.map(|href| json!({ "href": href })),
        },
        "resources": resources,
    }))
}

/// Start a fake Cloud Foundry v3 API on an ephemeral port.
///
/// Apps are split over two pages; the token endpoint is advertised at `/uaa`
/// and requests to `/v3` must carry the token it issues. Two spaces share the
/// name `prod` (one per org) with different SSH settings.
pub async fn start_fake_cf_api() -> SocketAddr {
    start_fake_cf_api_with_token_expiry(3600).await
}

/// Same as [`start_fake_cf_api`], issuing tokens that expire after
/// `expires_in` seconds.
pub async fn start_fake_cf_api_with_token_expiry(expires_in: u64) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base = format!("http://{}", addr);

    let root_base = base.clone();
    let apps_base = base.clone();

    let app = Router::new()
        .route(
            "/",
            get(move || {
                let base = root_base.clone();
                async move {
                    Json(json!({
                        "links": {
                            "self": { "href": base },
                            "uaa": { "href": format!("{}/uaa", base) },
                        }
                    }))
                }
            }),
        )
        .route(
            "/uaa/oauth/token",
            axum::routing::post(move || async move {
                Json(json!({ "access_token": "fake-token", "token_type": "bearer", "expires_in": expires_in }))
            }),
        )
        .route(
            "/v3/apps",
            get(move |headers: axum::http::HeaderMap, query: axum::extract::Query<HashMap<String, String>>| {
                let base = apps_base.clone();
                async move {
                    if !authorized(&headers) {
                        return Err(StatusCode::UNAUTHORIZED);
                    }
                    if query.get("page").map(String::as_str) == Some("2") {
                        Ok(page(vec![json!({ "guid": "g3", "name": "third-app" })], None))
                    } else {
                        Ok(page(
                            vec![
                                json!({ "guid": "g1", "name": "my-cool-app" }),
                                json!({ "guid": "g2", "name": "rogue-app" }),
                            ],
                            Some(format!("{}/v3/apps?page=2&per_page=2", base)),
                        ))
                    }
                }
            }),
        )
        .route(
            "/v3/spaces",
            get(|headers: axum::http::HeaderMap| async move {
                if !authorized(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(page(
                    vec![
                        json!({ "guid": "s-dev", "name": "dev" }),
                        json!({ "guid": "s-prod", "name": "prod" }),
                        json!({ "guid": "s-prod-b", "name": "prod" }),
                    ],
                    None,
                ))
            }),
        )
        .route(
            "/v3/spaces/{guid}/features/ssh",
            get(|headers: axum::http::HeaderMap, UrlPath(guid): UrlPath<String>| async move {
                if !authorized(&headers) {
                    return Err(StatusCode::UNAUTHORIZED);
                }
                Ok(Json(json!({
                    "name": "ssh",
                    "description": "Enable SSHing into apps in the space.",
                    "enabled": guid == "s-prod",
                })))
            }),
        )
        .route("/v3/routes", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn authorized(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer fake-token")
}
