//! Cloud Foundry v3 API client with timeout and token handling.
//!
//! # Responsibilities
//! - List applications, spaces (with SSH feature flag) and routes
//! - Follow v3 pagination until the last page
//! - Obtain and cache a bearer token via client credentials
//! - Map transport, status and decode failures to `PlatformError`

use std::collections::HashSet;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use url::Url;

use crate::config::PlatformSettings;
use crate::platform::types::{
    AppResource, Page, RootInfo, RouteResource, SpaceFeature, SpaceResource, TokenResponse,
};
use crate::platform::{Platform, PlatformError, PlatformResult};

const PAGE_SIZE: u32 = 5000;

/// Refresh tokens this long before they actually expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Upper bound on how long an issued token is cached.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Read-only client for the platform API.
pub struct CloudFoundryClient {
    http: reqwest::Client,
    base_url: Url,
    settings: PlatformSettings,
    token: Mutex<Option<CachedToken>>,
}

impl CloudFoundryClient {
    /// Create a new client.
    ///
    /// No request is made here; credentials are exercised on first use.
    pub fn new(settings: PlatformSettings) -> PlatformResult<Self> {
        let base_url: Url = settings.api_url.parse().map_err(|e| {
            PlatformError::Http(format!("Invalid API URL '{}': {}", settings.api_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .user_agent(concat!("watchtower/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PlatformError::Http(e.to_string()))?;

        tracing::info!(
            api_url = %base_url,
            timeout_secs = settings.timeout_secs,
            static_token = settings.access_token.is_some(),
            "Platform client initialized"
        );

        Ok(Self {
            http,
            base_url,
            settings,
            token: Mutex::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> PlatformResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| PlatformError::Http(format!("Invalid path '{}': {}", path, e)))
    }

    fn map_transport(&self, e: reqwest::Error) -> PlatformError {
        if e.is_timeout() {
            PlatformError::Timeout(self.settings.timeout_secs)
        } else if e.is_decode() {
            PlatformError::Decode(e.to_string())
        } else {
            PlatformError::Http(e.to_string())
        }
    }

    /// Current bearer token, if credentials are configured.
    async fn bearer(&self) -> PlatformResult<Option<String>> {
        if let Some(token) = &self.settings.access_token {
            return Ok(Some(token.clone()));
        }

        let (client_id, client_secret) =
            match (&self.settings.client_id, &self.settings.client_secret) {
                (Some(id), Some(secret)) => (id, secret),
                _ => return Ok(None),
            };

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_EXPIRY_MARGIN < token.expires_at {
                return Ok(Some(token.value.clone()));
            }
        }

        let token = self.fetch_token(client_id, client_secret).await?;
        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + token_lifetime(token.expires_in),
        });
        tracing::debug!(expires_in = token.expires_in, "Obtained platform access token");
        Ok(Some(value))
    }

    async fn fetch_token(&self, client_id: &str, client_secret: &str) -> PlatformResult<TokenResponse> {
        let root: RootInfo = self.send_json(self.base_url.clone(), None).await?;
        let auth_base = root
            .links
            .uaa
            .or(root.links.login)
            .ok_or_else(|| PlatformError::Auth("API does not advertise a token endpoint".into()))?;

        let token_url = format!("{}/oauth/token", auth_base.href.trim_end_matches('/'));
        let response = self
            .http
            .post(&token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        if !response.status().is_success() {
            return Err(PlatformError::Auth(format!(
                "token endpoint {} returned {}",
                token_url,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PlatformError::Auth(format!("invalid token response: {}", e)))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        url: Url,
        bearer: Option<&str>,
    ) -> PlatformResult<T> {
        let mut request = self.http.get(url.clone());
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlatformError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json().await.map_err(|e| self.map_transport(e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> PlatformResult<T> {
        let bearer = self.bearer().await?;
        self.send_json(url, bearer.as_deref()).await
    }

    /// Fetch every page of a v3 list endpoint.
    async fn list_all<T: DeserializeOwned>(&self, path: &str) -> PlatformResult<Vec<T>> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string());

        let mut resources = Vec::new();
        let mut pages = 0usize;
        loop {
            let page: Page<T> = self.get_json(url).await?;
            pages += 1;
            resources.extend(page.resources);

            match page.pagination.next {
                Some(next) => {
                    url = next
                        .href
                        .parse()
                        .map_err(|e| PlatformError::Decode(format!("bad next link: {}", e)))?;
                }
                None => break,
            }
        }

        tracing::debug!(path, pages, count = resources.len(), "Listed platform resources");
        Ok(resources)
    }
}

/// Cache lifetime for a token issued with `expires_in` seconds.
fn token_lifetime(expires_in: u64) -> Duration {
    Duration::from_secs(expires_in).min(MAX_TOKEN_LIFETIME)
}

#[async_trait]
impl Platform for CloudFoundryClient {
    async fn list_apps(&self) -> PlatformResult<HashSet<String>> {
        let apps: Vec<AppResource> = self.list_all("/v3/apps").await?;
        Ok(apps.into_iter().map(|a| a.name).collect())
    }

    async fn list_spaces(&self) -> PlatformResult<HashSet<(String, bool)>> {
        let spaces: Vec<SpaceResource> = self.list_all("/v3/spaces").await?;

        let mut result = HashSet::with_capacity(spaces.len());
        for space in spaces {
            let url = self.endpoint(&format!("/v3/spaces/{}/features/ssh", space.guid))?;
            let feature: SpaceFeature = self.get_json(url).await?;
            result.insert((space.name, feature.enabled));
        }
        Ok(result)
    }

    async fn list_routes(&self) -> PlatformResult<HashSet<String>> {
        let routes: Vec<RouteResource> = self.list_all("/v3/routes").await?;
        Ok(routes.into_iter().map(|r| r.url).collect())
    }
}
