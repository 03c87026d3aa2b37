//! Cloud Foundry v3 wire types.
//!
//! Only the fields the detector needs are modelled; everything else in the
//! API responses is ignored.

use serde::Deserialize;

/// A page of a v3 list endpoint.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    pub pagination: Pagination,
    pub resources: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub next: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct AppResource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SpaceResource {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteResource {
    /// `host.domain` plus the path, when the route has one.
    pub url: String,
}

/// Body of `GET /v3/spaces/{guid}/features/ssh`.
#[derive(Debug, Deserialize)]
pub struct SpaceFeature {
    pub enabled: bool,
}

/// Body of `GET /` on the API, used to discover the token endpoint.
#[derive(Debug, Deserialize)]
pub struct RootInfo {
    pub links: RootLinks,
}

#[derive(Debug, Deserialize)]
pub struct RootLinks {
    pub uaa: Option<Link>,
    pub login: Option<Link>,
}

/// OAuth2 token endpoint response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_decodes_with_and_without_next() {
        let json = r#"{
            "pagination": {"total_results": 2, "next": {"href": "https://api/v3/apps?page=2"}},
            "resources": [{"guid": "a", "name": "my-cool-app", "state": "STARTED"}]
        }"#;
        let page: Page<AppResource> = serde_json::from_str(json).unwrap();
        assert_eq!(page.resources[0].name, "my-cool-app");
        assert_eq!(page.pagination.next.unwrap().href, "https://api/v3/apps?page=2");

        let last: Page<AppResource> =
            serde_json::from_str(r#"{"pagination": {"next": null}, "resources": []}"#).unwrap();
        assert!(last.pagination.next.is_none());
    }

    #[test]
    fn test_token_expiry_default() {
        let token: TokenResponse = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        assert_eq!(token.expires_in, 600);
    }
}
