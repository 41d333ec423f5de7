// Async HTTP client for the `/api/<resource>` REST surface.
//
// Wraps `reqwest::Client` with base-URL joining, bearer-token injection,
// null stripping on write bodies, pagination header parsing, and
// problem-document error decoding. Resource-specific knowledge (paths,
// record shapes) lives in `credmgr-core`; this layer only moves JSON.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::body::strip_nulls;
use crate::error::Error;
use crate::pagination::{self, PageLinks};
use crate::query::ListQuery;
use crate::transport::TransportConfig;

const MERGE_PATCH: &str = "application/merge-patch+json";

// ── Error response shape ─────────────────────────────────────────────

/// RFC 7807 problem document as emitted by the server.
#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_key: Option<String>,
}

// ── Listing ──────────────────────────────────────────────────────────

/// One page of a list or search response plus its header metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// From `x-total-count`; falls back to `items.len()` when absent.
    pub total_count: u64,
    pub links: PageLinks,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the REST API.
///
/// All paths are relative to `<base>/api/`. A bearer token, once set,
/// is attached to every request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a server root URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, Self::normalize_base_url(base_url)?))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self::with_client(http, Self::normalize_base_url(base_url)?))
    }

    fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Ensure the base path ends in `/api/` so relative joins land under it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    /// The API root (always ends with `/api/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    /// Attach a bearer token to all subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        debug!("storing bearer token");
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret())),
            None => builder,
        }
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"credentials/5"`) onto the API root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Resource verbs ───────────────────────────────────────────────

    /// `GET /api/<resource>` with paging, sort, eagerload and a cache buster.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &ListQuery,
    ) -> Result<Listing<T>, Error> {
        self.get_listing(resource, &query.list_params()).await
    }

    /// `GET /api/_search/<resource>?query=...`.
    pub async fn search<T: DeserializeOwned>(
        &self,
        resource: &str,
        text: &str,
        query: &ListQuery,
    ) -> Result<Listing<T>, Error> {
        self.get_listing(&format!("_search/{resource}"), &query.search_params(text))
            .await
    }

    /// `GET /api/<resource>/<id>`.
    pub async fn get<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        self.handle_response(resp).await
    }

    /// `POST /api/<resource>` with a null-stripped body.
    pub async fn create<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(resource)?;
        debug!("POST {url}");

        let resp = self
            .authorize(self.http.post(url))
            .json(&Self::clean_body(body)?)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// `PUT /api/<resource>/<id>` with a null-stripped body.
    pub async fn update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        debug!("PUT {url}");

        let resp = self
            .authorize(self.http.put(url))
            .json(&Self::clean_body(body)?)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// `PATCH /api/<resource>/<id>` as a JSON merge patch.
    pub async fn partial_update<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        resource: &str,
        id: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        debug!("PATCH {url}");

        let payload = serde_json::to_vec(&Self::clean_body(body)?)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        let resp = self
            .authorize(self.http.patch(url))
            .header(CONTENT_TYPE, MERGE_PATCH)
            .body(payload)
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// `DELETE /api/<resource>/<id>`; any 2xx body is ignored.
    pub async fn delete(&self, resource: &str, id: &str) -> Result<(), Error> {
        let url = self.url(&format!("{resource}/{id}"))?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        self.handle_empty(resp).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get_listing<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Listing<T>, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.authorize(self.http.get(url).query(params)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.parse_error(status, resp).await);
        }

        // Headers must be read before the body consumes the response.
        let total = pagination::total_count(resp.headers())?;
        let links = pagination::page_links(resp.headers());
        let items: Vec<T> = Self::decode(resp.text().await?)?;
        let total_count =
            total.unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));

        Ok(Listing {
            items,
            total_count,
            links,
        })
    }

    fn clean_body<B: Serialize>(body: &B) -> Result<serde_json::Value, Error> {
        serde_json::to_value(body)
            .map(strip_nulls)
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            Self::decode(resp.text().await?)
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let problem = serde_json::from_str::<ProblemResponse>(&raw).ok();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: problem
                    .and_then(|p| p.detail.or(p.title))
                    .unwrap_or_else(|| "missing or expired bearer token".into()),
            };
        }

        match problem {
            Some(p) => Error::Api {
                status: status.as_u16(),
                error_key: p.error_key.or_else(|| p.message.clone()),
                message: p
                    .detail
                    .or(p.title)
                    .or(p.message)
                    .unwrap_or_else(|| status.to_string()),
            },
            None => Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                },
                error_key: None,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_api_suffix() {
        assert_eq!(
            client("http://localhost:8080").base_url().as_str(),
            "http://localhost:8080/api/"
        );
        assert_eq!(
            client("http://localhost:8080/app/").base_url().as_str(),
            "http://localhost:8080/app/api/"
        );
    }

    #[test]
    fn existing_api_suffix_is_kept() {
        assert_eq!(
            client("http://localhost:8080/api").base_url().as_str(),
            "http://localhost:8080/api/"
        );
    }

    #[test]
    fn paths_join_under_api_root() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.url("credentials/5").unwrap().as_str(),
            "http://localhost:8080/api/credentials/5"
        );
        assert_eq!(
            c.url("/_search/identity-providers").unwrap().as_str(),
            "http://localhost:8080/api/_search/identity-providers"
        );
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let c = client("http://localhost:8080");
        assert!(!c.has_token());
        c.set_token(SecretString::from("abc".to_string()));
        assert!(c.has_token());
        c.clear_token();
        assert!(!c.has_token());
    }
}
