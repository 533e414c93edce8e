// Hand-crafted async HTTP client for the opsdeck console API (v1).
//
// Base path: /api/
// Auth: Bearer token header, or cookie session via /api/auth/login

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types;

// ── Error response shape from the console API ────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the opsdeck console API.
///
/// Communicates via JSON REST endpoints under `/api/`. Supports two
/// auth styles: a long-lived bearer token injected on every request, or
/// a cookie session established through [`AdminClient::login`].
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
    /// Session-cookie auth changes how a 401 mid-flight is interpreted.
    session: bool,
}

impl AdminClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a bearer token and transport config.
    ///
    /// Injects `Authorization: Bearer <token>` as a default header on
    /// every request.
    pub fn from_token(
        base_url: &str,
        token: &secrecy::SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
            session: false,
        })
    }

    /// Build an unauthenticated session client.
    ///
    /// Attaches a cookie jar so that [`AdminClient::login`] can persist
    /// the session cookie for subsequent requests.
    pub fn for_session(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let transport = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout.as_secs(),
            session: true,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: 30,
            session: false,
        })
    }

    /// Build the base URL ending in `/api/`.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"notifications"`) onto the base URL.
    fn url(&self, path: &str) -> Url {
        // base_url always ends with `/api/`, so joining relative paths works.
        self.base_url
            .join(path)
            .expect("path should be valid relative URL")
    }

    fn map_send_err(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(e)
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_response(resp).await
    }

    async fn post_no_response(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_response(resp).await
    }

    async fn put_no_body<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path);
        debug!("PUT {url}");

        let resp = self
            .http
            .put(url)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path);
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                // char-based cut so a multibyte body cannot panic the error path
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
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

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return if self.session {
                Error::SessionExpired
            } else {
                Error::InvalidToken
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Server {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Server {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Auth ─────────────────────────────────────────────────────────

    /// Authenticate a session client; the session cookie lands in the jar.
    pub async fn login(
        &self,
        username: &str,
        password: &secrecy::SecretString,
    ) -> Result<types::SessionResponse, Error> {
        let url = self.url("auth/login");
        debug!("POST {url}");

        let body = types::LoginRequest {
            username: username.to_owned(),
            password: password.expose_secret().to_owned(),
        };
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        // A 401 here means bad credentials, not an expired session.
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&raw)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "invalid username or password".into());
            return Err(Error::Authentication { message });
        }

        self.handle_response(resp).await
    }

    /// Invalidate the current session cookie.
    pub async fn logout(&self) -> Result<(), Error> {
        self.post_no_response("auth/logout").await
    }

    // ── Status ───────────────────────────────────────────────────────

    pub async fn status(&self) -> Result<types::StatusResponse, Error> {
        self.get("status").await
    }

    // ── Notifications ────────────────────────────────────────────────

    pub async fn list_notifications(&self) -> Result<Vec<types::NotificationResponse>, Error> {
        self.get("notifications").await
    }

    pub async fn mark_notification_read(
        &self,
        id: &str,
    ) -> Result<types::NotificationResponse, Error> {
        self.put_no_body(&format!("notifications/{id}/read")).await
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("notifications/{id}")).await
    }

    // ── Contracts ────────────────────────────────────────────────────

    pub async fn list_contracts(&self) -> Result<Vec<types::ContractResponse>, Error> {
        self.get("contracts").await
    }

    pub async fn create_contract(
        &self,
        body: &types::ContractWriteRequest,
    ) -> Result<types::ContractResponse, Error> {
        self.post("contracts", body).await
    }

    pub async fn update_contract(
        &self,
        id: &str,
        body: &types::ContractWriteRequest,
    ) -> Result<types::ContractResponse, Error> {
        self.put(&format!("contracts/{id}"), body).await
    }

    pub async fn delete_contract(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("contracts/{id}")).await
    }

    // ── Security rules ───────────────────────────────────────────────

    pub async fn list_security_rules(&self) -> Result<Vec<types::SecurityRuleResponse>, Error> {
        self.get("security-rules").await
    }

    pub async fn create_security_rule(
        &self,
        body: &types::SecurityRuleWriteRequest,
    ) -> Result<types::SecurityRuleResponse, Error> {
        self.post("security-rules", body).await
    }

    pub async fn update_security_rule(
        &self,
        id: &str,
        body: &types::SecurityRuleWriteRequest,
    ) -> Result<types::SecurityRuleResponse, Error> {
        self.put(&format!("security-rules/{id}"), body).await
    }

    pub async fn set_security_rule_enabled(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<types::SecurityRuleResponse, Error> {
        self.put(
            &format!("security-rules/{id}/enabled"),
            &types::RuleEnabledRequest { enabled },
        )
        .await
    }

    pub async fn delete_security_rule(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("security-rules/{id}")).await
    }

    // ── Comparisons ──────────────────────────────────────────────────

    pub async fn list_comparisons(&self) -> Result<Vec<types::ComparisonResponse>, Error> {
        self.get("comparisons").await
    }

    pub async fn get_comparison(&self, id: &str) -> Result<types::ComparisonResponse, Error> {
        self.get(&format!("comparisons/{id}")).await
    }

    pub async fn run_comparison(
        &self,
        body: &types::ComparisonRunRequest,
    ) -> Result<types::ComparisonResponse, Error> {
        self.post("comparisons", body).await
    }

    pub async fn delete_comparison(&self, id: &str) -> Result<(), Error> {
        self.delete(&format!("comparisons/{id}")).await
    }
}
