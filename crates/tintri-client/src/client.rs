//! Asynchronous Tintri REST API client.
//!
//! Every call builds its URL from a fixed `/api` prefix, always sends
//! `content-type: application/json`, and attaches the session cookie only
//! when a session is supplied. Transport-level failures become
//! [`Error::Transport`]; responses with unexpected status codes become
//! [`Error::Api`] carrying status, URL, payload, and body.

use crate::models::LoginRequest;
use crate::session::{Session, SESSION_COOKIE};
use crate::Result;
use reqwest::{header, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::path::Path;
use tintri_core::config::ClientConfig;
use tintri_core::error::{ApiFault, Error, NO_PAYLOAD};
use tintri_core::query::QueryParams;
use tintri_core::version::VersionInfo;
use tokio::io::AsyncWriteExt;
use url::Url;

const USER_AGENT: &str = concat!("tintri-client/", env!("CARGO_PKG_VERSION"));

/// Fixed prefix prepended to every API path.
const API_PREFIX: &str = "/api";

const INFO_PATH: &str = "/info";
const LOGIN_PATH: &str = "/v310/session/login";
const LOGOUT_PATH: &str = "/v310/session/logout";

/// Builder for [`TintriClient`].
#[derive(Debug, Clone)]
pub struct TintriClientBuilder {
    host: String,
    config: ClientConfig,
}

impl TintriClientBuilder {
    /// Create a builder for the given server name or address.
    ///
    /// A bare host name gets an `https://` scheme; an explicit
    /// `scheme://host:port` form is used as given.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            config: ClientConfig::default(),
        }
    }

    /// Replace the whole client configuration.
    #[must_use]
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.config.tls_verify = verify;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = seconds;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the host or configuration is invalid.
    pub fn build(self) -> Result<TintriClient> {
        self.config.check()?;

        let raw = if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("https://{}", self.host)
        };
        let parsed = Url::parse(&raw)
            .map_err(|err| Error::Config(format!("invalid server address `{}`: {err}", self.host)))?;
        let base = parsed.to_string().trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.config.timeout())
            .danger_accept_invalid_certs(!self.config.tls_verify)
            .build()
            .map_err(Error::from)?;

        Ok(TintriClient { base, http })
    }
}

/// Asynchronous client for one VMstore appliance or Global Center server.
///
/// The client itself is stateless; the caller owns the [`Session`] lifetime.
#[derive(Debug, Clone)]
pub struct TintriClient {
    base: String,
    http: reqwest::Client,
}

/// Response surface returned by the raw verb calls.
///
/// Carries the status code for the caller to check against the code its
/// endpoint expects, instead of branching through error unwinding.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    url: String,
    payload: String,
    body: String,
}

impl ApiResponse {
    /// HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Full request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|err| Error::Parse(format!("{}: {err}", self.url)))
    }

    /// Check the status code against the one this endpoint expects.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] carrying status, URL, payload, and body when
    /// the code differs.
    pub fn expect_status(self, expected: u16) -> Result<Self> {
        if self.status == expected {
            Ok(self)
        } else {
            Err(ApiFault::new(self.status, self.url, self.payload, self.body).into())
        }
    }
}

impl TintriClient {
    /// Construct a client for `host` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the host is not a valid address.
    pub fn new(host: impl Into<String>) -> Result<Self> {
        TintriClientBuilder::new(host).build()
    }

    /// Start building a client with a non-default configuration.
    pub fn builder(host: impl Into<String>) -> TintriClientBuilder {
        TintriClientBuilder::new(host)
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base)
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
        session: Option<&Session>,
    ) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url_for(path);
        let payload = match body {
            Some(body) => serde_json::to_string(body)
                .map_err(|err| Error::Config(format!("unserializable payload: {err}")))?,
            None => NO_PAYLOAD.to_string(),
        };

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(session) = session {
            request = request.header(header::COOKIE, session.cookie());
        }
        if body.is_some() {
            request = request.body(payload.clone());
        }

        tracing::debug!(method = %method, url, "sending API request");
        let response = request.send().await?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await?;
        tracing::debug!(status, url, body_len = body.len(), "received API response");

        Ok(ApiResponse {
            status,
            url,
            payload,
            body,
        })
    }

    /// Unauthenticated version discovery: `GET /api/info`.
    ///
    /// # Errors
    ///
    /// Transport fault when the server is unreachable, API fault when the
    /// status is not 200, parse fault when the body is not version info.
    pub async fn info(&self) -> Result<VersionInfo> {
        self.get(INFO_PATH, None).await?.json()
    }

    /// Log in and return the server-issued session token.
    ///
    /// Credentials are posted as a typed JSON object; on 200 the token is
    /// taken from the response's `JSESSIONID` cookie. The diagnostic payload
    /// recorded on a fault names the account but never the password.
    ///
    /// # Errors
    ///
    /// API fault (with the response status) on non-200, transport fault when
    /// no response was obtained.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<Session> {
        let url = self.url_for(LOGIN_PATH);
        let body = LoginRequest::new(username, password.expose_secret());

        tracing::debug!(url, username, "logging in");
        let response = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await?;
            return Err(ApiFault::new(
                status.as_u16(),
                url,
                format!("RestApiCredentials for {username}"),
                text,
            )
            .into());
        }

        let token = response
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string());
        match token {
            Some(token) => Ok(Session::new(token)),
            None => Err(Error::Parse(format!(
                "login response from {url} did not set a {SESSION_COOKIE} cookie"
            ))),
        }
    }

    /// Release the server-side session: `GET /v310/session/logout`.
    ///
    /// Must be called exactly once per successful login, on every exit path.
    ///
    /// # Errors
    ///
    /// API fault when the status is not 204.
    pub async fn logout(&self, session: &Session) -> Result<()> {
        self.execute::<()>(Method::GET, LOGOUT_PATH, &[], None, Some(session))
            .await?
            .expect_status(204)
            .map(|_| ())
    }

    /// Log in, run `work` with the session, and always log out.
    ///
    /// The logout happens on both the success and the failure path; an error
    /// from `work` takes precedence over a logout failure, which is only
    /// logged.
    ///
    /// # Errors
    ///
    /// Whatever `work` returns, or the login/logout fault.
    pub async fn with_session<F, Fut, T>(
        &self,
        username: &str,
        password: &SecretString,
        work: F,
    ) -> Result<T>
    where
        F: FnOnce(Session) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = self.login(username, password).await?;
        let result = work(session.clone()).await;
        let logout = self.logout(&session).await;
        match result {
            Ok(value) => logout.map(|()| value),
            Err(err) => {
                if let Err(logout_err) = logout {
                    tracing::warn!(error = %logout_err, "logout failed after earlier fault");
                }
                Err(err)
            }
        }
    }

    /// GET without a query string; 200 is enforced.
    ///
    /// The session is optional so unauthenticated info endpoints can be
    /// reached with the same call.
    ///
    /// # Errors
    ///
    /// API fault when the status is not 200, transport fault otherwise.
    pub async fn get(&self, path: &str, session: Option<&Session>) -> Result<ApiResponse> {
        self.execute::<()>(Method::GET, path, &[], None, session)
            .await?
            .expect_status(200)
    }

    /// GET with a query string; 200 is enforced.
    ///
    /// Keys in `query` may repeat to express multi-value filters.
    ///
    /// # Errors
    ///
    /// API fault when the status is not 200, transport fault otherwise.
    pub async fn get_query(
        &self,
        path: &str,
        query: &QueryParams,
        session: &Session,
    ) -> Result<ApiResponse> {
        self.execute::<()>(Method::GET, path, query.as_pairs(), None, Some(session))
            .await?
            .expect_status(200)
    }

    /// PUT with a JSON body.
    ///
    /// The expected status varies per endpoint (typically 204 for updates);
    /// callers check it with [`ApiResponse::expect_status`].
    ///
    /// # Errors
    ///
    /// Transport fault when no response was obtained.
    pub async fn put<B>(&self, path: &str, payload: &B, session: &Session) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::PUT, path, &[], Some(payload), Some(session))
            .await
    }

    /// POST with an optional JSON body (trigger-only actions pass `None`).
    ///
    /// The expected status varies per endpoint (200 for creates returning
    /// identifiers, 204 for triggers); callers check it with
    /// [`ApiResponse::expect_status`].
    ///
    /// # Errors
    ///
    /// Transport fault when no response was obtained.
    pub async fn post<B>(
        &self,
        path: &str,
        payload: Option<&B>,
        session: &Session,
    ) -> Result<ApiResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, &[], payload, Some(session))
            .await
    }

    /// DELETE with the session cookie attached.
    ///
    /// The expected status varies per endpoint (200 or 204); callers check
    /// it with [`ApiResponse::expect_status`].
    ///
    /// # Errors
    ///
    /// Transport fault when no response was obtained.
    pub async fn delete(&self, path: &str, session: &Session) -> Result<ApiResponse> {
        self.execute::<()>(Method::DELETE, path, &[], None, Some(session))
            .await
    }

    /// Streamed GET of a pre-signed report URL, written to `dest` in chunks.
    ///
    /// The destination file is only created after a 200 status has been
    /// received, so a failing download leaves nothing behind.
    ///
    /// # Errors
    ///
    /// API fault when the status is not 200; transport fault for connection
    /// or local I/O failures.
    pub async fn download_file(&self, url: &str, session: &Session, dest: &Path) -> Result<()> {
        tracing::debug!(url, dest = %dest.display(), "downloading file");
        let mut response = self
            .http
            .get(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, session.cookie())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await?;
            return Err(ApiFault::new(status.as_u16(), url, NO_PAYLOAD, body).into());
        }

        let mut file = tokio::fs::File::create(dest).await.map_err(|err| {
            Error::Transport(format!("cannot create {}: {err}", dest.display()))
        })?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await.map_err(|err| {
                Error::Transport(format!("write to {} failed: {err}", dest.display()))
            })?;
        }
        file.flush().await.map_err(|err| {
            Error::Transport(format!("write to {} failed: {err}", dest.display()))
        })?;
        Ok(())
    }
}
