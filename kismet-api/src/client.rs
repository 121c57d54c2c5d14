//! HTTP client for the Kismet server REST API.
//!
//! Handles basic-auth credentials, the session cookie and its on-disk cache,
//! the single login retry after a 401, and msgpack command encoding.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::Serialize;
use tracing::{debug, warn};

use kismet_core::config::{KismetConfig, ServerConfig};
use kismet_core::constants::{self, paths, SESSION_COOKIE_NAME};
use kismet_core::error::{KisError, KisResult};
use kismet_models::commands::encode_command;
use kismet_models::{decode_bytes, PlainValue};

use crate::session::{FileSessionStore, SessionStore};

/// HTTP client for communicating with a Kismet server.
///
/// Wraps reqwest::Client with a cookie jar for the `KISMET` session cookie,
/// optional basic-auth credentials, and a pluggable session cache.
#[derive(Clone)]
pub struct KismetClient {
    inner: Client,
    /// Server URI without a trailing slash (e.g. "http://127.0.0.1:2501").
    host_uri: String,
    /// Parsed form of `host_uri`, used to seed and read the cookie jar.
    host_url: Url,
    jar: Arc<Jar>,
    credentials: Option<(String, String)>,
    session_store: Option<Arc<dyn SessionStore>>,
}

impl KismetClient {
    /// Create a new client from server configuration.
    pub fn new(config: &ServerConfig) -> KisResult<Self> {
        let host_uri = KismetConfig::sanitize_host_uri(&config.address);
        if host_uri.is_empty() {
            return Err(KisError::MissingConfig("server address".into()));
        }
        let host_url = Url::parse(&format!("{host_uri}/"))
            .map_err(|e| KisError::Config(format!("invalid server address {host_uri}: {e}")))?;

        let jar = Arc::new(Jar::default());

        let mut builder = Client::builder()
            .cookie_provider(jar.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_secs(15))
            .user_agent(format!("{}/{}", constants::APP_NAME, constants::APP_VERSION));

        if config.accept_self_signed_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let inner = builder
            .build()
            .map_err(|e| KisError::Http(format!("failed to build HTTP client: {e}")))?;

        let credentials = config
            .credentials()
            .map(|(user, pass)| (user.to_string(), pass.to_string()));

        Ok(Self {
            inner,
            host_uri,
            host_url,
            jar,
            credentials,
            session_store: None,
        })
    }

    /// Create a client from a full config, caching the session cookie in
    /// the configured file.
    pub fn from_config(config: &KismetConfig) -> KisResult<Self> {
        let store = FileSessionStore::new(config.effective_cache_path()?);
        Ok(Self::new(&config.server)?.with_session_store(Arc::new(store)))
    }

    /// Builder form of [`set_session_store`](Self::set_session_store).
    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.set_session_store(store);
        self
    }

    /// Install a session cache and load any cookie it holds into the jar.
    ///
    /// A cache that cannot be read is logged and otherwise ignored.
    pub fn set_session_store(&mut self, store: Arc<dyn SessionStore>) {
        match store.load(SESSION_COOKIE_NAME) {
            Ok(Some(cookie)) => {
                debug!("loaded cached session cookie");
                self.jar.add_cookie_str(
                    &format!("{SESSION_COOKIE_NAME}={cookie}; Path=/"),
                    &self.host_url,
                );
            }
            Ok(None) => {}
            Err(e) => warn!("failed to read session cache: {e}"),
        }
        self.session_store = Some(store);
    }

    /// Cache the session cookie in a plaintext file (`~` is expanded).
    pub fn set_session_cache(&mut self, path: &str) -> KisResult<()> {
        let store = FileSessionStore::from_user_path(path)?;
        self.set_session_store(Arc::new(store));
        Ok(())
    }

    /// Set the credentials sent with HTTP basic auth on every request.
    pub fn set_login(&mut self, user: &str, password: &str) {
        self.credentials = Some((user.to_string(), password.to_string()));
    }

    /// Get the server URI.
    pub fn host_uri(&self) -> &str {
        &self.host_uri
    }

    /// Current value of the session cookie, if the server has issued one.
    pub fn session_cookie(&self) -> Option<String> {
        self.cookie_for(&self.host_url)
    }

    /// Build the full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host_uri, path.trim_start_matches('/'))
    }

    fn cookie_for(&self, url: &Url) -> Option<String> {
        let header = self.jar.cookies(url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE_NAME)
            .map(|(_, value)| value.to_string())
            .filter(|value| !value.is_empty())
    }

    /// Write the current session cookie to the cache. Failures are logged only.
    fn persist_session(&self, url: &str) {
        let Some(store) = &self.session_store else {
            return;
        };
        let cookie = Url::parse(url)
            .ok()
            .and_then(|u| self.cookie_for(&u))
            .or_else(|| self.session_cookie());
        let Some(cookie) = cookie else {
            return;
        };
        if let Err(e) = store.save(SESSION_COOKIE_NAME, &cookie) {
            warn!("failed to save session: {e}");
        }
    }

    /// Internal: send one request without any retry.
    async fn send(
        &self,
        method: Method,
        url: &str,
        form: Option<&[(&str, &str)]>,
    ) -> KisResult<Response> {
        let mut builder = self.inner.request(method, url);
        if let Some((user, pass)) = &self.credentials {
            builder = builder.basic_auth(user, Some(pass));
        }
        if let Some(form) = form {
            builder = builder.form(form);
        }
        builder.send().await.map_err(Self::classify_error)
    }

    /// Execute a request, logging in and retrying once after a 401.
    async fn request(
        &self,
        method: Method,
        path: &str,
        form: Option<&[(&str, &str)]>,
    ) -> KisResult<Vec<u8>> {
        let url = self.url(path);
        debug!("{} {}", method, path);

        let mut response = self.send(method.clone(), &url, form).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("{path} requires login");
            self.login().await?;
            debug!("logged in, retrying {} {}", method, path);
            response = self.send(method, &url, form).await?;
        }

        let body = Self::check_status(path, response).await?;
        self.persist_session(&url);
        Ok(body)
    }

    /// Check the HTTP status code and read the body of a 200 response.
    async fn check_status(path: &str, response: Response) -> KisResult<Vec<u8>> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(KisError::AuthFailed(format!("{path} still unauthorized after login")));
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!("{path} failed with {status}: {body}");
            return Err(KisError::ServerError {
                status: status.as_u16(),
                message: body,
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| KisError::Http(format!("failed to read response bytes: {e}")))
    }

    /// Classify a reqwest error into a KisError variant.
    fn classify_error(e: reqwest::Error) -> KisError {
        if e.is_timeout() {
            KisError::Timeout(e.to_string())
        } else if e.is_connect() {
            KisError::Http(format!("connection failed: {e}"))
        } else {
            KisError::Http(e.to_string())
        }
    }

    // --- Session ---

    /// Validate the session (and credentials) against the server.
    ///
    /// On success the issued cookie is written to the session cache.
    pub async fn login(&self) -> KisResult<()> {
        let url = self.url(paths::CHECK_SESSION);
        let response = self.send(Method::GET, &url, None).await?;
        let status = response.status();

        if status != StatusCode::OK {
            warn!("invalid session: check_session returned {status}");
            return Err(KisError::AuthFailed(format!(
                "check_session returned {status}"
            )));
        }

        self.persist_session(&url);
        Ok(())
    }

    /// Whether the current session is valid / logged in.
    pub async fn check_session(&self) -> KisResult<bool> {
        let url = self.url(paths::CHECK_SESSION);
        let response = self.send(Method::GET, &url, None).await?;
        if response.status() != StatusCode::OK {
            return Ok(false);
        }
        self.persist_session(&url);
        Ok(true)
    }

    // --- Public HTTP methods ---

    /// GET a path and return the raw response body.
    pub async fn get_url(&self, path: &str) -> KisResult<Vec<u8>> {
        self.request(Method::GET, path, None).await
    }

    /// POST form data to a path and return the raw response body.
    pub async fn post_url(&self, path: &str, form: &[(&str, &str)]) -> KisResult<Vec<u8>> {
        self.request(Method::POST, path, Some(form)).await
    }

    /// POST a msgpack-encoded command in the `msgpack` form field.
    pub async fn post_msgpack_url<T: Serialize + ?Sized>(
        &self,
        path: &str,
        cmd: &T,
    ) -> KisResult<Vec<u8>> {
        let encoded = encode_command(cmd)?;
        self.post_url(path, &[(constants::MSGPACK_FORM_FIELD, encoded.as_str())])
            .await
    }

    /// Convenience: GET + decode into a plain value tree.
    pub async fn unpack_url(&self, path: &str) -> KisResult<PlainValue> {
        let body = self.get_url(path).await?;
        decode_bytes(&body)
    }

    /// Convenience: POST a command + decode the response.
    pub async fn unpack_post_msgpack_url<T: Serialize + ?Sized>(
        &self,
        path: &str,
        cmd: &T,
    ) -> KisResult<PlainValue> {
        let body = self.post_msgpack_url(path, cmd).await?;
        decode_bytes(&body)
    }
}
