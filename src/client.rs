// GitHub API HTTP client.
// Builds request URLs, dispatches JSON calls, and classifies responses.

use reqwest::{
    Client as HttpClient, Response, redirect,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;
use url::Url;

use crate::error::{CrankError, Result};
use crate::options::ListOptions;

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const DEFAULT_USER_AGENT: &str = "crank";

/// Client configuration: base URL, credentials, and transport overrides.
#[derive(Debug, Clone, Default)]
pub struct Config {
    base_url: Option<String>,
    token: Option<String>,
    user_agent: Option<String>,
    raw_transport: Option<HttpClient>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL (e.g. for GitHub Enterprise).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the bearer token used for authentication.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Supply a preconfigured transport for the raw (non-JSON) request path.
    /// The transport must have automatic redirect following disabled.
    pub fn with_raw_transport(mut self, transport: HttpClient) -> Self {
        self.raw_transport = Some(transport);
        self
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            limit: header_u64(headers, "x-ratelimit-limit"),
            remaining: header_u64(headers, "x-ratelimit-remaining"),
            reset: header_u64(headers, "x-ratelimit-reset"),
        }
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Metadata captured from every response, success or failure.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub status: reqwest::StatusCode,
    pub rate_limit: RateLimit,
}

impl ResponseMeta {
    pub(crate) fn from_response(response: &Response) -> Self {
        Self {
            status: response.status(),
            rate_limit: RateLimit::from_headers(response.headers()),
        }
    }
}

/// Structured error body returned by the API on failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// GitHub API client.
///
/// Holds two transports: one for JSON calls and a raw one with redirect
/// following disabled, used by the log-URL resolver. All per-call state is
/// local, so a single instance is safe to share across tasks.
pub struct Client {
    base_url: String,
    http: HttpClient,
    raw: HttpClient,
}

impl Client {
    /// Create a client from the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let base_url = config
            .base_url
            .unwrap_or_else(|| GITHUB_API_BASE.to_string());
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| CrankError::InvalidToken)?,
            );
        }
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        let user_agent = config
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT);
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent).map_err(|_| CrankError::InvalidToken)?,
        );

        let http = HttpClient::builder()
            .default_headers(headers.clone())
            .build()
            .map_err(CrankError::Transport)?;

        let raw = match config.raw_transport {
            Some(transport) => transport,
            None => HttpClient::builder()
                .default_headers(headers)
                .redirect(redirect::Policy::none())
                .build()
                .map_err(CrankError::Transport)?,
        };

        Ok(Self {
            base_url,
            http,
            raw,
        })
    }

    /// Create a client from the GITHUB_TOKEN environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN").map_err(|_| CrankError::MissingToken)?;
        Self::new(Config::new().with_token(token))
    }

    /// Build a fully-addressed URL for an API path, with pagination
    /// parameters appended only when the caller set them.
    pub(crate) fn endpoint_url(&self, path: &str, opts: Option<&ListOptions>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))?;
        if let Some(opts) = opts {
            if let Some(query) = opts.to_query()? {
                url.set_query(Some(&query));
            }
        }
        Ok(url)
    }

    /// Make a GET request and decode the JSON body into `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: Option<&ListOptions>,
    ) -> Result<(T, ResponseMeta)> {
        let url = self.endpoint_url(path, opts)?;
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?;
        let meta = ResponseMeta::from_response(&response);

        if response.status().is_success() {
            let body = response.bytes().await?;
            let value = serde_json::from_slice(&body)?;
            Ok((value, meta))
        } else {
            Err(api_error(response, meta).await)
        }
    }

    /// Make a single raw round trip. Redirects are observed, not followed,
    /// and the body is left undecoded.
    pub(crate) async fn raw_get(&self, url: Url) -> Result<Response> {
        debug!(%url, "GET (raw)");
        Ok(self.raw.get(url).send().await?)
    }
}

/// Convert a non-2xx response into an API error, pulling the structured
/// `message` out of the body when one is present.
async fn api_error(response: Response, meta: ResponseMeta) -> CrankError {
    let status = response.status();
    let body = response.bytes().await.unwrap_or_default();
    let message = match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(parsed) => parsed.message,
        Err(_) => String::from_utf8_lossy(&body).trim().to_string(),
    };
    CrankError::Api {
        status,
        message,
        meta,
    }
}
