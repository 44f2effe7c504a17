//! GitHub API client.

use std::future::Future;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use tokio::runtime::Runtime;
use url::Url;

use crate::error::{Result, SweepError};

/// Public GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Client for the GitHub REST API.
///
/// Listing goes through a blocking `reqwest` client; pull requests go through
/// `octocrab`, driven by a private runtime so callers stay synchronous.
pub struct GitHubClient {
    pub(crate) token: Option<String>,
    pub(crate) base_url: String,
    pub(crate) client: Client,
    pub(crate) octocrab: octocrab::Octocrab,
    runtime: Runtime,
}

impl GitHubClient {
    /// Creates a client for `https://api.github.com`.
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a client for a GitHub Enterprise (or test) endpoint.
    pub fn with_base_url(token: Option<String>, base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;

        // The blocking client owns its own runtime and must be built outside ours.
        let client = Client::builder().user_agent("org-url-sweep").build()?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        let octocrab = {
            let _guard = runtime.enter();
            let mut builder = octocrab::Octocrab::builder()
                .base_uri(base_url.as_str())
                .map_err(|e| SweepError::GitHub {
                    message: format!("Invalid API URL '{}': {}", base_url, e),
                })?;
            if let Some(token) = &token {
                builder = builder.personal_token(token.clone());
            }
            builder.build().map_err(|e| SweepError::GitHub {
                message: format!("Failed to build API client: {}", e),
            })?
        };

        Ok(Self {
            token,
            base_url,
            client,
            octocrab,
            runtime,
        })
    }

    /// Runs a future on the client's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Get the default headers for API requests.
    pub(crate) fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            headers.insert(AUTHORIZATION, bearer(token)?);
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("org-url-sweep"));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Builds an API URL from path segments, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        endpoint_url(&self.base_url, segments)
    }

    /// Make a GET request to the GitHub API.
    pub(crate) fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).headers(self.headers()?).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(SweepError::GitHub {
                message: format!("API request failed ({}): {}", status, body),
            });
        }

        response.json().map_err(|e| SweepError::GitHub {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Get the token, if one was configured.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Trims trailing slashes and checks that the URL parses.
fn normalize_base_url(mut base_url: String) -> Result<String> {
    while base_url.ends_with('/') {
        base_url.pop();
    }
    Url::parse(&base_url)?;
    Ok(base_url)
}

fn endpoint_url(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    url.path_segments_mut()
        .map_err(|_| SweepError::GitHub {
            message: format!("API URL '{}' cannot take a path", base_url),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn bearer(token: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        SweepError::MissingCredential("token contains invalid header characters".into())
    })
}
