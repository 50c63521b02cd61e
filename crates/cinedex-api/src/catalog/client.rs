//! `CatalogClient` - TMDB movie catalog client implementation.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::instrument;
use url::Url;

use super::api::CatalogApi;
use super::error::FetchError;
use super::types::{
    Category, MovieDetails, MovieListResponse, MovieSummary, TmdbErrorResponse,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// How requests authenticate against TMDB.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// v4 read access token, sent as `Authorization: Bearer`.
    BearerToken(String),
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BearerToken(_) => f.write_str("BearerToken(<redacted>)"),
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
        }
    }
}

/// TMDB movie catalog client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Authentication.
    credential: Credential,
    /// Value of the `language` query parameter.
    language: String,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    credential: Option<Credential>,
    user_agent: Option<String>,
    language: Option<String>,
    timeout: Option<Duration>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            credential: None,
            user_agent: None,
            language: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Authenticates with a v4 bearer token.
    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credential = Some(Credential::BearerToken(token.into()));
        self
    }

    /// Authenticates with a v3 API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.credential = Some(Credential::ApiKey(key.into()));
        self
    }

    /// Sets the credential directly.
    #[must_use]
    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets a total request timeout. Without one a hung request never resolves.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - no credential is set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let credential = self
            .credential
            .context("credential is required (bearer token or API key)")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let mut http_builder = Client::builder().user_agent(&user_agent).gzip(true);
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http_client = http_builder
            .build()
            .context("failed to build HTTP client")?;

        Ok(CatalogClient {
            http_client,
            base_url,
            credential,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Url {
                path: segments.join("/"),
                reason: String::from("base URL cannot have path segments"),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request with credentials, `language` and extra query params.
    #[instrument(skip_all, fields(path = %segments.join("/")))]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let path = segments.join("/");
        let url = self.endpoint(segments)?;

        let mut builder = self
            .http_client
            .get(url)
            .query(&[("language", self.language.as_str())]);
        builder = match &self.credential {
            Credential::BearerToken(token) => builder.bearer_auth(token),
            Credential::ApiKey(key) => builder.query(&[("api_key", key.as_str())]),
        };
        let request = builder
            .query(query)
            .build()
            .map_err(|source| FetchError::Request {
                path: path.clone(),
                source: source.without_url(),
            })?;

        // Path only: the query may carry the API key. Transport errors are
        // stripped of their URL for the same reason.
        tracing::debug!(path = %path, "TMDB API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| FetchError::Request {
                path: path.clone(),
                source: source.without_url(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<TmdbErrorResponse>(&body).map_or(body, |e| {
                format!("code={}, message={}", e.status_code, e.status_message)
            });
            return Err(FetchError::Status { status, message });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Request {
                path: path.clone(),
                source: source.without_url(),
            })?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { path, source })
    }

    /// Fetches one listing page, logging and swallowing any failure.
    async fn list_page(
        &self,
        segments: &[&str],
        page: u32,
        query: Option<&str>,
    ) -> Vec<MovieSummary> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(q) = query {
            params.push(("query", String::from(q)));
        }
        params.push(("page", page.to_string()));

        match self.get_json::<MovieListResponse>(segments, &params).await {
            Ok(response) => response.results,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    cause = ?std::error::Error::source(&e).map(ToString::to_string),
                    "Error while fetching the movies, showing an empty page"
                );
                Vec::new()
            }
        }
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip_all, fields(category = %category, page = page))]
    async fn list_by_category(&self, category: Category, page: u32) -> Vec<MovieSummary> {
        self.list_page(&["movie", category.as_str()], page, None)
            .await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn list_popular(&self, page: u32) -> Vec<MovieSummary> {
        self.list_page(&["movie", Category::Popular.as_str()], page, None)
            .await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn search(&self, query: &str, page: u32) -> Vec<MovieSummary> {
        self.list_page(&["search", "movie"], page, Some(query)).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn details(&self, movie_id: &str) -> Result<MovieDetails, FetchError> {
        let result = self.get_json::<MovieDetails>(&["movie", movie_id], &[]).await;
        if let Err(ref e) = result {
            tracing::error!(movie_id, error = %e, "Error while fetching movie details");
        }
        result
    }
}
