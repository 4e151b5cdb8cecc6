//! `RtClient` - Rotten Tomatoes API client implementation.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalRtApi;
use super::error::{Result, RtError};
use super::types::RtMovie;
use super::wire::{WireErrorResponse, WireMovie, WireMovieList};

/// Default base URL for the Rotten Tomatoes public API v1.0.
pub const DEFAULT_BASE_URL: &str = "http://api.rottentomatoes.com/api/public/v1.0/";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Movie search endpoint.
const SEARCH_PATH: &[&str] = &["movies.json"];

/// Box office list endpoint.
const BOX_OFFICE_PATH: &[&str] = &["lists", "movies", "box_office.json"];

/// Opening movies list endpoint.
const OPENING_PATH: &[&str] = &["lists", "movies", "opening.json"];

/// Rotten Tomatoes API client.
#[allow(clippy::module_name_repetitions)]
pub struct RtClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as the `apikey` query parameter.
    api_key: String,
}

impl fmt::Debug for RtClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RtClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for `RtClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct RtClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl RtClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (default: `rtmovies-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 30s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - The base URL cannot carry path segments.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<RtClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RtError::build("api_key is required"))?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL)
                .map_err(|e| RtError::build(format!("invalid default base URL: {e}")))?
        };
        if base_url.cannot_be_a_base() {
            return Err(RtError::build(format!("base URL cannot be a base: {base_url}")));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(RtError::HttpClient)?;

        Ok(RtClient {
            http_client,
            base_url,
            api_key,
        })
    }
}

impl RtClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> RtClientBuilder {
        RtClientBuilder::new()
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request with the API key and query params and returns the
    /// raw response body.
    ///
    /// Non-2xx responses are reported as [`RtError::Status`] without being
    /// decoded as movie data.
    #[instrument(skip_all)]
    async fn get_raw(&self, segments: &[&str], params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let path = segments.join("/");

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RtError::build(format!("base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        let mut query: Vec<(&str, &str)> = Vec::with_capacity(params.len().saturating_add(1));
        query.push(("apikey", self.api_key.as_str()));
        query.extend_from_slice(params);

        let request = self
            .http_client
            .get(url)
            .query(&query)
            .build()
            .map_err(|source| RtError::Transport {
                path: path.clone(),
                source,
            })?;

        // The full URL carries the API key; log only the endpoint path.
        tracing::debug!(%path, "Rotten Tomatoes API request");

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|source| RtError::Transport {
                path: path.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let message = serde_json::from_str::<WireErrorResponse>(&body)
                .map_or(body, |error_response| error_response.error);
            tracing::warn!(%path, %status, %message, "Rotten Tomatoes API returned an error");
            return Err(RtError::Status { status, message });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RtError::Transport { path, source })?;
        Ok(body.to_vec())
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T> {
        let body = self.get_raw(segments, params).await?;
        serde_json::from_slice(&body).map_err(|source| RtError::Decode {
            path: segments.join("/"),
            source,
        })
    }

    /// Sends a GET request to a list endpoint and normalizes its movies.
    async fn get_movie_list(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Vec<RtMovie>> {
        let list: WireMovieList = self.get_json(segments, params).await?;
        tracing::debug!(
            total = list.total,
            returned = list.movies.len(),
            "Movie list received"
        );
        list.into_movies()
    }
}

impl LocalRtApi for RtClient {
    #[instrument(skip_all)]
    async fn get_movie(&self, id: &str) -> Result<RtMovie> {
        if id.is_empty() {
            return Err(RtError::InvalidArgument("movie id must not be empty"));
        }
        let file = format!("{id}.json");
        let movie: WireMovie = self.get_json(&["movies", file.as_str()], &[]).await?;
        movie.normalize()
    }

    #[instrument(skip_all)]
    async fn search_movies(&self, query: &str) -> Result<Vec<RtMovie>> {
        self.get_movie_list(SEARCH_PATH, &[("q", query)]).await
    }

    #[instrument(skip_all)]
    async fn box_office(&self, country: &str) -> Result<Vec<RtMovie>> {
        self.get_movie_list(BOX_OFFICE_PATH, &[("country", country)])
            .await
    }

    #[instrument(skip_all)]
    async fn opening_movies(&self, country: &str) -> Result<Vec<RtMovie>> {
        self.get_movie_list(OPENING_PATH, &[("country", country)])
            .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::rotten_tomatoes::RtErrorKind;

    const API_PREFIX: &str = "/api/public/v1.0";

    fn client_for(server: &MockServer) -> RtClient {
        let base_url = format!("{}{API_PREFIX}/", server.uri());
        RtClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = RtClient::builder().build();

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.kind(), RtErrorKind::Configuration);
        assert!(err.to_string().contains("api_key is required"));
    }

    #[test]
    fn test_builder_rejects_empty_api_key() {
        // Arrange & Act
        let result = RtClient::builder().api_key("").build();

        // Assert
        assert!(result.unwrap_err().to_string().contains("api_key is required"));
    }

    #[test]
    fn test_builder_uses_default_base_url() {
        // Arrange & Act
        let client = RtClient::builder().api_key("test-key").build().unwrap();

        // Assert
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_builder_with_custom_base_url() {
        // Arrange
        let custom_url = Url::parse("http://localhost:8080/api/public/v1.0/").unwrap();

        // Act
        let client = RtClient::builder()
            .base_url(custom_url.clone())
            .api_key("test-key")
            .build()
            .unwrap();

        // Assert
        assert_eq!(client.base_url, custom_url);
    }

    #[test]
    fn test_builder_rejects_cannot_be_a_base_url() {
        // Arrange
        let url = Url::parse("mailto:someone@example.com").unwrap();

        // Act
        let result = RtClient::builder().base_url(url).api_key("test-key").build();

        // Assert
        assert_eq!(result.unwrap_err().kind(), RtErrorKind::Configuration);
    }

    #[test]
    fn test_debug_hides_api_key() {
        // Arrange
        let client = RtClient::builder()
            .api_key("super-secret-key")
            .build()
            .unwrap();

        // Act
        let debug = format!("{client:?}");

        // Assert
        assert!(!debug.contains("super-secret-key"));
        assert!(debug.contains("api.rottentomatoes.com"));
    }

    #[tokio::test]
    async fn test_search_movies_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/rotten_tomatoes/search_inception.json");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/movies.json")))
            .and(query_param("q", "inception"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let movies = client.search_movies("inception").await.unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 12_897);
        assert_eq!(movies[0].title, "Inception");
        assert_eq!(movies[0].year, Some(2010));
        assert_eq!(movies[0].runtime, Some(148));
        assert_eq!(movies[0].ratings.critics_score, Some(86));
        assert_eq!(movies[0].alternate_ids["imdb"], "1375666");
        assert_eq!(movies[0].abridged_cast[0].name, "Leonardo DiCaprio");
        assert_eq!(movies[1].id, 771_218_226);
        assert_eq!(movies[1].title, "Inception: The Cobol Job");
        assert_eq!(movies[1].year, None);
        assert_eq!(movies[1].runtime, None);
        assert_eq!(movies[1].ratings.critics_score, None);
        assert_eq!(movies[1].synopsis, None);
    }

    #[tokio::test]
    async fn test_search_query_is_url_encoded() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/movies.json")))
            .and(query_param("q", "the dark knight & co"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"total":0,"movies":[]}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let movies = client.search_movies("the dark knight & co").await.unwrap();

        // Assert
        assert!(movies.is_empty());
    }

    #[tokio::test]
    async fn test_box_office_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/rotten_tomatoes/box_office_us.json");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/lists/movies/box_office.json")))
            .and(query_param("country", "us"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let movies = client.box_office("us").await.unwrap();

        // Assert
        let ids: Vec<u64> = movies.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![771_041_149, 771_224_051, 771_249_361]);
        assert_eq!(movies[1].ratings.critics_score, Some(0));
        assert_eq!(movies[2].ratings.critics_score, None);
        assert_eq!(movies[2].runtime, None);
        assert_eq!(movies[2].year, Some(2012));
    }

    #[tokio::test]
    async fn test_opening_movies_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/rotten_tomatoes/opening_us.json");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/lists/movies/opening.json")))
            .and(query_param("country", "us"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let movies = client.opening_movies("us").await.unwrap();

        // Assert
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, 771_224_051);
        assert_eq!(movies[1].id, 771_227_406);
        assert_eq!(movies[1].ratings.critics_score, None);
    }

    #[tokio::test]
    async fn test_get_movie_via_http() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/rotten_tomatoes/movie_12897.json");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/movies/12897.json")))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let movie = client.get_movie("12897").await.unwrap();

        // Assert
        assert_eq!(movie.id, 12_897);
        assert_eq!(movie.title, "Inception");
        assert_eq!(movie.mpaa_rating, "PG-13");
        assert_eq!(movie.release_dates["theater"], "2010-07-16");
        assert_eq!(movie.ratings.critics_rating.as_deref(), Some("Certified Fresh"));
        assert_eq!(movie.abridged_cast.len(), 2);
        assert_eq!(movie.abridged_cast[1].characters, vec![String::from("Ariadne")]);
    }

    #[tokio::test]
    async fn test_get_movie_rejects_empty_id() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.get_movie("").await;

        // Assert
        assert_eq!(result.unwrap_err().kind(), RtErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_non_numeric_id_fails_whole_list() {
        // Arrange
        let mock_server = MockServer::start().await;
        let json_body =
            include_str!("../../../../fixtures/rotten_tomatoes/search_invalid_id.json");

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/movies.json")))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.search_movies("inception").await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.kind(), RtErrorKind::FieldConversion);
        assert!(err.to_string().contains("\"abc\""));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.box_office("us").await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.kind(), RtErrorKind::Decode);
        assert!(err.to_string().contains("lists/movies/box_office.json"));
    }

    #[tokio::test]
    async fn test_http_error_returns_api_message() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"{"error":"Account Inactive"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.search_movies("inception").await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.kind(), RtErrorKind::Transport);
        let message = err.to_string();
        assert!(message.contains("HTTP 403"));
        assert!(message.contains("Account Inactive"));
    }

    #[tokio::test]
    async fn test_http_error_with_plain_body() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);

        // Act
        let result = client.get_movie("12897").await;

        // Assert
        let err = result.unwrap_err();
        assert_eq!(err.kind(), RtErrorKind::Transport);
        assert!(err.to_string().contains("Service Unavailable"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Arrange
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = RtClient::builder()
            .base_url(
                format!("http://127.0.0.1:{port}{API_PREFIX}/")
                    .parse()
                    .unwrap(),
            )
            .api_key("test-key")
            .build()
            .unwrap();

        // Act
        let search = client.search_movies("inception").await;
        let box_office = client.box_office("us").await;
        let opening = client.opening_movies("us").await;
        let movie = client.get_movie("12897").await;

        // Assert
        assert_eq!(search.unwrap_err().kind(), RtErrorKind::Transport);
        assert_eq!(box_office.unwrap_err().kind(), RtErrorKind::Transport);
        assert_eq!(opening.unwrap_err().kind(), RtErrorKind::Transport);
        assert_eq!(movie.unwrap_err().kind(), RtErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"movies":[]}"#)
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let client = RtClient::builder()
            .base_url(format!("{}{API_PREFIX}/", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();

        // Act
        let result = client.opening_movies("us").await;

        // Assert
        assert_eq!(result.unwrap_err().kind(), RtErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_base_url_without_trailing_slash() {
        // Arrange
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/lists/movies/opening.json")))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"movies":[]}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = RtClient::builder()
            .base_url(format!("{}{API_PREFIX}", mock_server.uri()).parse().unwrap())
            .api_key("test-key")
            .build()
            .unwrap();

        // Act
        let movies = client.opening_movies("us").await.unwrap();

        // Assert
        assert!(movies.is_empty());
    }
}
