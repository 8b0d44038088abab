//! Music catalog (Spotify Web API) client
//!
//! Client-credentials authentication plus two read-only lookups: album search
//! and album detail with the primary artist's image. The bearer token is
//! cached until shortly before it expires.

use albumrate_common::config::CatalogConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const USER_AGENT: &str = concat!("albumrate/", env!("CARGO_PKG_VERSION"));

/// Tokens are refreshed this long before the provider's expiry
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog credentials are not configured")]
    MissingCredentials,

    #[error("Invalid catalog id: {0:?}")]
    InvalidId(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// One album search hit, in the shape the web client renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    /// All credited artists joined with ", "
    pub artist: String,
    pub release_date: Option<String>,
    /// First (largest) cover image
    pub cover_art: Option<String>,
    /// Album page on the provider's site
    pub url: Option<String>,
}

/// Album detail passed through from the provider plus the artist image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub album_data: Value,
    pub artist_img_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    albums: AlbumPage,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    items: Vec<SpotifyAlbum>,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtistRef>,
    release_date: Option<String>,
    #[serde(default)]
    images: Vec<SpotifyImage>,
    #[serde(default)]
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtistRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

impl From<SpotifyAlbum> for Release {
    fn from(album: SpotifyAlbum) -> Self {
        let artist = album
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: album.id,
            title: album.name,
            artist,
            release_date: album.release_date,
            cover_art: album.images.into_iter().next().map(|i| i.url),
            url: album.external_urls.spotify,
        }
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Catalog ids are base-62; anything else is refused before it reaches a URL path
pub fn is_valid_catalog_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 64 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Provider search expression, e.g. `album:Thriller artist:Michael Jackson`
pub fn build_search_query(album: &str, artist: Option<&str>) -> String {
    let mut query = format!("album:{}", album.trim());
    if let Some(artist) = artist.map(str::trim).filter(|a| !a.is_empty()) {
        query.push_str(&format!(" artist:{}", artist));
    }
    query
}

/// Spotify Web API client
pub struct CatalogClient {
    http_client: reqwest::Client,
    config: CatalogConfig,
    token: Mutex<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
            token: Mutex::new(None),
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.config.has_credentials()
    }

    /// Bearer token, from cache or a fresh client-credentials exchange
    ///
    /// The lock is held across the exchange so concurrent callers share one
    /// refresh.
    pub async fn authenticate(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let (client_id, client_secret) = match (&self.config.client_id, &self.config.client_secret)
        {
            (Some(id), Some(secret)) if self.config.has_credentials() => (id, secret),
            _ => return Err(CatalogError::MissingCredentials),
        };

        tracing::debug!(url = %self.config.token_url, "Requesting catalog access token");

        let response = self
            .http_client
            .post(&self.config.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))?;

        tracing::info!(expires_in = token.expires_in, "Obtained catalog access token");

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });

        Ok(access_token)
    }

    /// Album search, first page only
    pub async fn search(&self, album: &str, artist: Option<&str>) -> Result<Vec<Release>, CatalogError> {
        let query = build_search_query(album, artist);
        let limit = self.config.search_limit.to_string();

        let response: SearchResponse = self
            .get_json(
                &format!("{}/search", self.base_url()),
                &[("q", query.as_str()), ("type", "album"), ("limit", limit.as_str())],
            )
            .await?;

        let releases: Vec<Release> = response.albums.items.into_iter().map(Release::from).collect();

        tracing::info!(query = %query, results = releases.len(), "Catalog search completed");

        Ok(releases)
    }

    /// Album detail followed by the first artist's image
    ///
    /// The artist lookup is skipped when the album lists no artists.
    pub async fn get_album(&self, album_id: &str) -> Result<AlbumDetail, CatalogError> {
        if !is_valid_catalog_id(album_id) {
            return Err(CatalogError::InvalidId(album_id.to_string()));
        }

        let album_data: Value = self
            .get_json(&format!("{}/albums/{}", self.base_url(), album_id), &[])
            .await?;

        let artist_id = album_data
            .pointer("/artists/0/id")
            .and_then(Value::as_str)
            .map(str::to_string);

        let artist_img_url = match artist_id {
            Some(artist_id) => {
                if !is_valid_catalog_id(&artist_id) {
                    return Err(CatalogError::ParseError(format!(
                        "album {} lists malformed artist id {:?}",
                        album_id, artist_id
                    )));
                }
                let artist: SpotifyArtist = self
                    .get_json(&format!("{}/artists/{}", self.base_url(), artist_id), &[])
                    .await?;
                artist.images.into_iter().next().map(|i| i.url)
            }
            None => {
                tracing::debug!(album_id = %album_id, "Album has no artists, skipping artist lookup");
                None
            }
        };

        Ok(AlbumDetail {
            album_data,
            artist_img_url,
        })
    }

    fn base_url(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    /// Authenticated GET returning a parsed JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let token = self.authenticate().await?;

        tracing::debug!(url = %url, "Querying catalog API");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::NetworkError(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // Revoked or expired early: force a new exchange on the next call
            self.token.lock().await.take();
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }
}
