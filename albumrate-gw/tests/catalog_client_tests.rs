//! Integration tests for the catalog client
//!
//! Runs against a local fake provider (see helpers/fake_catalog.rs), except
//! the live search scenario which needs real credentials and is ignored by
//! default.

mod helpers;

use albumrate_common::config::CatalogConfig;
use albumrate_gw::services::{CatalogClient, CatalogError};
use helpers::fake_catalog::{ALBUM_UPSTREAM_ERROR, ALBUM_WITHOUT_ARTISTS};
use helpers::spawn_fake_catalog;

#[tokio::test]
async fn test_search_maps_releases() {
    let fake = spawn_fake_catalog(3600).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    let releases = client.search("Thriller", Some("Michael Jackson")).await.unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].id, "1C2h7mLntPSeVYciMRTF4a");
    assert_eq!(releases[0].title, "Thriller");
    assert_eq!(releases[0].artist, "Michael Jackson");
    assert_eq!(releases[0].release_date.as_deref(), Some("1982-11-30"));
    assert_eq!(
        releases[0].cover_art.as_deref(),
        Some("https://img.example/thriller-640.jpg")
    );
    assert_eq!(releases[1].artist, "Michael Jackson, Guest");
    assert!(releases[1].cover_art.is_none());
    assert!(releases[1].url.is_none());

    let query = fake.last_search_query().expect("search was not called");
    assert_eq!(query["q"], "album:Thriller artist:Michael Jackson");
    assert_eq!(query["type"], "album");
    assert_eq!(query["limit"], "12");
}

#[tokio::test]
async fn test_token_cached_across_calls() {
    let fake = spawn_fake_catalog(3600).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    client.search("Thriller", None).await.unwrap();
    client.search("Bad", None).await.unwrap();
    client.get_album("abc123").await.unwrap();

    assert_eq!(fake.token_requests(), 1);
}

#[tokio::test]
async fn test_token_near_expiry_is_refreshed() {
    // Lifetime shorter than the refresh margin: every call needs a new token
    let fake = spawn_fake_catalog(30).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    let first = client.authenticate().await.unwrap();
    let second = client.authenticate().await.unwrap();

    assert_eq!(first, "token-1");
    assert_eq!(second, "token-2");
    assert_eq!(fake.token_requests(), 2);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_token_exchange() {
    let fake = spawn_fake_catalog(3600).await;
    let client = std::sync::Arc::new(CatalogClient::new(fake.config()).unwrap());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let client = client.clone();
        tasks.spawn(async move { client.authenticate().await.unwrap() });
    }
    while let Some(result) = tasks.join_next().await {
        assert_eq!(result.unwrap(), "token-1");
    }

    assert_eq!(fake.token_requests(), 1);
}

#[tokio::test]
async fn test_album_detail_includes_artist_image() {
    let fake = spawn_fake_catalog(3600).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    let detail = client.get_album("abc123").await.unwrap();

    assert_eq!(detail.album_data["id"], "abc123");
    assert_eq!(detail.album_data["tracks"]["items"][0]["name"], "Track 1");
    assert_eq!(
        detail.artist_img_url.as_deref(),
        Some("https://img.example/artist-640.jpg")
    );
    assert_eq!(fake.artist_requests(), 1);
}

#[tokio::test]
async fn test_album_without_artists_skips_artist_lookup() {
    let fake = spawn_fake_catalog(3600).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    let detail = client.get_album(ALBUM_WITHOUT_ARTISTS).await.unwrap();

    assert!(detail.artist_img_url.is_none());
    assert_eq!(fake.artist_requests(), 0);
}

#[tokio::test]
async fn test_upstream_error_surfaces_without_retry() {
    let fake = spawn_fake_catalog(3600).await;
    let client = CatalogClient::new(fake.config()).unwrap();

    let result = client.get_album(ALBUM_UPSTREAM_ERROR).await;

    match result {
        Err(CatalogError::ApiError(status, _)) => assert_eq!(status, 500),
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_api_error() {
    let fake = spawn_fake_catalog(3600).await;
    let mut config = fake.config();
    config.token_url = format!("{}/v1/search", fake.base_url);

    let client = CatalogClient::new(config).unwrap();
    let result = client.search("Thriller", None).await;

    assert!(matches!(result, Err(CatalogError::ApiError(405, _))));
}

#[tokio::test]
async fn test_unreachable_provider_is_network_error() {
    let config = CatalogConfig {
        client_id: Some("id".to_string()),
        client_secret: Some("secret".to_string()),
        token_url: "http://127.0.0.1:1/api/token".to_string(),
        api_base_url: "http://127.0.0.1:1/v1".to_string(),
        timeout_secs: 2,
        ..CatalogConfig::default()
    };
    let client = CatalogClient::new(config).unwrap();

    let result = client.search("Thriller", None).await;

    assert!(matches!(result, Err(CatalogError::NetworkError(_))));
}

/// Live scenario against the real provider
///
/// Run with SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET set:
/// `cargo test -p albumrate-gw --test catalog_client_tests -- --ignored`
#[tokio::test]
#[ignore]
async fn test_live_search_thriller() {
    let config = CatalogConfig {
        client_id: std::env::var("SPOTIFY_CLIENT_ID").ok(),
        client_secret: std::env::var("SPOTIFY_CLIENT_SECRET").ok(),
        ..CatalogConfig::default()
    };
    let client = CatalogClient::new(config).unwrap();

    let releases = client.search("Thriller", Some("Michael Jackson")).await.unwrap();

    assert!(!releases.is_empty());
    for release in &releases {
        assert!(!release.id.is_empty());
        assert!(!release.title.is_empty());
        assert!(!release.artist.is_empty());
    }
}
