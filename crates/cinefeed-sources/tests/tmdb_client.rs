//! Exercises `TmdbClient` over real HTTP against an in-process axum server
//! that mimics the TMDB endpoints used by the client.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cinefeed_config::TmdbConfig;
use cinefeed_models::PageQuery;
use cinefeed_sources::{MovieSource, Normalizer, RequestError, TmdbClient};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const API_KEY: &str = "test-key";

type Params = Query<HashMap<String, String>>;

fn check_defaults(params: &HashMap<String, String>) -> Result<(), StatusCode> {
    if params.get("api_key").map(String::as_str) != Some(API_KEY) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    if params.get("language").map(String::as_str) != Some("en-US") {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

fn page_of(params: &HashMap<String, String>, titles: &[&str]) -> Value {
    let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let results: Vec<Value> = titles
        .iter()
        .enumerate()
        .map(|(i, title)| json!({"id": page * 100 + i as u32, "title": title, "vote_average": 7.0}))
        .collect();
    json!({"page": page, "results": results, "total_pages": 3, "total_results": 60})
}

async fn popular(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    check_defaults(&params)?;
    Ok(Json(page_of(&params, &["Popular A", "Popular B"])))
}

async fn search(Query(params): Params) -> Result<Json<Value>, StatusCode> {
    check_defaults(&params)?;
    let term = params.get("query").cloned().unwrap_or_default();
    Ok(Json(page_of(&params, &[term.as_str()])))
}

async fn movie(Path(id): Path<u64>, Query(params): Params) -> Result<Json<Value>, StatusCode> {
    check_defaults(&params)?;
    match id {
        550 => {
            if params.get("append_to_response").map(String::as_str) != Some("credits,release_dates,videos") {
                return Err(StatusCode::BAD_REQUEST);
            }
            Ok(Json(json!({
                "id": 550,
                "title": "Fight Club",
                "vote_average": 8.4,
                "runtime": 139,
                "credits": {"crew": [{"job": "Director", "name": "David Fincher"}], "cast": []}
            })))
        }
        7 => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok(Json(json!({"id": 7})))
        }
        500 => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn start_server() -> SocketAddr {
    let app = Router::new()
        .route("/3/movie/popular", get(popular))
        .route("/3/movie/{id}", get(movie))
        .route("/3/search/movie", get(search))
        .route("/3/broken", get(not_json));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, timeout_secs: u64) -> TmdbClient {
    let config = TmdbConfig {
        api_key: Some(API_KEY.to_string()),
        base_url: format!("http://{}/3/", addr),
        timeout_secs,
        ..TmdbConfig::default()
    };
    TmdbClient::new(&config).unwrap()
}

#[tokio::test]
async fn popular_page_carries_default_params() {
    let addr = start_server().await;
    let client = client_for(addr, 8);

    let page = client.movie_page(&PageQuery::popular(2)).await.unwrap();
    assert_eq!(page.page, Some(2));
    assert_eq!(page.total_pages, Some(3));
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].id, 200);
    assert_eq!(page.results[0].title.as_deref(), Some("Popular A"));
}

#[tokio::test]
async fn search_sends_term_and_page() {
    let addr = start_server().await;
    let client = client_for(addr, 8);

    let page = client
        .movie_page(&PageQuery::new(Some("the matrix & co"), 3))
        .await
        .unwrap();
    assert_eq!(page.page, Some(3));
    assert_eq!(page.results[0].title.as_deref(), Some("the matrix & co"));
}

#[tokio::test]
async fn details_are_fetched_with_appends_and_normalize() {
    let addr = start_server().await;
    let client = client_for(addr, 8);

    let value = client.movie_details(550).await.unwrap();
    let detail = Normalizer::default().normalize_value(550, value);
    assert_eq!(detail.title, "Fight Club");
    assert_eq!(detail.director, "David Fincher");
    assert_eq!(detail.runtime, "2h 19m");
    assert_eq!(detail.certification, "NR");
}

#[tokio::test]
async fn not_found_carries_status() {
    let addr = start_server().await;
    let client = client_for(addr, 8);

    let err = client.movie_details(999999).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.is_not_found());

    let err = client.movie_details(500).await.unwrap_err();
    assert!(matches!(err, RequestError::Status { status: 500, .. }));
}

#[tokio::test]
async fn wrong_api_key_is_a_status_error() {
    let addr = start_server().await;
    let config = TmdbConfig {
        api_key: Some("wrong".to_string()),
        base_url: format!("http://{}/3", addr),
        ..TmdbConfig::default()
    };
    let client = TmdbClient::new(&config).unwrap();

    let err = client.get("/movie/popular", &[]).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn slow_response_times_out() {
    let addr = start_server().await;
    let client = client_for(addr, 1);

    let err = client.movie_details(7).await.unwrap_err();
    assert!(matches!(err, RequestError::Timeout { .. }), "unexpected error: {err:?}");
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let addr = start_server().await;
    let client = client_for(addr, 8);

    let err = client.get("/broken", &[]).await.unwrap_err();
    assert!(matches!(err, RequestError::Decode { .. }));
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr, 2);

    let err = client.movie_details(550).await.unwrap_err();
    assert!(matches!(err, RequestError::Transport { .. }), "unexpected error: {err:?}");
}
