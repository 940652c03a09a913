//! Log CRUD and search API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use pretty_assertions::assert_eq;

use common::fixtures;
use common::TestContext;
use watchlog_backend::models::{EntryId, WatchStatus};

/// Test creating a movie from form-style input.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_movie() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Dune");

    let response = server
        .post("/api/logs")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::movie_request(&title, "2024-03-02"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    let id = body["id"].as_i64().unwrap();

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.title, title);
    assert_eq!(entry.release_year.as_deref(), Some("2021"));
    assert_eq!(entry.status, Some(WatchStatus::Completed));
    assert_eq!(entry.episode, None);
    assert_eq!(entry.notes.as_deref(), Some("watched in theatre"));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test that an unfinished series submitted as watching is stored unchanged.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_watching_series_behind_total() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Severance");

    let response = server
        .post("/api/logs")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::series_request(&title, "WATCHING", Some(5), Some(10)))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.status, Some(WatchStatus::Watching));
    assert_eq!(entry.episode, Some(5));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test that reaching the last episode completes the series.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_series_at_last_episode_completes() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Andor");

    let response = server
        .post("/api/logs")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::series_request(&title, "WATCHING", Some(10), Some(10)))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.status, Some(WatchStatus::Completed));
    assert_eq!(entry.episode, Some(10));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test that a completed series with a blank episode snaps to the total.
#[tokio::test]
#[ignore = "requires database"]
async fn test_create_completed_series_with_blank_episode() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Blue Eye Samurai");

    let response = server
        .post("/api/logs")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::series_request(&title, "COMPLETED", None, Some(12)))
        .await;

    response.assert_status(StatusCode::CREATED);
    let id = response.json::<serde_json::Value>()["id"].as_i64().unwrap();

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.status, Some(WatchStatus::Completed));
    assert_eq!(entry.episode, Some(12));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test that lowering the episode of a completed series reopens it.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_completed_series_with_lower_episode_reopens() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Arcane");
    let id = ctx
        .insert_entry(&fixtures::series_draft(
            &title,
            WatchStatus::Completed,
            Some(12),
            Some(12),
            fixtures::date(2024, 4, 1),
        ))
        .await;

    let response = server
        .put(&format!("/api/logs/{}", id))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::series_request(&title, "COMPLETED", Some(5), Some(12)))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.status, Some(WatchStatus::Watching));
    assert_eq!(entry.episode, Some(5));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test that marking a watching series completed fills in the episode.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_watching_series_to_completed() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Shogun");
    let id = ctx
        .insert_entry(&fixtures::series_draft(
            &title,
            WatchStatus::Watching,
            Some(5),
            Some(10),
            fixtures::date(2024, 4, 1),
        ))
        .await;

    let response = server
        .put(&format!("/api/logs/{}", id))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::series_request(&title, "COMPLETED", Some(5), Some(10)))
        .await;

    response.assert_status_ok();

    let entry = ctx.fetch_entry(id).await.unwrap();
    assert_eq!(entry.status, Some(WatchStatus::Completed));
    assert_eq!(entry.episode, Some(10));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test updating a missing entry returns 404.
#[tokio::test]
#[ignore = "requires database"]
async fn test_update_missing_entry() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .put("/api/logs/999999999")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .json(&fixtures::movie_request("Ghost", "2024-01-01"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

/// Test deleting an entry, then deleting it again.
#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_entry_twice() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let id = ctx
        .insert_entry(&fixtures::movie_draft(
            &fixtures::unique_title("Heat"),
            fixtures::date(2024, 1, 5),
        ))
        .await;

    let first = server
        .delete(&format!("/api/logs/{}", id))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;
    first.assert_status_ok();
    assert!(ctx.fetch_entry(id).await.is_none());

    let second = server
        .delete(&format!("/api/logs/{}", id))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;
    second.assert_status(StatusCode::NOT_FOUND);
}

/// Test deleting a missing id leaves other entries alone.
#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_missing_entry_does_not_touch_store() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let id = ctx
        .insert_entry(&fixtures::movie_draft(
            &fixtures::unique_title("Ronin"),
            fixtures::date(2024, 1, 5),
        ))
        .await;
    let before = ctx.db.list_entries().await.unwrap().len();

    let response = server
        .delete("/api/logs/999999999")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ctx.db.list_entries().await.unwrap().len(), before);
    assert!(ctx.fetch_entry(id).await.is_some());

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test getting a single entry.
#[tokio::test]
#[ignore = "requires database"]
async fn test_get_entry() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Alien");
    let id = ctx
        .insert_entry(&fixtures::movie_draft(&title, fixtures::date(2024, 2, 2)))
        .await;

    let response = server
        .get(&format!("/api/logs/{}", id))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], title.as_str());
    assert_eq!(body["type"], "MOVIE");
    assert_eq!(body["rating"], "TIMEPASS");
    assert_eq!(body["date_watched"], "2024-02-02");

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test listing returns most recently watched first.
#[tokio::test]
#[ignore = "requires database"]
async fn test_list_orders_by_date_watched() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let older = ctx
        .insert_entry(&fixtures::movie_draft(
            &fixtures::unique_title("Older"),
            fixtures::date(2001, 1, 1),
        ))
        .await;
    let newer = ctx
        .insert_entry(&fixtures::movie_draft(
            &fixtures::unique_title("Newer"),
            fixtures::date(2001, 6, 1),
        ))
        .await;

    let response = server
        .get("/api/logs")
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    let ids: Vec<EntryId> = body.iter().filter_map(|e| e["id"].as_i64()).collect();
    let older_pos = ids.iter().position(|id| *id == older).unwrap();
    let newer_pos = ids.iter().position(|id| *id == newer).unwrap();
    assert!(newer_pos < older_pos);

    // Cleanup
    ctx.cleanup_entries(&[older, newer]).await;
}

/// Test search is a case-insensitive substring match on the title.
#[tokio::test]
#[ignore = "requires database"]
async fn test_search_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Mad Max Fury Road");
    let id = ctx
        .insert_entry(&fixtures::movie_draft(&title, fixtures::date(2024, 2, 2)))
        .await;
    let needle = title.to_uppercase()[4..].to_string();

    let response = server
        .get("/api/search")
        .add_query_param("q", &needle)
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"].as_i64(), Some(id));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}

/// Test search treats wildcard characters literally.
#[tokio::test]
#[ignore = "requires database"]
async fn test_search_wildcards_are_literal() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let title = fixtures::unique_title("Plain");
    let id = ctx
        .insert_entry(&fixtures::movie_draft(&title, fixtures::date(2024, 2, 2)))
        .await;

    let response = server
        .get("/api/search")
        .add_query_param("q", &format!("{}%", &title[..5]))
        .add_header(TestContext::token_header(), TestContext::valid_token())
        .await;

    response.assert_status_ok();
    let body: Vec<serde_json::Value> = response.json();
    assert!(body.iter().all(|e| e["id"].as_i64() != Some(id)));

    // Cleanup
    ctx.cleanup_entries(&[id]).await;
}
