//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up the router with or without a database
//! - Helpers for creating and removing log entries
//! - Access token header helpers
//!
//! # Requirements
//! Tests built with `TestContext::new` require a PostgreSQL database
//! (set DATABASE_URL env var). `TestContext::without_database` never
//! connects and is enough for requests rejected before any query runs.

pub mod fixtures;

use std::path::PathBuf;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;

use watchlog_backend::db::Database;
use watchlog_backend::models::{EntryDraft, EntryId, WatchLogEntry};
use watchlog_backend::routes::auth::ACCESS_TOKEN_HEADER;
use watchlog_backend::AppState;

/// Password the test router is configured with.
pub const TEST_PASSWORD: &str = "test-password";

/// Test context containing database connection and router.
pub struct TestContext {
    pub db: Database,
    app: Router,
}

impl TestContext {
    /// Create a new test context backed by a real database.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self::with_database(db)
    }

    /// Create a test context whose pool never connects unless a query runs.
    ///
    /// Use this for requests that are rejected before reaching the database.
    pub fn without_database() -> Self {
        let db = Database::connect_lazy("postgres://localhost/watchlog_unused")
            .expect("Failed to create lazy pool");

        Self::with_database(db)
    }

    /// Create a test context around an already connected database.
    pub fn with_database(db: Database) -> Self {
        let state = AppState::new(db.clone(), TEST_PASSWORD);
        let app = watchlog_backend::router(state, &static_dir());

        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Name of the access token header.
    pub fn token_header() -> HeaderName {
        HeaderName::from_static(ACCESS_TOKEN_HEADER)
    }

    /// Header value carrying the given token.
    pub fn token_value(token: &str) -> HeaderValue {
        HeaderValue::from_str(token).expect("token is a valid header value")
    }

    /// Header value carrying the configured password.
    pub fn valid_token() -> HeaderValue {
        Self::token_value(TEST_PASSWORD)
    }

    /// Insert an entry directly, bypassing the API.
    pub async fn insert_entry(&self, draft: &EntryDraft) -> EntryId {
        self.db
            .create_entry(draft)
            .await
            .expect("Failed to insert test entry")
    }

    /// Read an entry directly, bypassing the API.
    pub async fn fetch_entry(&self, id: EntryId) -> Option<WatchLogEntry> {
        self.db.get_entry(id).await.expect("Failed to read test entry")
    }

    /// Remove test entries.
    pub async fn cleanup_entries(&self, ids: &[EntryId]) {
        for id in ids {
            let _ = self.db.delete_entry(*id).await;
        }
    }
}

/// A directory with an index.html standing in for the client bundle.
fn static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/static")
}
