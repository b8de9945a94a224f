//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p intake-api`.

pub mod fixtures;

use axum_test::TestServer;
use intake_api::setup::{build_state, routes};
use intake_core::Config;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test application: server plus the temp directory backing the storage root.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Names of every entry under the storage root, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        list_dir(&self.upload_dir)
    }
}

pub fn list_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read upload dir")
        .map(|entry| {
            entry
                .expect("Failed to read dir entry")
                .file_name()
                .to_string_lossy()
                .to_string()
        })
        .collect();
    names.sort();
    names
}

/// Setup test app with default limits and an isolated storage root.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app, letting the caller adjust the config first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("uploads");

    let mut config = Config::for_storage_root(&upload_dir);
    configure(&mut config);

    let state = build_state(config.clone())
        .await
        .expect("Failed to build app state");
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir,
        _temp_dir: temp_dir,
    }
}
