// ====================================
// tests/integration/persistence_tests.rs
// ====================================
//! Users registered with the file backend survive a restart
use crate::test_utils::*;
use axum::http::StatusCode;
use sessionauth_backend::{config::StorageBackend, router::create_router, AppState};
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_file_backend_keeps_users_across_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = test_settings();
    settings.storage.backend = StorageBackend::File;
    settings.storage.path = temp_dir.path().to_path_buf();

    {
        let state = AppState::from_settings(settings.clone()).unwrap();
        let app = create_router(Arc::new(state));
        assert_eq!(register(&app, "sue", "1234").await.status, StatusCode::CREATED);
    }

    let state = AppState::from_settings(settings).unwrap();
    let app = create_router(Arc::new(state));

    // sessions are not persisted, but the account is
    assert_eq!(login(&app, "sue", "1234").await.status, StatusCode::OK);
    assert_eq!(
        register(&app, "sue", "1234").await.status,
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert!(temp_dir.path().join("users.json").exists());
}
