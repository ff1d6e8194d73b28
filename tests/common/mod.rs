//! Shared setup for integration tests
//!
//! Each test gets its own temporary SQLite database with migrations applied.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Once};

use tempfile::TempDir;

use linkfolio::api::app_state::AppServices;
use linkfolio::config::{get_config, init_config};
use linkfolio::services::GeoIpProvider;
use linkfolio::storage::SeaOrmStorage;
use linkfolio::storage::backend::retry::RetryConfig;
use linkfolio::storage::backend::{connect_sqlite, run_migrations};

static INIT: Once = Once::new();

pub fn init_static_config() {
    INIT.call_once(|| {
        init_config();
    });
}

/// Keep the `TempDir` alive for as long as the storage is used
pub struct TestEnv {
    pub dir: TempDir,
    pub storage: Arc<SeaOrmStorage>,
}

pub async fn setup_storage(name: &str) -> TestEnv {
    init_static_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(format!("{}.db", name));
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url)
        .await
        .expect("Failed to connect to SQLite");
    run_migrations(&db).await.expect("Failed to run migrations");

    let storage = Arc::new(SeaOrmStorage::from_connection(
        db,
        "sqlite",
        RetryConfig::default(),
    ));
    TestEnv { dir, storage }
}

/// Services wired the same way as the server, uploads and settings kept in the temp dir
pub fn build_services(env: &TestEnv) -> AppServices {
    build_services_with_geoip(env, None)
}

pub fn build_services_with_geoip(env: &TestEnv, geoip: Option<GeoIpProvider>) -> AppServices {
    let mut site = get_config().site.clone();
    site.settings_file = env
        .dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    site.upload_dir = env.dir.path().join("uploads").to_string_lossy().to_string();
    AppServices::new(env.storage.clone(), &site, geoip)
}

/// Answer exactly one HTTP request with a fixed body, return its URL
pub fn serve_once(status: u16, content_type: &str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub upstream");
    let addr = listener.local_addr().expect("No local addr");
    let head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        }
    });

    format!("http://{}/cv.pdf", addr)
}

/// URL on a port nothing listens on
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local addr");
    drop(listener);
    format!("http://{}/cv.pdf", addr)
}
