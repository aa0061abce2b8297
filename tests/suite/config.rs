//! Configuration file to running app.

use std::fs;

use serde_json::json;
use tempfile::tempdir;
use wiremock::MockServer;

use taskdesk_config::{Settings, TaskdeskConfig};
use taskdesk_engine::App;

use crate::common::{list_requests, mount_tasks, query_value, settle, signed_in, task_json};

#[tokio::test]
async fn config_file_drives_api_url_and_page_size() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(1, "Ada", "Configured")]), 4).await;

    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "${TASK_API}"

[list]
page_size = 2
debounce_ms = 50

[ui]
ascii_only = true
"#,
    )
    .unwrap();

    let config = TaskdeskConfig::load_from(&path).unwrap();
    let uri = server.uri();
    let settings = Settings::resolve_with(config.as_ref(), |key| {
        (key == "TASK_API").then(|| uri.clone())
    })
    .unwrap();
    assert_eq!(settings.page_size, 2);
    assert!(settings.ascii_only);

    let mut app = App::new(&settings, signed_in("tok")).unwrap();
    assert!(app.ascii_only());
    settle(&mut app).await;

    let requests = list_requests(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query_value(&requests[0], "_limit").as_deref(), Some("2"));
    assert_eq!(
        app.tasks().pagination().map(|p| p.label()).as_deref(),
        Some("Page 1 of 2")
    );
}

#[test]
fn missing_config_file_means_defaults() {
    let dir = tempdir().unwrap();
    let config = TaskdeskConfig::load_from(&dir.path().join("absent.toml")).unwrap();
    assert!(config.is_none());

    let settings = Settings::resolve_with(None, |_| None).unwrap();
    assert_eq!(settings.page_size, 5);
    assert!(!settings.ascii_only);
}
