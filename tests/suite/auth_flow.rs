//! Login, token persistence, the route guard and logout.

use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdesk_client::{FileStore, SessionContext};
use taskdesk_engine::{Alert, App, Route};

use crate::common::{app_for, mount_login, mount_tasks, settle, task_json};

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.insert_char(c);
    }
}

async fn log_in(app: &mut App) {
    type_text(app, "me@example.com");
    app.focus_next();
    type_text(app, "secret");
    app.submit_login();
    settle(app).await;
}

#[tokio::test]
async fn token_survives_a_restart() {
    let server = MockServer::start().await;
    mount_login(&server, "persisted-token").await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("authorization", "Bearer persisted-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "1")
                .set_body_json(json!([task_json(1, "Ada", "Visible")])),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");

    let mut first = app_for(
        &server,
        SessionContext::new(Arc::new(FileStore::new(&storage))),
    );
    assert_eq!(first.route(), Route::Login);
    log_in(&mut first).await;
    assert_eq!(first.alert(), Some(Alert::LoginSuccess));
    assert_eq!(first.route(), Route::Home);
    drop(first);

    let mut second = app_for(
        &server,
        SessionContext::new(Arc::new(FileStore::new(&storage))),
    );
    assert_eq!(second.route(), Route::Home);
    settle(&mut second).await;
    assert_eq!(second.tasks().rows()[0].title, "Visible");
}

#[tokio::test]
async fn rejected_credentials_stay_on_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let mut app = app_for(
        &server,
        SessionContext::new(Arc::new(FileStore::new(&storage))),
    );
    log_in(&mut app).await;

    assert_eq!(app.route(), Route::Login);
    assert_eq!(app.alert(), Some(Alert::LoginFailed));
    assert!(!app.session().is_authenticated());
    assert!(!storage.exists());
}

#[tokio::test]
async fn logout_forgets_the_persisted_token() {
    let server = MockServer::start().await;
    mount_login(&server, "tok").await;
    mount_tasks(&server, json!([]), 0).await;

    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage.json");
    let mut app = app_for(
        &server,
        SessionContext::new(Arc::new(FileStore::new(&storage))),
    );
    log_in(&mut app).await;
    app.dismiss_alert();
    app.logout();

    assert_eq!(app.route(), Route::Login);
    app.open_path("/");
    assert_eq!(app.route(), Route::Login);

    let reloaded = SessionContext::new(Arc::new(FileStore::new(&storage)));
    assert!(!reloaded.is_authenticated());
}
