//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdesk_engine::{App, SessionContext};

pub use taskdesk_engine::testing::{client_for, settle, signed_in, titles};

pub fn app_for(server: &MockServer, session: SessionContext) -> App {
    taskdesk_engine::testing::app_for(&server.uri(), session)
}

pub fn task_json(id: u64, full_name: &str, title: &str) -> serde_json::Value {
    json!({ "id": id, "fullName": full_name, "title": title, "description": "notes" })
}

/// `GET /tasks` answering `rows` with an `X-Total-Count` of `total`.
pub async fn mount_tasks(server: &MockServer, rows: serde_json::Value, total: u64) {
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", total.to_string().as_str())
                .set_body_json(rows),
        )
        .mount(server)
        .await;
}

/// `POST /auth/login` answering with `token`.
pub async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "access_token": token })),
        )
        .mount(server)
        .await;
}

pub async fn list_requests(server: &MockServer) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.method.as_str() == "GET" && request.url.path() == "/tasks")
        .collect()
}

pub fn query_value(request: &wiremock::Request, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
