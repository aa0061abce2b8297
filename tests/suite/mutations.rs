//! Create, edit and delete against a mock task API.

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdesk_engine::{App, Modal};

use crate::common::{app_for, mount_tasks, settle, signed_in, task_json, titles};

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.insert_char(c);
    }
}

async fn request_body(server: &MockServer, verb: &str) -> Value {
    let requests = server.received_requests().await.unwrap_or_default();
    let request = requests
        .iter()
        .find(|request| request.method.as_str() == verb)
        .unwrap_or_else(|| panic!("no {verb} request"));
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test]
async fn created_task_appears_after_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Count", "0")
                .set_body_json(json!([])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_tasks(&server, json!([task_json(99, "Grace", "Compile")]), 1).await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(task_json(99, "Grace", "Compile")),
        )
        .mount(&server)
        .await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;
    assert!(titles(&app).is_empty());

    type_text(&mut app, "Grace");
    app.focus_next();
    type_text(&mut app, "Compile");
    app.focus_next();
    type_text(&mut app, "the compiler");
    app.submit_form();
    settle(&mut app).await;

    assert_eq!(titles(&app), vec!["Compile"]);
    assert!(app.toasts().contains("Task added successfully!"));
    assert!(app.form().draft().title.is_empty());

    let body = request_body(&server, "POST").await;
    assert_eq!(body["fullName"], "Grace");
    assert_eq!(body["title"], "Compile");
    assert_eq!(body["description"], "the compiler");
    assert!(body.get("id").is_some());
}

#[tokio::test]
async fn edit_puts_changed_fields() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(7, "Ada", "Fix bike")]), 1).await;
    Mock::given(method("PUT"))
        .and(path("/tasks/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json(7, "Ada", "Fix bike now")),
        )
        .mount(&server)
        .await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;

    app.open_edit_selected();
    assert!(matches!(app.modal(), Some(Modal::Edit(_))));
    app.focus_next();
    type_text(&mut app, " now");
    app.submit_edit();
    settle(&mut app).await;

    assert!(app.modal().is_none());
    assert!(app.toasts().contains("Task updated"));
    let body = request_body(&server, "PUT").await;
    assert_eq!(body["title"], "Fix bike now");
    assert_eq!(body["fullName"], "Ada");
}

#[tokio::test]
async fn failed_delete_keeps_the_row() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(3, "Ada", "Keep me")]), 1).await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;

    app.open_delete_selected();
    app.confirm_delete();
    settle(&mut app).await;

    assert_eq!(titles(&app), vec!["Keep me"]);
    assert!(app.toasts().contains("Delete failed"));
    match app.modal() {
        Some(Modal::Delete(confirm)) => assert!(!confirm.in_flight),
        other => panic!("delete modal should stay open, got {other:?}"),
    }
}
