//! List synchronization: debounced search, pagination, cache reuse and
//! last-request-wins ordering.

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::MockServer;

use taskdesk_engine::{
    App, FetchOutcome, Focus, ListOptions, ListView, QueryCache, TaskPage,
};
use taskdesk_types::QueryKey;

use crate::common::{
    app_for, client_for, list_requests, mount_tasks, query_value, settle, signed_in, task_json,
    titles,
};

#[tokio::test]
async fn first_load_requests_page_one_with_configured_size() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(1, "Ada", "Plan")]), 1).await;

    let options = ListOptions {
        page_size: 3,
        debounce: Duration::from_millis(500),
    };
    let mut app = App::with_client(client_for(&server.uri()), signed_in("tok"), options);
    settle(&mut app).await;

    let requests = list_requests(&server).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(query_value(&requests[0], "_page").as_deref(), Some("1"));
    assert_eq!(query_value(&requests[0], "_limit").as_deref(), Some("3"));
    assert_eq!(query_value(&requests[0], "title_like"), None);
    assert_eq!(titles(&app), vec!["Plan"]);
}

#[tokio::test]
async fn burst_of_keystrokes_sends_one_search() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(1, "Ada", "abc")]), 1).await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;
    app.set_focus(Focus::Search);

    let t0 = Instant::now();
    app.insert_char_at('a', t0);
    app.insert_char_at('b', t0 + Duration::from_millis(100));
    app.insert_char_at('c', t0 + Duration::from_millis(200));

    // Still inside the quiet period of the last keystroke.
    app.tick_at(t0 + Duration::from_millis(600));
    assert!(!app.has_pending_work());

    app.tick_at(t0 + Duration::from_millis(700));
    settle(&mut app).await;

    let searches: Vec<_> = list_requests(&server)
        .await
        .iter()
        .filter_map(|request| query_value(request, "title_like"))
        .collect();
    assert_eq!(searches, vec!["abc"]);
}

#[tokio::test]
async fn typing_back_to_the_settled_term_sends_nothing() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([]), 0).await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;
    app.set_focus(Focus::Search);

    let t0 = Instant::now();
    app.insert_char_at('x', t0);
    app.backspace_at(t0 + Duration::from_millis(50));
    app.tick_at(t0 + Duration::from_secs(2));
    settle(&mut app).await;

    assert_eq!(list_requests(&server).await.len(), 1);
}

#[tokio::test]
async fn revisiting_a_page_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_tasks(&server, json!([task_json(1, "Ada", "one")]), 12).await;

    let mut app = app_for(&server, signed_in("tok"));
    settle(&mut app).await;
    assert_eq!(
        app.tasks().pagination().map(|p| p.label()).as_deref(),
        Some("Page 1 of 3")
    );

    app.next_page();
    settle(&mut app).await;
    app.previous_page();
    settle(&mut app).await;

    let pages: Vec<_> = list_requests(&server)
        .await
        .iter()
        .filter_map(|request| query_value(request, "_page"))
        .collect();
    assert_eq!(pages, vec!["1", "2"]);
    assert_eq!(app.tasks().page(), 1);
}

#[test]
fn superseded_result_never_lands() {
    let mut cache = QueryCache::new();
    let key = QueryKey::new("", 1, 5);

    let first = cache.request(&key).expect("first fetch");
    cache.invalidate_all();
    let second = cache.request(&key).expect("refetch after invalidation");
    assert!(second.request_id > first.request_id);

    let newer = TaskPage {
        tasks: Vec::new(),
        total: 7,
    };
    assert_eq!(cache.resolve(&second, Ok(newer)), FetchOutcome::Applied);
    assert_eq!(
        cache.resolve(&first, Err("late failure".to_string())),
        FetchOutcome::Discarded
    );

    match cache.view(&key) {
        ListView::Ready { page, refreshing } => {
            assert_eq!(page.total, 7);
            assert!(!refreshing);
        }
        other => panic!("expected ready view, got {other:?}"),
    }
}
