//! Harness for driving an [`App`] against a mock task API.
//!
//! Available to this crate's tests and, through the `test-harness` feature,
//! to the workspace integration and rendering tests.

use std::time::{Duration, Instant};

use url::Url;

use taskdesk_client::{ApiClient, SessionContext};

use crate::{App, ListOptions};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

/// Client pointing both the task API and the auth API at `uri`.
///
/// # Panics
///
/// If `uri` is not an absolute URL.
#[must_use]
pub fn client_for(uri: &str) -> ApiClient {
    let base = Url::parse(&format!("{uri}/")).expect("mock server uri");
    ApiClient::new(base.clone(), base, Duration::from_secs(5)).expect("client")
}

/// An in-memory session already holding `token`.
///
/// # Panics
///
/// Never in practice; the in-memory store does not fail.
#[must_use]
pub fn signed_in(token: &str) -> SessionContext {
    let session = SessionContext::in_memory();
    session.set_token(token).expect("in-memory store");
    session
}

#[must_use]
pub fn app_for(uri: &str, session: SessionContext) -> App {
    App::with_client(client_for(uri), session, ListOptions::default())
}

/// Tick until no request is outstanding and no fetch is queued.
///
/// # Panics
///
/// If the app is still busy after five seconds.
pub async fn settle(app: &mut App) {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    loop {
        app.tick();
        if !app.has_pending_work() {
            return;
        }
        assert!(Instant::now() < deadline, "requests did not settle");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Titles of the rows on screen, in display order.
#[must_use]
pub fn titles(app: &App) -> Vec<String> {
    app.tasks()
        .rows()
        .into_iter()
        .map(|task| task.title.clone())
        .collect()
}
