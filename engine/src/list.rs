//! Task list synchronization.
//!
//! [`QueryCache`] maps each [`QueryKey`] to the last result fetched for it.
//! Every fetch is stamped with a request id from a single counter; a result
//! lands only if its id is still the newest one issued for its key. The
//! table renders the entry of the *current* key, so a slow response for a
//! key the user has moved away from never shows up in place of the new one.
//!
//! [`TaskList`] owns the query state around the cache: the search box, its
//! debouncer, the page number and the column sort.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::debug;

use taskdesk_types::{DraftInput, Pagination, QueryKey, SortColumn, SortState, Task, TaskPage};

use crate::debounce::Debouncer;

pub type RequestId = u64;

/// Keys kept in the cache before the least recently fetched is evicted.
pub const MAX_CACHED_KEYS: usize = 32;

/// Never issued; an entry carrying it matches no outstanding ticket.
const ORPHANED: RequestId = 0;

/// A fetch the caller must perform and report back through
/// [`QueryCache::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: QueryKey,
    pub request_id: RequestId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer request for the same key was issued after this one.
    Discarded,
}

#[derive(Debug, Default)]
struct CacheEntry {
    data: Option<TaskPage>,
    error: Option<String>,
    latest_request: RequestId,
    in_flight: bool,
    stale: bool,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        !self.stale && self.error.is_none() && self.data.is_some()
    }
}

/// What the table should show for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
    /// Nothing to show yet.
    Loading,
    Error,
    Ready {
        page: &'a TaskPage,
        /// An invalidated entry is being refetched behind the shown rows.
        refreshing: bool,
    },
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
    next_request_id: RequestId,
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `key` unless a fresh result or an outstanding
    /// request already covers it.
    ///
    /// An entry in the error state is refetched: reaching a key again always
    /// re-enters loading.
    pub fn request(&mut self, key: &QueryKey) -> Option<FetchTicket> {
        if let Some(entry) = self.entries.get(key)
            && (entry.in_flight || entry.is_fresh())
        {
            return None;
        }
        Some(self.issue(key))
    }

    fn issue(&mut self, key: &QueryKey) -> FetchTicket {
        if !self.entries.contains_key(key) {
            self.evict_for_insert();
        }
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let entry = self.entries.entry(key.clone()).or_default();
        entry.latest_request = request_id;
        entry.in_flight = true;
        entry.error = None;
        debug!(%key, request_id, "Fetch issued");
        FetchTicket {
            key: key.clone(),
            request_id,
        }
    }

    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        result: Result<TaskPage, String>,
    ) -> FetchOutcome {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return FetchOutcome::Discarded;
        };
        if entry.latest_request != ticket.request_id {
            debug!(
                key = %ticket.key,
                request_id = ticket.request_id,
                latest = entry.latest_request,
                "Superseded fetch result discarded"
            );
            return FetchOutcome::Discarded;
        }
        entry.in_flight = false;
        entry.stale = false;
        match result {
            Ok(page) => {
                entry.data = Some(page);
                entry.error = None;
                FetchOutcome::Applied
            }
            Err(message) => {
                entry.error = Some(message);
                FetchOutcome::Failed
            }
        }
    }

    /// Make room for one more key by dropping the least recently fetched
    /// entry that has no request outstanding.
    fn evict_for_insert(&mut self) {
        if self.entries.len() < MAX_CACHED_KEYS {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.in_flight)
            .min_by_key(|(_, entry)| entry.latest_request)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            debug!(%key, "Evicting cached task list");
            self.entries.remove(&key);
        }
    }

    /// Mark every entry stale and orphan outstanding requests, so results
    /// fetched before a mutation never land. Entries without rows to keep
    /// showing are dropped.
    pub fn invalidate_all(&mut self) {
        self.entries.retain(|_, entry| entry.data.is_some());
        for entry in self.entries.values_mut() {
            entry.stale = true;
            entry.in_flight = false;
            entry.latest_request = ORPHANED;
        }
        debug!(entries = self.entries.len(), "Task list cache invalidated");
    }

    /// Drop every entry. The request counter keeps running, so results of
    /// requests issued before the clear can never match a new entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn view(&self, key: &QueryKey) -> ListView<'_> {
        let Some(entry) = self.entries.get(key) else {
            return ListView::Loading;
        };
        if entry.error.is_some() {
            return ListView::Error;
        }
        match &entry.data {
            Some(page) => ListView::Ready {
                page,
                refreshing: entry.in_flight,
            },
            None => ListView::Loading,
        }
    }

    #[must_use]
    pub fn error(&self, key: &QueryKey) -> Option<&str> {
        self.entries.get(key).and_then(|entry| entry.error.as_deref())
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|entry| entry.in_flight)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Query state for the task table plus its cache.
#[derive(Debug)]
pub struct TaskList {
    search: DraftInput,
    debounced: Debouncer<String>,
    page: u32,
    page_size: u32,
    sort: SortState,
    selected: usize,
    cache: QueryCache,
}

impl TaskList {
    #[must_use]
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        Self {
            search: DraftInput::default(),
            debounced: Debouncer::new(String::new(), debounce),
            page: 1,
            page_size: page_size.max(1),
            sort: SortState::default(),
            selected: 0,
            cache: QueryCache::new(),
        }
    }

    /// Back to page 1 with an empty search and no cached pages.
    pub fn reset(&mut self) {
        self.search.clear();
        self.debounced = Debouncer::new(String::new(), self.debounced.delay());
        self.page = 1;
        self.sort.clear();
        self.selected = 0;
        self.cache.clear();
    }

    /// The fetch key: debounced search, never the raw box contents.
    #[must_use]
    pub fn key(&self) -> QueryKey {
        QueryKey::new(self.debounced.value().clone(), self.page, self.page_size)
    }

    #[must_use]
    pub fn search(&self) -> &DraftInput {
        &self.search
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache {
        &mut self.cache
    }

    /// Type into the search box. A leading space on an empty box is dropped.
    ///
    /// Returns whether the box changed.
    pub fn search_char(&mut self, c: char, now: Instant) -> bool {
        if self.search.is_empty() && c.is_whitespace() {
            return false;
        }
        self.search.enter_char(c);
        self.debounced.input(self.search.text().to_string(), now);
        true
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if self.search.cursor() == 0 {
            return;
        }
        self.search.delete_char();
        self.debounced.input(self.search.text().to_string(), now);
    }

    pub fn search_delete(&mut self, now: Instant) {
        let before = self.search.grapheme_count();
        self.search.delete_char_forward();
        if self.search.grapheme_count() != before {
            self.debounced.input(self.search.text().to_string(), now);
        }
    }

    pub fn search_clear(&mut self, now: Instant) {
        if self.search.is_empty() {
            return;
        }
        self.search.clear();
        self.debounced.input(String::new(), now);
    }

    pub fn search_cursor_left(&mut self) {
        self.search.move_cursor_left();
    }

    pub fn search_cursor_right(&mut self) {
        self.search.move_cursor_right();
    }

    /// Apply a settled search term. Returns true if the fetch key changed.
    pub fn poll_debounce(&mut self, now: Instant) -> bool {
        if self.debounced.poll(now).is_none() {
            return false;
        }
        self.page = 1;
        self.selected = 0;
        debug!(search = %self.debounced.value(), "Search settled");
        true
    }

    #[must_use]
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debounced.deadline()
    }

    #[must_use]
    pub fn view(&self) -> ListView<'_> {
        self.cache.view(&self.key())
    }

    /// Pager state for the current key. `None` until the key has rows.
    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        match self.view() {
            ListView::Ready { page, .. } => {
                Some(Pagination::new(self.page, self.page_size, page.total))
            }
            ListView::Loading | ListView::Error => None,
        }
    }

    /// Returns true if the page changed.
    pub fn next_page(&mut self) -> bool {
        let Some(pagination) = self.pagination() else {
            return false;
        };
        if !pagination.can_next() {
            return false;
        }
        self.set_page(pagination.next_page())
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.set_page(self.page - 1)
    }

    fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if page == self.page {
            return false;
        }
        self.page = page;
        self.selected = 0;
        true
    }

    pub fn toggle_sort(&mut self, column: SortColumn) {
        self.sort.toggle(column);
    }

    /// Rows of the current page in display order.
    #[must_use]
    pub fn rows(&self) -> Vec<&Task> {
        match self.view() {
            ListView::Ready { page, .. } => self.sort.apply(&page.tasks),
            ListView::Loading | ListView::Error => Vec::new(),
        }
    }

    #[must_use]
    pub fn selected_index(&self) -> usize {
        self.selected.min(self.rows().len().saturating_sub(1))
    }

    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        let rows = self.rows();
        rows.get(self.selected_index()).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = (self.selected_index() + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected_index().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use taskdesk_types::{SortDirection, TaskDraft, TaskId};

    use super::*;

    fn page_of(titles: &[&str], total: u64) -> TaskPage {
        TaskPage {
            tasks: titles
                .iter()
                .enumerate()
                .map(|(i, title)| {
                    Task::from_draft(TaskId::Number(i as u64), TaskDraft::new("n", *title, "d"))
                })
                .collect(),
            total,
        }
    }

    fn titles(view: ListView<'_>) -> Vec<String> {
        match view {
            ListView::Ready { page, .. } => page.tasks.iter().map(|t| t.title.clone()).collect(),
            other => panic!("expected rows, got {other:?}"),
        }
    }

    #[test]
    fn first_request_issues_and_repeat_is_suppressed() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let ticket = cache.request(&key).unwrap();
        assert_eq!(cache.view(&key), ListView::Loading);
        assert!(cache.request(&key).is_none(), "in flight");

        assert_eq!(
            cache.resolve(&ticket, Ok(page_of(&["a"], 1))),
            FetchOutcome::Applied
        );
        assert!(cache.request(&key).is_none(), "fresh entry is reused");
        assert_eq!(titles(cache.view(&key)), vec!["a"]);
    }

    #[test]
    fn request_ids_increase_monotonically() {
        let mut cache = QueryCache::new();
        let a = cache.request(&QueryKey::new("", 1, 5)).unwrap();
        let b = cache.request(&QueryKey::new("", 2, 5)).unwrap();
        assert!(b.request_id > a.request_id);
    }

    #[test]
    fn late_result_for_old_key_never_replaces_current_key() {
        let mut cache = QueryCache::new();
        let k1 = QueryKey::new("a", 1, 5);
        let k2 = QueryKey::new("ab", 1, 5);
        let t1 = cache.request(&k1).unwrap();
        let t2 = cache.request(&k2).unwrap();

        cache.resolve(&t2, Ok(page_of(&["k2"], 1)));
        cache.resolve(&t1, Ok(page_of(&["k1"], 1)));

        assert_eq!(titles(cache.view(&k2)), vec!["k2"]);
    }

    #[test]
    fn superseded_request_for_same_key_is_discarded() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let old = cache.request(&key).unwrap();
        cache.invalidate_all();
        let new = cache.request(&key).unwrap();

        assert_eq!(
            cache.resolve(&new, Ok(page_of(&["new"], 1))),
            FetchOutcome::Applied
        );
        assert_eq!(
            cache.resolve(&old, Ok(page_of(&["old"], 1))),
            FetchOutcome::Discarded
        );
        assert_eq!(titles(cache.view(&key)), vec!["new"]);
    }

    #[test]
    fn error_is_terminal_until_key_is_requested_again() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let ticket = cache.request(&key).unwrap();
        assert_eq!(
            cache.resolve(&ticket, Err("boom".into())),
            FetchOutcome::Failed
        );
        assert_eq!(cache.view(&key), ListView::Error);
        assert_eq!(cache.error(&key), Some("boom"));

        // Re-entering the key goes back to loading.
        assert!(cache.request(&key).is_some());
        assert_eq!(cache.view(&key), ListView::Loading);
    }

    #[test]
    fn invalidation_keeps_rows_visible_while_refetching() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let ticket = cache.request(&key).unwrap();
        cache.resolve(&ticket, Ok(page_of(&["a"], 1)));

        cache.invalidate_all();
        let refetch = cache.request(&key).expect("stale entry refetches");
        assert!(matches!(
            cache.view(&key),
            ListView::Ready {
                refreshing: true,
                ..
            }
        ));

        cache.resolve(&refetch, Ok(page_of(&["a", "b"], 2)));
        assert_eq!(titles(cache.view(&key)), vec!["a", "b"]);
    }

    #[test]
    fn result_fetched_before_invalidation_is_discarded() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let first = cache.request(&key).unwrap();
        cache.resolve(&first, Ok(page_of(&["a", "b"], 2)));

        let before_mutation = cache.request(&key);
        assert!(before_mutation.is_none(), "fresh entry is reused");

        cache.invalidate_all();
        let pending = cache.request(&key).unwrap();
        cache.invalidate_all();

        assert_eq!(
            cache.resolve(&pending, Ok(page_of(&["a", "b"], 2))),
            FetchOutcome::Discarded
        );
        let refetch = cache.request(&key).expect("entry is still stale");
        assert_eq!(
            cache.resolve(&refetch, Ok(page_of(&["a"], 1))),
            FetchOutcome::Applied
        );
        assert_eq!(titles(cache.view(&key)), vec!["a"]);
    }

    #[test]
    fn in_flight_fetch_for_unloaded_key_is_orphaned_by_invalidation() {
        let mut cache = QueryCache::new();
        let page_one = QueryKey::new("", 1, 5);
        let page_two = QueryKey::new("", 2, 5);
        let one = cache.request(&page_one).unwrap();
        cache.resolve(&one, Ok(page_of(&["a"], 6)));
        let two = cache.request(&page_two).unwrap();

        cache.invalidate_all();
        assert_eq!(
            cache.resolve(&two, Ok(page_of(&["deleted"], 6))),
            FetchOutcome::Discarded
        );
        assert!(cache.request(&page_two).is_some());
        assert_eq!(cache.view(&page_two), ListView::Loading);
    }

    #[test]
    fn invalidation_drops_entries_without_rows() {
        let mut cache = QueryCache::new();
        let failed = QueryKey::new("x", 1, 5);
        let loaded = QueryKey::new("", 1, 5);
        let ticket = cache.request(&failed).unwrap();
        cache.resolve(&ticket, Err("boom".into()));
        let ticket = cache.request(&loaded).unwrap();
        cache.resolve(&ticket, Ok(page_of(&["a"], 1)));

        cache.invalidate_all();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.view(&failed), ListView::Loading);
    }

    #[test]
    fn cache_evicts_least_recently_fetched_key() {
        let mut cache = QueryCache::new();
        let last = u32::try_from(MAX_CACHED_KEYS).unwrap() + 1;
        let keys: Vec<QueryKey> = (1..=last)
            .map(|page| QueryKey::new("", page, 5))
            .collect();
        for key in &keys[..MAX_CACHED_KEYS] {
            let ticket = cache.request(key).unwrap();
            cache.resolve(&ticket, Ok(page_of(&["a"], 1)));
        }
        assert_eq!(cache.len(), MAX_CACHED_KEYS);

        cache.request(&keys[MAX_CACHED_KEYS]).unwrap();
        assert_eq!(cache.len(), MAX_CACHED_KEYS);
        assert_eq!(cache.view(&keys[0]), ListView::Loading);
        assert!(cache.is_in_flight(&keys[MAX_CACHED_KEYS]));
    }

    #[test]
    fn cleared_cache_rejects_old_tickets() {
        let mut cache = QueryCache::new();
        let key = QueryKey::new("", 1, 5);
        let old = cache.request(&key).unwrap();
        cache.clear();
        let new = cache.request(&key).unwrap();
        assert_ne!(old.request_id, new.request_id);
        assert_eq!(
            cache.resolve(&old, Ok(page_of(&["old"], 1))),
            FetchOutcome::Discarded
        );
        assert_eq!(cache.view(&key), ListView::Loading);
    }

    #[test]
    fn typing_only_changes_key_after_debounce() {
        let start = Instant::now();
        let mut list = TaskList::new(5, Duration::from_millis(500));
        for (i, c) in "abc".chars().enumerate() {
            list.search_char(c, start + Duration::from_millis(100 * i as u64));
            assert_eq!(list.key().search, "");
        }
        assert!(!list.poll_debounce(start + Duration::from_millis(600)));
        assert!(list.poll_debounce(start + Duration::from_millis(700)));
        assert_eq!(list.key(), QueryKey::new("abc", 1, 5));
    }

    #[test]
    fn leading_space_on_empty_search_is_ignored() {
        let now = Instant::now();
        let mut list = TaskList::new(5, Duration::from_millis(500));
        assert!(!list.search_char(' ', now));
        assert!(list.search().is_empty());
        assert!(list.search_char('a', now));
        assert!(list.search_char(' ', now));
        assert_eq!(list.search().text(), "a ");
    }

    #[test]
    fn settled_search_resets_page() {
        let start = Instant::now();
        let mut list = TaskList::new(5, Duration::from_millis(500));
        let key = list.key();
        let ticket = list.cache_mut().request(&key).unwrap();
        list.cache_mut()
            .resolve(&ticket, Ok(page_of(&["a", "b", "c", "d", "e"], 12)));
        assert!(list.next_page());
        assert_eq!(list.page(), 2);

        list.search_char('x', start);
        assert!(list.poll_debounce(start + Duration::from_secs(1)));
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn pager_bounds_follow_total() {
        let mut list = TaskList::new(5, Duration::from_millis(500));
        assert!(!list.next_page(), "no data yet");
        assert!(!list.previous_page(), "already on page 1");

        for expected in 1..=3 {
            let key = list.key();
            if let Some(ticket) = list.cache_mut().request(&key) {
                list.cache_mut()
                    .resolve(&ticket, Ok(page_of(&["a"], 12)));
            }
            assert_eq!(list.page(), expected);
            let pagination = list.pagination().unwrap();
            assert_eq!(pagination.total_pages(), 3);
            list.next_page();
        }
        assert_eq!(list.page(), 3);
        assert!(!list.next_page());
        assert!(list.previous_page());
        assert_eq!(list.page(), 2);
    }

    #[test]
    fn rows_follow_sort_and_selection_clamps() {
        let mut list = TaskList::new(5, Duration::from_millis(500));
        let key = list.key();
        let ticket = list.cache_mut().request(&key).unwrap();
        list.cache_mut()
            .resolve(&ticket, Ok(page_of(&["b", "c", "a"], 3)));

        list.toggle_sort(SortColumn::Title);
        assert_eq!(
            list.sort().direction_of(SortColumn::Title),
            Some(SortDirection::Ascending)
        );
        let ordered: Vec<_> = list.rows().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(ordered, vec!["a", "b", "c"]);

        for _ in 0..10 {
            list.select_next();
        }
        assert_eq!(list.selected_index(), 2);
        assert_eq!(list.selected_task().unwrap().title, "c");
        list.select_previous();
        assert_eq!(list.selected_task().unwrap().title, "b");
    }
}
