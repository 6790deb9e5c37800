//! Debounced, staleness-guarded query controller for paginated listings.
//!
//! Text/filter mutations are coalesced on the trailing edge of a debounce
//! window and reset the page to 1; page changes fetch immediately (paging
//! is a discrete action, not typing). Every issued fetch carries a
//! monotonically increasing sequence number and a response is applied only
//! while its number is still the latest issued, so a slow early response
//! can never overwrite a fresher one.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::ApiResult;
use crate::state::Observed;
use crate::types::{Page, ResourceQuery};

type FetchFn<T> =
    Arc<dyn Fn(ResourceQuery) -> BoxFuture<'static, ApiResult<Page<T>>> + Send + Sync>;

pub struct QueryController<T> {
    query: ResourceQuery,
    fetch: FetchFn<T>,
    results: Observed<Option<Page<T>>>,
    last_error: Observed<Option<String>>,
    latest_seq: Arc<AtomicU64>,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
    active: Arc<AtomicBool>,
}

impl<T: Clone + Send + 'static> QueryController<T> {
    pub fn new<F>(debounce: Duration, fetch: F) -> Self
    where
        F: Fn(ResourceQuery) -> BoxFuture<'static, ApiResult<Page<T>>> + Send + Sync + 'static,
    {
        Self {
            query: ResourceQuery::default(),
            fetch: Arc::new(fetch),
            results: Observed::new(None),
            last_error: Observed::new(None),
            latest_seq: Arc::new(AtomicU64::new(0)),
            debounce,
            pending: None,
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Shared handle to the last successfully applied page.
    pub fn results(&self) -> Observed<Option<Page<T>>> {
        self.results.clone()
    }

    /// Shared handle to the last fetch error message; cleared on success.
    pub fn last_error(&self) -> Observed<Option<String>> {
        self.last_error.clone()
    }

    pub fn query(&self) -> &ResourceQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search == self.query.search {
            return;
        }
        self.query.search = search;
        self.filter_changed();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        if category == self.query.category {
            return;
        }
        self.query.category = category;
        self.filter_changed();
    }

    pub fn set_protocol(&mut self, protocol: Option<String>) {
        if protocol == self.query.protocol {
            return;
        }
        self.query.protocol = protocol;
        self.filter_changed();
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        if kind == self.query.kind {
            return;
        }
        self.query.kind = kind;
        self.filter_changed();
    }

    /// Discrete pagination: fetch immediately, no debounce. A pending
    /// debounced fetch is cancelled; it would carry the same, newer query.
    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if page == self.query.page {
            return;
        }
        self.query.page = page;
        self.issue_now();
    }

    /// Page size is a discrete control too; changing it restarts at page 1.
    pub fn set_limit(&mut self, limit: u32) {
        let limit = limit.max(1);
        if limit == self.query.limit {
            return;
        }
        self.query.limit = limit;
        self.query.page = 1;
        self.issue_now();
    }

    /// Re-fetch with the current query, immediately.
    pub fn refresh(&mut self) {
        self.issue_now();
    }

    /// Tear down: cancel the pending fetch and ignore anything in flight.
    /// The results slot keeps its last value for the owner to discard.
    pub fn detach(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.cancel_pending();
    }

    fn filter_changed(&mut self) {
        self.query.page = 1;
        self.arm_debounce();
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    // Trailing edge: each change replaces the armed timer, so one fetch is
    // issued with the final query state once input goes quiet. Once the
    // delay elapses the request detaches; a superseded in-flight request is
    // not aborted, its response is discarded by the sequence guard.
    fn arm_debounce(&mut self) {
        self.cancel_pending();
        let wait = self.debounce;
        let query = self.query.clone();
        let fetch = self.fetch.clone();
        let results = self.results.clone();
        let last_error = self.last_error.clone();
        let latest_seq = self.latest_seq.clone();
        let active = self.active.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            tokio::spawn(issue(fetch, query, latest_seq, results, last_error, active));
        }));
    }

    fn issue_now(&mut self) {
        self.cancel_pending();
        let query = self.query.clone();
        let fetch = self.fetch.clone();
        let results = self.results.clone();
        let last_error = self.last_error.clone();
        let latest_seq = self.latest_seq.clone();
        let active = self.active.clone();
        tokio::spawn(issue(fetch, query, latest_seq, results, last_error, active));
    }
}

async fn issue<T: Clone + Send + 'static>(
    fetch: FetchFn<T>,
    query: ResourceQuery,
    latest_seq: Arc<AtomicU64>,
    results: Observed<Option<Page<T>>>,
    last_error: Observed<Option<String>>,
    active: Arc<AtomicBool>,
) {
    // tag at issue time, not at schedule time
    let seq = latest_seq.fetch_add(1, Ordering::SeqCst) + 1;
    log::debug!("[portalx][query] issue seq={seq} page={} search={:?}", query.page, query.search);

    let res = fetch(query).await;

    if !active.load(Ordering::SeqCst) || latest_seq.load(Ordering::SeqCst) != seq {
        log::debug!("[portalx][query] discarding stale response seq={seq}");
        return;
    }
    match res {
        Ok(page) => {
            results.set(Some(page));
            last_error.set(None);
        }
        Err(e) => {
            log::warn!("[portalx][query] fetch seq={seq} failed: {e}");
            last_error.set(Some(e.to_string()));
        }
    }
}

impl<T> Drop for QueryController<T> {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}
