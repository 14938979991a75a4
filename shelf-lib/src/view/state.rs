//! The collection state container.

use crate::api::ItemsRequest;
use crate::error::Error;
use crate::model::Item;
use crate::model::ItemId;
use crate::model::ItemPage;

use super::ViewConfig;
use super::cursor::PageCursor;
use super::order::Order;
use super::order::arrange_by;
use super::selection::Selection;
use super::window::PrefetchPolicy;
use super::window::ScrollProgress;
use super::window::Window;

/// Lifecycle of the view.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the restore or fresh initial load. Nothing is persisted yet.
    #[default]
    Initializing,
    /// Initialized; every mutation is persisted.
    Ready,
}

/// What a page request is for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchKind {
    /// First page of a session with nothing persisted. Adopts the server's selection.
    Initial,
    /// Reload of a persisted order. Adopts the persisted selection.
    Restore {
        ids: Vec<ItemId>,
        selected: Vec<ItemId>,
    },
    /// First page after the query changed or an explicit reset.
    Reset,
    /// Next page of the current query.
    Append,
}

/// A page request issued against a specific generation of the state.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
    request: ItemsRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn kind(&self) -> &FetchKind {
        &self.kind
    }

    pub fn request(&self) -> &ItemsRequest {
        &self.request
    }
}

/// Result of a page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was applied.
    Applied {
        /// Items the page added to the order.
        loaded: usize,
        /// The selection was replaced along with the order.
        selection_changed: bool,
        /// This fetch finished initialization.
        completed_start: bool,
    },
    /// No request was made: nothing more to load, or a fetch is already in flight.
    Skipped,
    /// The response belonged to a superseded generation and was dropped.
    Stale,
}

/// An applied reorder, to be confirmed remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderChange {
    pub previous: Vec<ItemId>,
    pub new_order: Vec<ItemId>,
    pub revision: u64,
}

/// An applied selection change, to be confirmed remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionChange {
    pub id: ItemId,
    pub selected: bool,
    pub revision: u64,
}

/// A materialized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub index: usize,
    /// Top edge in pixels.
    pub top: u64,
    pub item: Item,
    pub selected: bool,
}

/// A consistent copy of the state for rendering or inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub phase: Phase,
    pub query: String,
    pub items: Vec<Item>,
    pub selected: Vec<ItemId>,
    pub offset: usize,
    pub total: usize,
    pub has_more: bool,
    pub loading: bool,
    pub scroll_offset: u32,
    pub last_error: Option<String>,
}

/// Order, selection, pagination cursor, query and scroll window in one place.
///
/// All methods are synchronous transitions; callers hold the container
/// exclusively while one runs, so a render never sees a half-applied change.
/// Fetches are split into `begin_*` (issues a [`FetchTicket`]) and
/// [`complete_fetch`](Self::complete_fetch) / [`fail_fetch`](Self::fail_fetch),
/// with the network call in between.
#[derive(Debug)]
pub struct CollectionState {
    config: ViewConfig,
    order: Order,
    selection: Selection,
    cursor: PageCursor,
    window: Window,
    prefetch: PrefetchPolicy,
    /// Most recently requested query.
    query: String,
    /// Query the loaded order belongs to. Differs from `query` while a reset
    /// is outstanding or after one failed.
    applied_query: String,
    phase: Phase,
    /// Bumped by every reset; responses of older generations are dropped.
    generation: u64,
    /// Generation of the fetch currently outstanding.
    in_flight: Option<u64>,
    order_revision: u64,
    last_error: Option<String>,
}

impl CollectionState {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            order: Order::new(),
            selection: Selection::new(),
            cursor: PageCursor::new(config.page_size),
            window: Window::new(config.row_height, config.viewport_height, config.overscan),
            prefetch: PrefetchPolicy::new(config.row_height, config.page_size, config.overscan),
            query: String::new(),
            applied_query: String::new(),
            phase: Phase::Initializing,
            generation: 0,
            in_flight: None,
            order_revision: 0,
            last_error: None,
            config,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Query of the currently loaded order.
    pub fn applied_query(&self) -> &str {
        &self.applied_query
    }

    /// Check if the requested query still needs a reset fetch: nothing for it
    /// is in flight and the loaded order belongs to another query.
    pub fn is_query_pending(&self) -> bool {
        self.is_ready() && !self.is_loading() && self.query != self.applied_query
    }

    /// Whether the next page of the loaded order can be requested now.
    fn can_append(&self) -> bool {
        self.cursor.has_more() && !self.is_loading() && self.query == self.applied_query
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn cursor(&self) -> &PageCursor {
        &self.cursor
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight == Some(self.generation)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            query: self.query.clone(),
            items: self.order.items().to_vec(),
            selected: self.selection.selected(),
            offset: self.cursor.offset(),
            total: self.cursor.total(),
            has_more: self.cursor.has_more(),
            loading: self.is_loading(),
            scroll_offset: self.window.offset(),
            last_error: self.last_error.clone(),
        }
    }

    /// Rows inside the scroll window, overscan included.
    pub fn visible_rows(&self) -> Vec<Row> {
        let range = self.window.materialized_range(self.order.len());
        self.order.items()[range.clone()]
            .iter()
            .zip(range)
            .map(|(item, index)| Row {
                index,
                top: self.window.row_top(index),
                item: item.clone(),
                selected: self.selection.is_selected(item.id),
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Fetch transitions
    // -------------------------------------------------------------------------

    /// Starts initialization.
    ///
    /// With a persisted `(order, selection)` the restore path requests exactly
    /// those ids; otherwise the first page of the current query is requested.
    pub fn begin_start(
        &mut self,
        persisted: Option<(Vec<ItemId>, Vec<ItemId>)>,
    ) -> Result<FetchTicket, Error> {
        if self.is_ready() {
            return Err(Error::AlreadyStarted);
        }
        let page_size = self.cursor.page_size();
        let (kind, request) = match persisted {
            Some((ids, selected)) => {
                let request = ItemsRequest::page(0, page_size).ids(ids.clone());
                (FetchKind::Restore { ids, selected }, request)
            }
            None => (
                FetchKind::Initial,
                ItemsRequest::page(0, page_size).search(self.query.clone()),
            ),
        };
        Ok(self.issue(kind, request))
    }

    /// Issues a page request for the current query.
    ///
    /// A reset always goes out and supersedes any outstanding fetch. A next-page
    /// request returns `None` when nothing more can be loaded, one is already
    /// in flight, or the requested query has not been loaded yet.
    pub fn begin_fetch(&mut self, reset: bool) -> Result<Option<FetchTicket>, Error> {
        if !self.is_ready() {
            return Err(Error::NotStarted);
        }
        let page_size = self.cursor.page_size();
        if reset {
            let request = ItemsRequest::page(0, page_size).search(self.query.clone());
            return Ok(Some(self.issue(FetchKind::Reset, request)));
        }
        if !self.can_append() {
            return Ok(None);
        }
        let request =
            ItemsRequest::page(self.cursor.offset(), page_size).search(self.applied_query.clone());
        let ticket = FetchTicket {
            generation: self.generation,
            kind: FetchKind::Append,
            request,
        };
        self.in_flight = Some(self.generation);
        Ok(Some(ticket))
    }

    fn issue(&mut self, kind: FetchKind, request: ItemsRequest) -> FetchTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        FetchTicket {
            generation: self.generation,
            kind,
            request,
        }
    }

    /// Applies a page received for `ticket`.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, page: ItemPage) -> FetchOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping stale page (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return FetchOutcome::Stale;
        }
        self.in_flight = None;
        self.last_error = None;
        self.order_revision += 1;

        let (items, total, server_selected) = page.into_parts();
        let fetched_at = ticket.request.offset;
        let fetched_query = ticket.request.search.clone().unwrap_or_default();

        match ticket.kind {
            FetchKind::Initial => {
                self.applied_query = fetched_query;
                self.order.replace(items);
                self.selection.replace(server_selected);
                self.cursor.settle(fetched_at, total);
                self.window.reset();
                self.phase = Phase::Ready;
                FetchOutcome::Applied {
                    loaded: self.order.len(),
                    selection_changed: true,
                    completed_start: true,
                }
            }
            FetchKind::Restore { ids, selected } => {
                // A restored order is unfiltered.
                self.applied_query = String::new();
                self.order.replace(arrange_by(&ids, items));
                self.selection.replace(selected);
                self.cursor.settle(fetched_at, total);
                self.window.reset();
                self.phase = Phase::Ready;
                FetchOutcome::Applied {
                    loaded: self.order.len(),
                    selection_changed: true,
                    completed_start: true,
                }
            }
            FetchKind::Reset => {
                self.applied_query = fetched_query;
                self.order.replace(items);
                self.cursor.settle(fetched_at, total);
                self.window.reset();
                FetchOutcome::Applied {
                    loaded: self.order.len(),
                    selection_changed: false,
                    completed_start: false,
                }
            }
            FetchKind::Append => {
                let loaded = self.order.append(items);
                self.cursor.settle(fetched_at, total);
                FetchOutcome::Applied {
                    loaded,
                    selection_changed: false,
                    completed_start: false,
                }
            }
        }
    }

    /// Records a failed fetch. Order, cursor and the applied query are left as
    /// they were; a failed reset can be retried with the same query.
    ///
    /// Returns `false` if the ticket was already superseded.
    pub fn fail_fetch(&mut self, ticket: &FetchTicket, error: &Error) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight = None;
        self.last_error = Some(error.to_string());
        true
    }

    // -------------------------------------------------------------------------
    // Query and scrolling
    // -------------------------------------------------------------------------

    /// Changes the search query.
    ///
    /// Returns the reset fetch to run, if the query changed after initialization
    /// or its last reset failed. Before initialization the query is only
    /// recorded and picked up by the initial load.
    pub fn set_query(&mut self, query: impl Into<String>) -> Result<Option<FetchTicket>, Error> {
        let query = query.into();
        if query == self.query && (!self.is_ready() || !self.is_query_pending()) {
            return Ok(None);
        }
        self.query = query;
        if !self.is_ready() {
            return Ok(None);
        }
        self.begin_fetch(true)
    }

    pub fn scroll_to(&mut self, offset: u32) -> ScrollProgress {
        self.window.scroll_to(offset, self.order.len())
    }

    pub fn set_viewport_height(&mut self, viewport_height: u32) {
        self.window.set_viewport_height(viewport_height, self.order.len());
    }

    /// Whether `progress` should load the next page right now.
    pub fn should_prefetch(&self, progress: ScrollProgress) -> bool {
        self.is_ready()
            && self.can_append()
            && self.prefetch.should_prefetch(
                progress,
                self.order.len(),
                self.window.viewport_height(),
            )
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Drag end: moves the item at `source` to `destination`.
    ///
    /// `None` destination means the drag was cancelled.
    pub fn reorder(
        &mut self,
        source: usize,
        destination: Option<usize>,
    ) -> Result<Option<OrderChange>, Error> {
        if !self.is_ready() {
            return Err(Error::NotStarted);
        }
        let Some(destination) = destination else {
            return Ok(None);
        };
        let previous = self.order.ids();
        if self.order.move_item(source, destination).is_none() {
            return Ok(None);
        }
        self.order_revision += 1;
        Ok(Some(OrderChange {
            previous,
            new_order: self.order.ids(),
            revision: self.order_revision,
        }))
    }

    /// Checkbox toggle.
    pub fn set_selected(
        &mut self,
        id: ItemId,
        selected: bool,
    ) -> Result<Option<SelectionChange>, Error> {
        if !self.is_ready() {
            return Err(Error::NotStarted);
        }
        Ok(self
            .selection
            .set(id, selected)
            .map(|revision| SelectionChange {
                id,
                selected,
                revision,
            }))
    }

    // -------------------------------------------------------------------------
    // Rollback of unconfirmed changes
    // -------------------------------------------------------------------------

    /// Reverts a selection change whose confirmation failed, unless superseded.
    pub fn rollback_selection(&mut self, change: &SelectionChange) -> bool {
        self.selection
            .rollback(change.id, change.selected, change.revision)
    }

    /// Reverts a reorder whose confirmation failed, unless the order changed since.
    pub fn rollback_order(&mut self, change: &OrderChange) -> bool {
        if self.order_revision != change.revision || !self.order.arrange(&change.previous) {
            return false;
        }
        self.order_revision += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::view::ScrollDirection;

    fn items(ids: impl IntoIterator<Item = ItemId>) -> Vec<Item> {
        ids.into_iter().map(|id| Item::new(id, format!("item {id}"))).collect()
    }

    fn ready_state(ids: impl IntoIterator<Item = ItemId>, total: usize) -> CollectionState {
        let mut state = CollectionState::new(ViewConfig::default());
        let ticket = state.begin_start(None).unwrap();
        state.complete_fetch(ticket, ItemPage::new(items(ids), total));
        state
    }

    #[test]
    fn test_initial_load_adopts_server_selection() {
        let mut state = CollectionState::new(ViewConfig::default());
        let ticket = state.begin_start(None).unwrap();
        assert_eq!(ticket.kind(), &FetchKind::Initial);
        assert_eq!(ticket.request(), &ItemsRequest::page(0, 20));

        let page = ItemPage::new(items(1..=20), 100).with_selected(vec![4, 7]);
        let outcome = state.complete_fetch(ticket, page);

        assert!(matches!(outcome, FetchOutcome::Applied { completed_start: true, .. }));
        assert!(state.is_ready());
        assert_eq!(state.selection().selected(), vec![4, 7]);
        assert_eq!(state.cursor().offset(), 20);
        assert!(state.cursor().has_more());
    }

    #[test]
    fn test_start_runs_once() {
        let mut state = ready_state(1..=3, 3);
        assert!(matches!(state.begin_start(None), Err(Error::AlreadyStarted)));
    }

    #[test]
    fn test_gestures_require_start() {
        let mut state = CollectionState::new(ViewConfig::default());
        assert!(matches!(state.set_selected(1, true), Err(Error::NotStarted)));
        assert!(matches!(state.reorder(0, Some(1)), Err(Error::NotStarted)));
        assert!(matches!(state.begin_fetch(false), Err(Error::NotStarted)));
    }

    #[test]
    fn test_restore_keeps_persisted_id_order() {
        let mut state = CollectionState::new(ViewConfig::default());
        let ticket = state.begin_start(Some((vec![5, 3, 9], vec![3]))).unwrap();
        assert_eq!(ticket.request().ids, Some(vec![5, 3, 9]));

        let page = ItemPage::new(items([3, 5, 9]), 3).with_selected(vec![9]);
        state.complete_fetch(ticket, page);

        assert_eq!(state.order().ids(), vec![5, 3, 9]);
        assert_eq!(state.selection().selected(), vec![3]);
        assert_eq!(state.cursor().offset(), 20);
        assert!(!state.cursor().has_more());
    }

    #[test]
    fn test_appends_advance_by_page() {
        let mut state = ready_state(1..=20, 50);
        for n in 2..=3 {
            let ticket = state.begin_fetch(false).unwrap().unwrap();
            assert_eq!(ticket.request().offset, (n - 1) * 20);
            let start = (n - 1) * 20 + 1;
            let end = (n * 20).min(50);
            state.complete_fetch(ticket, ItemPage::new(items(start as i64..=end as i64), 50));
        }
        assert_eq!(state.cursor().offset(), 60);
        assert_eq!(state.order().len(), 50);
        assert!(!state.cursor().has_more());
        assert!(state.begin_fetch(false).unwrap().is_none());
    }

    #[test]
    fn test_no_duplicate_fetch_while_in_flight() {
        let mut state = ready_state(1..=20, 100);
        let first = state.begin_fetch(false).unwrap();
        assert!(first.is_some());
        assert!(state.begin_fetch(false).unwrap().is_none());
        let near_end = ScrollProgress {
            offset: 200,
            direction: ScrollDirection::Forward,
        };
        assert!(!state.should_prefetch(near_end));
    }

    #[test]
    fn test_failed_fetch_leaves_state() {
        let mut state = ready_state(1..=20, 100);
        let ticket = state.begin_fetch(false).unwrap().unwrap();
        let error = Error::Api(ApiError::http(500, "boom"));
        assert!(state.fail_fetch(&ticket, &error));

        assert_eq!(state.order().len(), 20);
        assert_eq!(state.cursor().offset(), 20);
        assert!(!state.is_loading());
        assert_eq!(state.snapshot().last_error.as_deref(), Some("HTTP 500: boom"));
        // The same page can be requested again.
        assert_eq!(state.begin_fetch(false).unwrap().unwrap().request().offset, 20);
    }

    #[test]
    fn test_query_change_replaces_order_and_keeps_selection() {
        let mut state = ready_state(1..=20, 100);
        state.set_selected(2, true).unwrap();
        state.scroll_to(300);

        let ticket = state.set_query("foo").unwrap().unwrap();
        assert_eq!(ticket.request(), &ItemsRequest::page(0, 20).search("foo"));
        state.complete_fetch(ticket, ItemPage::new(items(101..=120), 30));

        assert_eq!(state.order().ids(), (101..=120).collect::<Vec<_>>());
        assert_eq!(state.cursor().offset(), 20);
        assert_eq!(state.window().offset(), 0);
        assert_eq!(state.selection().selected(), vec![2]);
    }

    #[test]
    fn test_same_query_is_not_a_change() {
        let mut state = ready_state(1..=20, 100);
        assert!(state.set_query("").unwrap().is_none());
        assert!(state.set_query("a").unwrap().is_some());
        assert!(state.set_query("").unwrap().is_some());
    }

    #[test]
    fn test_query_before_start_is_deferred() {
        let mut state = CollectionState::new(ViewConfig::default());
        assert!(state.set_query("foo").unwrap().is_none());
        let ticket = state.begin_start(None).unwrap();
        assert_eq!(ticket.request().search.as_deref(), Some("foo"));
    }

    #[test]
    fn test_failed_reset_keeps_loaded_query() {
        let mut state = ready_state(1..=20, 100);
        let ticket = state.set_query("foo").unwrap().unwrap();
        assert!(state.fail_fetch(&ticket, &Error::Api(ApiError::http(503, "down"))));

        assert_eq!(state.query(), "foo");
        assert_eq!(state.applied_query(), "");
        assert!(state.is_query_pending());

        // Paging the old results under the new query is refused.
        assert!(state.begin_fetch(false).unwrap().is_none());
        let near_end = ScrollProgress {
            offset: 200,
            direction: ScrollDirection::Forward,
        };
        assert!(!state.should_prefetch(near_end));

        // The same query can be retried.
        let retry = state.set_query("foo").unwrap().unwrap();
        assert_eq!(retry.request(), &ItemsRequest::page(0, 20).search("foo"));
        assert!(state.set_query("foo").unwrap().is_none());
        state.complete_fetch(retry, ItemPage::new(items(101..=120), 30));

        assert_eq!(state.applied_query(), "foo");
        assert!(!state.is_query_pending());
        let next = state.begin_fetch(false).unwrap().unwrap();
        assert_eq!(next.request(), &ItemsRequest::page(20, 20).search("foo"));
    }

    #[test]
    fn test_restore_is_unfiltered() {
        let mut state = CollectionState::new(ViewConfig::default());
        state.set_query("foo").unwrap();
        let ticket = state.begin_start(Some((vec![1, 2], vec![]))).unwrap();
        state.complete_fetch(ticket, ItemPage::new(items([1, 2]), 2));

        assert_eq!(state.applied_query(), "");
        assert!(state.is_query_pending());
    }

    #[test]
    fn test_stale_page_is_dropped() {
        let mut state = ready_state(1..=20, 100);
        let old = state.begin_fetch(false).unwrap().unwrap();
        let fresh = state.set_query("foo").unwrap().unwrap();

        let outcome = state.complete_fetch(old, ItemPage::new(items(21..=40), 100));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(state.order().len(), 20);
        assert!(state.is_loading());

        state.complete_fetch(fresh, ItemPage::new(items(200..=205), 6));
        assert_eq!(state.order().ids(), (200..=205).collect::<Vec<_>>());
        assert!(!state.is_loading());
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut state = ready_state(1..=20, 100);
        let old = state.begin_fetch(false).unwrap().unwrap();
        state.set_query("foo").unwrap();
        assert!(!state.fail_fetch(&old, &Error::Api(ApiError::http(502, "gateway"))));
        assert!(state.is_loading());
        assert_eq!(state.snapshot().last_error, None);
    }

    #[test]
    fn test_reorder_and_cancelled_drag() {
        let mut state = ready_state(1..=4, 4);
        assert_eq!(state.reorder(0, None).unwrap(), None);
        assert_eq!(state.order().ids(), vec![1, 2, 3, 4]);

        let change = state.reorder(0, Some(2)).unwrap().unwrap();
        assert_eq!(change.previous, vec![1, 2, 3, 4]);
        assert_eq!(change.new_order, vec![2, 3, 1, 4]);
        assert_eq!(state.order().ids(), change.new_order);
    }

    #[test]
    fn test_rollback_order_unless_changed_since() {
        let mut state = ready_state(1..=4, 4);
        let change = state.reorder(3, Some(0)).unwrap().unwrap();
        assert!(state.rollback_order(&change));
        assert_eq!(state.order().ids(), vec![1, 2, 3, 4]);

        let first = state.reorder(0, Some(3)).unwrap().unwrap();
        let _second = state.reorder(0, Some(3)).unwrap().unwrap();
        assert!(!state.rollback_order(&first));
        assert_eq!(state.order().ids(), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_selection_idempotent_and_rollback() {
        let mut state = ready_state(1..=4, 4);
        let change = state.set_selected(2, true).unwrap().unwrap();
        assert_eq!(state.set_selected(2, true).unwrap(), None);
        assert!(state.rollback_selection(&change));
        assert!(!state.selection().is_selected(2));
    }

    #[test]
    fn test_visible_rows_are_windowed() {
        let mut state = ready_state(1..=20, 200);
        for page in 1..10 {
            let ticket = state.begin_fetch(false).unwrap().unwrap();
            let start = page * 20 + 1;
            state.complete_fetch(ticket, ItemPage::new(items(start..=start + 19), 200));
        }
        state.set_selected(42, true).unwrap();
        state.scroll_to(40 * 40);

        let rows = state.visible_rows();
        assert_eq!(rows.first().map(|r| r.index), Some(37));
        assert_eq!(rows.len(), 15 + 6);
        let row = rows.iter().find(|r| r.item.id == 42).unwrap();
        assert!(row.selected);
        assert_eq!(row.top, 41 * 40);
    }
}
