//! Drives the collection state from gestures, scrolling and service responses.

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;

use crate::api::CollectionService;
use crate::error::Error;
use crate::error::SessionError;
use crate::model::ItemId;
use crate::session::SessionStore;

use super::ViewConfig;
use super::state::CollectionState;
use super::state::FetchOutcome;
use super::state::FetchTicket;
use super::state::Phase;
use super::state::Row;
use super::state::Snapshot;
use super::sync::SyncJob;
use super::sync::SyncOutcome;
use super::sync::SyncQueue;

/// Which startup path [`CollectionController::start`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPath {
    /// A persisted order was found and reloaded from the service.
    Restored,
    /// Nothing usable was persisted; the first page was loaded.
    Fresh,
}

/// A windowed view over a remote collection.
///
/// Owns the [`CollectionState`] and performs the side effects around its
/// transitions: page requests, session writes once initialized, and remote
/// confirmation of selection changes and reorders.
///
/// Gestures are applied to the state before any request goes out and never
/// wait for the network. The state lock is never held across an `.await`, so
/// the controller can be shared and driven from concurrent futures.
///
/// # Example
///
/// ```ignore
/// let controller = CollectionController::new(
///     Arc::new(ShelfClient::builder().url("http://localhost:3001").build()),
///     SessionStore::new(SqliteBackend::open("session.db").await?),
///     ViewConfig::default(),
/// );
///
/// controller.start().await?;
/// controller.set_query("foo").await?;
/// controller.on_scroll(1200).await?;
/// for row in controller.visible_rows() {
///     println!("[{}] {}", if row.selected { "x" } else { " " }, row.item.value);
/// }
/// ```
pub struct CollectionController<S: CollectionService + ?Sized + 'static = dyn CollectionService> {
    service: Arc<S>,
    session: SessionStore,
    state: Arc<RwLock<CollectionState>>,
    sync: SyncQueue,
    /// Held from reading the ids to the last session write, so concurrent
    /// transitions persist in the order they read the state.
    persist_lock: Mutex<()>,
    /// Set by every visible change; cleared by the renderer.
    dirty: Arc<AtomicBool>,
}

impl<S: CollectionService + ?Sized + 'static> CollectionController<S> {
    pub fn new(service: Arc<S>, session: SessionStore, config: ViewConfig) -> Self {
        Self {
            service,
            session,
            state: Arc::new(RwLock::new(CollectionState::new(config))),
            sync: SyncQueue::new(),
            persist_lock: Mutex::new(()),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&CollectionState) -> R) -> R {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut CollectionState) -> R) -> R {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Startup
    // -------------------------------------------------------------------------

    /// Initializes order and selection, restoring the persisted session if any.
    ///
    /// Runs once; a failed start can be retried.
    pub async fn start(&self) -> Result<StartPath, Error> {
        if self.read(|s| s.is_ready()) {
            return Err(Error::AlreadyStarted);
        }
        let persisted = self.load_persisted().await?;
        let path = if persisted.is_some() {
            StartPath::Restored
        } else {
            StartPath::Fresh
        };

        let ticket = self.write(|s| s.begin_start(persisted))?;
        log::info!("starting collection view ({:?})", path);

        match self.run_fetch(ticket).await? {
            FetchOutcome::Applied { .. } => {
                // A query set before start does not apply to a restored order.
                if self.read(|s| s.is_query_pending()) {
                    if let Err(e) = self.fetch_page(true).await {
                        log::warn!("search after restore failed: {}", e);
                    }
                }
                Ok(path)
            }
            // A concurrent start won the race.
            _ => Err(Error::AlreadyStarted),
        }
    }

    async fn load_persisted(&self) -> Result<Option<(Vec<ItemId>, Vec<ItemId>)>, Error> {
        let order = match self.session.load_order().await {
            Ok(Some(order)) => order,
            Ok(None) => return Ok(None),
            Err(e @ SessionError::Decode { .. }) => {
                log::warn!("ignoring persisted order: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let selected = match self.session.load_selected().await {
            Ok(selected) => selected,
            Err(e @ SessionError::Decode { .. }) => {
                log::warn!("ignoring persisted selection: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some((order, selected)))
    }

    // -------------------------------------------------------------------------
    // Pagination and search
    // -------------------------------------------------------------------------

    /// Loads the first page again (`reset`) or the next page of the current query.
    pub async fn fetch_page(&self, reset: bool) -> Result<FetchOutcome, Error> {
        match self.write(|s| s.begin_fetch(reset))? {
            Some(ticket) => self.run_fetch(ticket).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    /// Loads the next page if there is one and none is loading.
    pub async fn load_more(&self) -> Result<FetchOutcome, Error> {
        self.fetch_page(false).await
    }

    /// Changes the search query and reloads from the first page.
    ///
    /// Setting the query again after its reload failed retries the reload.
    pub async fn set_query(&self, query: impl Into<String>) -> Result<FetchOutcome, Error> {
        match self.write(|s| s.set_query(query))? {
            Some(ticket) => self.run_fetch(ticket).await,
            None => Ok(FetchOutcome::Skipped),
        }
    }

    /// Scroll update from the renderer. May prefetch the next page.
    pub async fn on_scroll(&self, offset: u32) -> Result<FetchOutcome, Error> {
        let (progress, prefetch) = self.write(|s| {
            let progress = s.scroll_to(offset);
            (progress, s.should_prefetch(progress))
        });
        self.mark_dirty();

        if prefetch {
            log::debug!("prefetching at offset {}", progress.offset);
            self.fetch_page(false).await
        } else {
            Ok(FetchOutcome::Skipped)
        }
    }

    /// Viewport resize from the renderer.
    pub fn set_viewport_height(&self, viewport_height: u32) {
        self.write(|s| s.set_viewport_height(viewport_height));
        self.mark_dirty();
    }

    async fn run_fetch(&self, ticket: FetchTicket) -> Result<FetchOutcome, Error> {
        log::debug!(
            "fetching {:?} at offset {} (generation {})",
            ticket.kind(),
            ticket.request().offset,
            ticket.generation()
        );

        match self.service.list_items(ticket.request()).await {
            Ok(page) => {
                let outcome = self.write(|s| s.complete_fetch(ticket, page));
                if let FetchOutcome::Applied {
                    selection_changed, ..
                } = outcome
                {
                    self.mark_dirty();
                    self.persist(true, selection_changed).await?;
                }
                Ok(outcome)
            }
            Err(e) => {
                if !self.write(|s| s.fail_fetch(&ticket, &e)) {
                    log::debug!("superseded fetch failed: {}", e);
                    return Ok(FetchOutcome::Stale);
                }
                log::warn!("page fetch failed: {}", e);
                self.mark_dirty();
                Err(e)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Drag end. `None` destination means the drag was cancelled.
    ///
    /// Returns `true` if the order changed.
    pub async fn reorder(&self, source: usize, destination: Option<usize>) -> Result<bool, Error> {
        let Some(change) = self.write(|s| s.reorder(source, destination))? else {
            return Ok(false);
        };
        self.mark_dirty();
        self.sync.submit(self.service.clone(), SyncJob::Sort(change));
        self.persist(true, false).await?;
        Ok(true)
    }

    /// Checkbox toggle.
    ///
    /// Returns `true` if membership changed; setting the current value sends nothing.
    pub async fn set_selected(&self, id: ItemId, selected: bool) -> Result<bool, Error> {
        let Some(change) = self.write(|s| s.set_selected(id, selected))? else {
            return Ok(false);
        };
        self.mark_dirty();
        self.sync.submit(self.service.clone(), SyncJob::Select(change));
        self.persist(false, true).await?;
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Confirmations
    // -------------------------------------------------------------------------

    /// Number of confirmations still outstanding.
    pub fn pending_sync(&self) -> usize {
        self.sync.pending()
    }

    /// Applies confirmations that already finished, without waiting.
    pub async fn drain_sync(&self) -> Result<Vec<SyncOutcome>, Error> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.sync.try_next().await {
            self.apply_sync(&outcome).await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    /// Waits for every outstanding confirmation and applies it.
    pub async fn settle(&self) -> Result<Vec<SyncOutcome>, Error> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.sync.next().await {
            self.apply_sync(&outcome).await?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    async fn apply_sync(&self, outcome: &SyncOutcome) -> Result<(), Error> {
        let Err(error) = &outcome.result else {
            return Ok(());
        };
        match &outcome.job {
            SyncJob::Select(change) => {
                if self.write(|s| s.rollback_selection(change)) {
                    log::warn!(
                        "selecting item {} failed, rolled back: {}",
                        change.id,
                        error
                    );
                    self.mark_dirty();
                    self.persist(false, true).await?;
                } else {
                    log::warn!("selecting item {} failed (superseded): {}", change.id, error);
                }
            }
            SyncJob::Sort(change) => {
                if self.write(|s| s.rollback_order(change)) {
                    log::warn!("reorder failed, rolled back: {}", error);
                    self.mark_dirty();
                    self.persist(true, false).await?;
                } else {
                    log::warn!("reorder failed (superseded): {}", error);
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Writes the requested records, but only once initialization completed.
    async fn persist(&self, order: bool, selection: bool) -> Result<(), Error> {
        let _guard = self.persist_lock.lock().await;
        let Some((order_ids, selected_ids)) = self.read(|s| {
            s.is_ready().then(|| {
                (
                    order.then(|| s.order().ids()),
                    selection.then(|| s.selection().selected()),
                )
            })
        }) else {
            return Ok(());
        };

        if let Some(ids) = order_ids {
            self.session.save_order(&ids).await?;
        }
        if let Some(ids) = selected_ids {
            self.session.save_selected(&ids).await?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.read(|s| s.phase())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.read(|s| s.snapshot())
    }

    /// Rows to render for the current scroll window.
    pub fn visible_rows(&self) -> Vec<Row> {
        self.read(|s| s.visible_rows())
    }

    /// Check if anything visible changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}
