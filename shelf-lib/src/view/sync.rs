//! Remote confirmation of optimistic changes.
//!
//! Selection toggles and reorders are applied locally first and confirmed by
//! the collection service in the background. Each confirmation runs on its own
//! task; outcomes come back through a channel and are applied to the state by
//! the controller.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use tokio::sync::Mutex;
use tokio::sync::mpsc;

use crate::api::CollectionService;
use crate::error::Error;

use super::state::OrderChange;
use super::state::SelectionChange;

/// A change waiting for remote confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncJob {
    /// `POST /select` for one id.
    Select(SelectionChange),
    /// `POST /sort` with the full new ordering.
    Sort(OrderChange),
}

impl SyncJob {
    async fn run<S: CollectionService + ?Sized>(&self, service: &S) -> Result<(), Error> {
        match self {
            Self::Select(change) => service.select(&[change.id], change.selected).await,
            Self::Sort(change) => service.sort(&change.new_order).await,
        }
    }
}

/// A finished confirmation.
#[derive(Debug)]
pub struct SyncOutcome {
    pub job: SyncJob,
    pub result: Result<(), Error>,
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Background queue of confirmation requests.
///
/// Jobs run concurrently and may finish in any order.
pub struct SyncQueue {
    tx: mpsc::UnboundedSender<SyncOutcome>,
    rx: Mutex<mpsc::UnboundedReceiver<SyncOutcome>>,
    /// Submitted jobs whose outcome has not been taken yet.
    pending: Arc<AtomicUsize>,
}

impl SyncQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of outcomes not yet taken.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Runs `job` against `service` on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<S>(&self, service: Arc<S>, job: SyncJob)
    where
        S: CollectionService + ?Sized + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = job.run(service.as_ref()).await;
            let _ = tx.send(SyncOutcome { job, result });
        });
    }

    /// Waits for the next outcome. Returns `None` once nothing is pending.
    pub async fn next(&self) -> Option<SyncOutcome> {
        if self.pending() == 0 {
            return None;
        }
        let outcome = self.rx.lock().await.recv().await?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(outcome)
    }

    /// Takes an outcome if one is ready, without waiting.
    pub async fn try_next(&self) -> Option<SyncOutcome> {
        let outcome = self.rx.lock().await.try_recv().ok()?;
        self.pending.fetch_sub(1, Ordering::SeqCst);
        Some(outcome)
    }
}

impl Default for SyncQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use dashmap::DashMap;

    use super::*;
    use crate::api::ItemsRequest;
    use crate::error::ApiError;
    use crate::model::ItemId;
    use crate::model::ItemPage;

    #[derive(Default)]
    struct Recorder {
        selects: DashMap<ItemId, bool>,
        fail_sort: bool,
    }

    #[async_trait]
    impl CollectionService for Recorder {
        async fn list_items(&self, _request: &ItemsRequest) -> Result<ItemPage, Error> {
            Ok(ItemPage::default())
        }

        async fn select(&self, ids: &[ItemId], selected: bool) -> Result<(), Error> {
            for id in ids {
                self.selects.insert(*id, selected);
            }
            Ok(())
        }

        async fn sort(&self, _new_order: &[ItemId]) -> Result<(), Error> {
            if self.fail_sort {
                return Err(Error::Api(ApiError::http(500, "sort failed")));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_outcomes_are_delivered() {
        let service = Arc::new(Recorder {
            fail_sort: true,
            ..Default::default()
        });
        let queue = SyncQueue::new();
        queue.submit(
            service.clone(),
            SyncJob::Select(SelectionChange { id: 4, selected: true, revision: 1 }),
        );
        queue.submit(
            service.clone(),
            SyncJob::Sort(OrderChange { previous: vec![1, 2], new_order: vec![2, 1], revision: 1 }),
        );
        assert_eq!(queue.pending(), 2);

        let mut outcomes = Vec::new();
        while let Some(outcome) = queue.next().await {
            outcomes.push(outcome);
        }
        assert_eq!(queue.pending(), 0);
        assert_eq!(outcomes.len(), 2);

        let failed: Vec<_> = outcomes.iter().filter(|o| !o.is_ok()).collect();
        assert_eq!(failed.len(), 1);
        assert!(matches!(failed[0].job, SyncJob::Sort(_)));
        assert_eq!(service.selects.get(&4).map(|v| *v), Some(true));
    }

    #[tokio::test]
    async fn test_empty_queue_does_not_block() {
        let queue = SyncQueue::new();
        assert!(queue.next().await.is_none());
        assert!(queue.try_next().await.is_none());
    }
}
