//! Windowed collection view
//!
//! [`CollectionState`] is the single source of truth for what is rendered:
//! the loaded prefix of the collection, its display order, the selection and the
//! scroll window. Every change goes through one of its transition methods.
//! [`CollectionController`] drives those transitions from user gestures and
//! service responses, persists the session and confirms changes remotely.

mod config;
mod controller;
mod cursor;
mod order;
mod selection;
mod state;
mod sync;
mod window;

pub use config::ViewConfig;
pub use controller::CollectionController;
pub use controller::StartPath;
pub use cursor::PageCursor;
pub use order::Order;
pub use selection::Selection;
pub use state::CollectionState;
pub use state::FetchKind;
pub use state::FetchOutcome;
pub use state::FetchTicket;
pub use state::OrderChange;
pub use state::Phase;
pub use state::Row;
pub use state::SelectionChange;
pub use state::Snapshot;
pub use sync::SyncJob;
pub use sync::SyncOutcome;
pub use sync::SyncQueue;
pub use window::PrefetchPolicy;
pub use window::ScrollDirection;
pub use window::ScrollProgress;
pub use window::Window;
