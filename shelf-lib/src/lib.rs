//! Shelf collection client library
//!
//! Keeps a windowed, searchable, reorderable view of a remote item collection in
//! sync with local session storage and the collection service.

pub mod api;
pub mod error;
pub mod model;
pub mod retry;
pub mod session;
pub mod view;

mod client;

pub use client::*;
pub use view::CollectionController;
pub use view::ViewConfig;
