//! Collection service API
//!
//! The [`CollectionService`] trait is the seam between the view state and the
//! remote collection. [`crate::ShelfClient`] implements it over HTTP; tests and
//! embedders can supply their own implementation.

mod execute;
mod request;

pub use request::ItemsRequest;
pub use request::SelectBody;
pub use request::SortBody;

use async_trait::async_trait;

use crate::error::Error;
use crate::model::ItemId;
use crate::model::ItemPage;

/// The remote collection service.
///
/// Implementations must be cheap to share behind an `Arc`; confirmation calls
/// (`select`, `sort`) run on spawned tasks.
#[async_trait]
pub trait CollectionService: Send + Sync {
    /// `GET /items` - lists a page of items.
    async fn list_items(&self, request: &ItemsRequest) -> Result<ItemPage, Error>;

    /// `POST /select` - sets membership of `ids` to `selected`.
    async fn select(&self, ids: &[ItemId], selected: bool) -> Result<(), Error>;

    /// `POST /sort` - replaces the canonical ordering with `new_order`.
    async fn sort(&self, new_order: &[ItemId]) -> Result<(), Error>;
}
