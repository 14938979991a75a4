//! Data model

mod item;
mod page;

pub use item::Item;
pub use item::ItemId;
pub use page::ItemPage;
