pub mod item;
pub mod listing;
pub mod ops;

pub use item::{ColorClass, Item};
pub use listing::Listing;
pub use ops::Trash;
