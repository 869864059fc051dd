mod item_catalog;
mod item_stack;

pub use item_catalog::{ItemCatalog, DEFAULT_MAX_STACK};
pub use item_stack::{ItemKind, ItemStack};
