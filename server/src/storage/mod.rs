mod storage;

pub use storage::StorageKey;
pub(crate) use storage::Storage;
