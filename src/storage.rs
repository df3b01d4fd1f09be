pub mod kv;
pub use kv::{JsonFileStore, KeyValueStore, MemoryStore};
pub mod collection;
pub use collection::{Collection, StoredEntity};
