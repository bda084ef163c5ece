//! Storage implementations for Taleweave: the digest row store and the
//! local folders that hold exported artifacts.

pub mod in_memory;
pub mod local_files;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemoryStore;
pub use local_files::LocalArtifactStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
