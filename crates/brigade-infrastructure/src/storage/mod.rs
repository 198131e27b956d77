//! Storage layer for the persisted session.

mod atomic_file;
mod file_session_storage;
mod memory_session_storage;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use file_session_storage::FileSessionStorage;
pub use memory_session_storage::MemorySessionStorage;
