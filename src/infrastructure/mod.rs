//! Adapters for the [`StateStore`](crate::domain::ports::StateStore) port.

pub mod document;
pub mod in_memory;
pub mod json_file;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
