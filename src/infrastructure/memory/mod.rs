//! In-process storage backend.
//!
//! Keeps links and visits in memory behind one mutex. Only suitable for a
//! single instance: local development and tests. Data is lost on restart.

mod memory_store;

pub use memory_store::MemoryStore;
