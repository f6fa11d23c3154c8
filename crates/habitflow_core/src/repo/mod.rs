//! Repository layer for the key-value persistence surface.
//!
//! # Responsibility
//! - Define the synchronous `get`/`set` contract used by the progress store.
//! - Isolate SQLite query details from store and service orchestration.
//!
//! # Invariants
//! - Repositories store opaque text; they never interpret record contents.

pub mod kv_repo;
