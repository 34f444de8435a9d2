//! Per-request retrieval over embedded chunks

pub mod index;

pub use index::{ChunkIndex, SearchResult};
