//! Wire and domain types

pub mod document;
pub mod request;
pub mod response;

pub use document::{Chunk, Document, DocumentKind};
pub use request::{AnalyzeParams, AnalyzeTextRequest};
pub use response::{AnalysisResponse, SourceRef};
