//! nf-rag: Tax analysis for Brazilian electronic invoices (Nota Fiscal)
//!
//! A small RAG service: the user submits invoice text (or a PDF), the backend
//! builds a transient document set from the invoice plus a static CNAE
//! tax-rate reference table, embeds and retrieves the most relevant chunks,
//! and asks an OpenAI-compatible LLM for a tax summary. Embeddings and answer
//! generation are delegated to the remote API; nothing is persisted between
//! requests.

pub mod analysis;
pub mod cnae;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use cnae::CnaeTable;
pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, Document, DocumentKind},
    request::{AnalyzeParams, AnalyzeTextRequest},
    response::AnalysisResponse,
};
