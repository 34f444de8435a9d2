//! Invoice ingestion: text chunking and PDF extraction

pub mod chunker;
pub mod pdf;

pub use chunker::TextChunker;
pub use pdf::extract_pdf_text;
