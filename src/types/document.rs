//! Transient per-request documents and chunks
//!
//! Documents here exist only for the duration of one analysis request: the
//! pasted (or extracted) invoice text plus the formatted CNAE reference
//! records. Nothing is persisted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Where a document in the per-request set came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// The invoice under analysis (pasted text or extracted from PDF)
    Invoice,
    /// A formatted record from the CNAE tax-rate reference table
    CnaeReference,
}

/// A document in the per-request analysis set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub id: Uuid,
    /// Source label used in logs and retrieval provenance
    /// (e.g. "entrada_manual", an uploaded filename, or the CNAE table name)
    pub source: String,
    /// Document kind
    pub kind: DocumentKind,
    /// Full text content
    pub content: String,
    /// Content hash, logged when the analysis starts so repeated submissions
    /// of the same invoice can be correlated
    pub content_hash: String,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Document {
    /// Create a new document
    pub fn new(source: impl Into<String>, kind: DocumentKind, content: String) -> Self {
        let content_hash = hash_content(&content);
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            kind,
            content,
            content_hash,
            created_at: chrono::Utc::now(),
        }
    }
}

/// A chunk of text from a document, ready for embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Parent document ID
    pub document_id: Uuid,
    /// Text content
    pub content: String,
    /// Embedding vector (filled after the embedding call)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
    /// Source label inherited from the parent document
    pub source: String,
    /// Document kind inherited from the parent document
    pub kind: DocumentKind,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk (embedding filled later)
    pub fn new(doc: &Document, content: String, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id: doc.id,
            content,
            embedding: Vec::new(),
            source: doc.source.clone(),
            kind: doc.kind,
            chunk_index,
        }
    }
}

/// SHA-256 hash of document content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
