//! Text chunking with sentence-boundary awareness

use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::types::document::{Chunk, Document};

/// Text chunker with configurable size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between chunks
    overlap: usize,
    /// Minimum chunk size for intermediate chunks
    min_size: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
            min_size: 50,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            overlap: config.chunk_overlap,
            min_size: config.min_chunk_size,
        }
    }

    /// Split a document into chunks.
    ///
    /// A document shorter than the minimum size still produces one chunk:
    /// short invoices are the common case, not noise.
    pub fn chunk_document(&self, doc: &Document) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let sentences = self.split_into_sentences(&doc.content);

        let mut current = String::new();
        let mut chunk_index = 0u32;

        for sentence in sentences {
            if !current.is_empty() && current.len() + sentence.len() > self.chunk_size {
                if current.len() >= self.min_size {
                    chunks.push(Chunk::new(doc, current.trim().to_string(), chunk_index));
                    chunk_index += 1;
                }

                current = self.overlap_tail(&current);
            }

            current.push_str(sentence);
        }

        let trimmed = current.trim();
        if !trimmed.is_empty() && (trimmed.len() >= self.min_size || chunks.is_empty()) {
            chunks.push(Chunk::new(doc, trimmed.to_string(), chunk_index));
        }

        chunks
    }

    /// Split text into sentences
    fn split_into_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_sentence_bounds().collect()
    }

    /// Overlap text carried from the end of a chunk into the next one
    fn overlap_tail(&self, text: &str) -> String {
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len().saturating_sub(self.overlap);

        // Stay on a valid UTF-8 character boundary
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let tail = &text[start..];

        // Prefer a sentence boundary, then a word boundary
        if let Some(pos) = tail.find(". ") {
            return tail[pos + 2..].to_string();
        }

        if let Some(pos) = tail.find(' ') {
            return tail[pos + 1..].to_string();
        }

        tail.to_string()
    }
}
