//! PDF text extraction for uploaded invoices
//!
//! Primary extraction goes through `pdf-extract`; when that fails (complex
//! fonts, odd encodings) a `lopdf` content-stream pass is tried before giving
//! up. Extraction itself stays in external crates.

use crate::error::{Error, Result};

/// Extract plain text from an in-memory PDF.
pub fn extract_pdf_text(filename: &str, data: &[u8]) -> Result<String> {
    let content = match pdf_extract::extract_text_from_mem(data) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("pdf-extract failed for {}: {}, trying lopdf fallback", filename, e);
            extract_with_lopdf(filename, data)?
        }
    };

    let content = cleanup_text(&content);

    if content.trim().is_empty() {
        // pdf-extract can succeed with empty output on image-only PDFs
        let fallback = extract_with_lopdf(filename, data).unwrap_or_default();
        let fallback = cleanup_text(&fallback);
        if fallback.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF has no extractable text (it may be image-based or encrypted)",
            ));
        }
        return Ok(fallback);
    }

    Ok(content)
}

/// Fallback extraction reading text objects from each page's content stream
fn extract_with_lopdf(filename: &str, data: &[u8]) -> Result<String> {
    let doc = lopdf::Document::load_mem(data)
        .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

    let mut all_text = String::new();
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

    for page_number in page_numbers {
        match doc.extract_text(&[page_number]) {
            Ok(text) if !text.trim().is_empty() => {
                all_text.push_str(&text);
                all_text.push('\n');
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!("No text on page {} of {}: {}", page_number, filename, e);
            }
        }
    }

    if all_text.trim().is_empty() {
        return Err(Error::file_parse(
            filename,
            "PDF appears to be image-based or has no extractable text",
        ));
    }

    Ok(all_text)
}

/// Normalize extracted PDF text: strip null bytes, collapse blank lines,
/// replace typographic characters that confuse downstream matching.
fn cleanup_text(text: &str) -> String {
    let text = text
        .replace('\0', "")
        .replace('\u{00A0}', " ")
        .replace('\u{2018}', "'")
        .replace('\u{2019}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl");

    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
