//! Invoice analysis endpoints
//!
//! `POST /upload_nf` takes a PDF upload, `POST /upload_nf_texto` takes pasted
//! invoice text. Both run the same per-request pipeline and answer with the
//! generated tax summary.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use std::time::Instant;

use crate::analysis::AnalysisPipeline;
use crate::error::{Error, Result};
use crate::ingestion::extract_pdf_text;
use crate::server::state::AppState;
use crate::types::request::{AnalyzeParams, AnalyzeTextRequest};
use crate::types::response::AnalysisResponse;

/// POST /upload_nf_texto - analyze pasted invoice text
pub async fn analyze_text(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    Json(request): Json<AnalyzeTextRequest>,
) -> Result<Json<AnalysisResponse>> {
    let start = Instant::now();

    let content = request.conteudo.trim();
    if content.is_empty() {
        return Err(Error::invalid_input("O conteúdo textual está vazio."));
    }

    tracing::info!("Analyzing pasted invoice text ({} chars)", content.len());

    let invoice = AnalysisPipeline::invoice_document("entrada_manual", content.to_string());
    let outcome = state
        .pipeline()
        .run(invoice, params.question(), &[])
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Text analysis completed in {}ms ({} chunks indexed)",
        processing_time_ms,
        outcome.chunks_indexed
    );

    Ok(Json(AnalysisResponse::new(
        "Texto analisado com sucesso.",
        outcome.summary,
        &outcome.results,
        processing_time_ms,
    )))
}

/// POST /upload_nf - analyze an uploaded invoice PDF
pub async fn analyze_pdf(
    State(state): State<AppState>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>> {
    let start = Instant::now();

    let mut filename = None;
    let mut data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::invalid_input(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|s| s.to_string());
            data = Some(field.bytes().await.map_err(|e| {
                Error::invalid_input(format!("Failed to read uploaded file: {}", e))
            })?);
        }
    }

    let filename = filename.unwrap_or_else(|| "nota_fiscal.pdf".to_string());
    let data = data.ok_or_else(|| Error::invalid_input("Nenhum arquivo foi enviado."))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(Error::UnsupportedFileType(filename));
    }

    tracing::info!("Analyzing uploaded PDF: {} ({} bytes)", filename, data.len());

    let text = extract_pdf_text(&filename, &data)?;
    let invoice = AnalysisPipeline::invoice_document(filename, text);
    let outcome = state
        .pipeline()
        .run(invoice, params.question(), &[])
        .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "PDF analysis completed in {}ms ({} chunks indexed)",
        processing_time_ms,
        outcome.chunks_indexed
    );

    Ok(Json(AnalysisResponse::new(
        "Nota fiscal em PDF analisada com sucesso.",
        outcome.summary,
        &outcome.results,
        processing_time_ms,
    )))
}
