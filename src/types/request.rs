//! Request types for the analysis endpoints
//!
//! Field names stay in Portuguese for wire compatibility with the original
//! front end (`conteudo`, `pergunta`).

use serde::{Deserialize, Serialize};

/// Default analysis question when the caller does not provide one
pub const DEFAULT_QUESTION: &str = "Analise os dados da nota fiscal e me forneça um resumo claro \
     e direto das alíquotas, impostos devidos e possíveis inconsistências.";

/// JSON body for `POST /upload_nf_texto`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeTextRequest {
    /// Raw invoice text pasted by the user
    pub conteudo: String,
}

/// Query parameters accepted by the analysis endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeParams {
    /// Optional custom question about the invoice
    #[serde(default)]
    pub pergunta: Option<String>,
}

impl AnalyzeParams {
    /// The question to ask, falling back to the default analysis request
    pub fn question(&self) -> &str {
        match self.pergunta.as_deref() {
            Some(q) if !q.trim().is_empty() => q,
            _ => DEFAULT_QUESTION,
        }
    }
}
