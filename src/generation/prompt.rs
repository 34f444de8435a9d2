//! Prompt templates for invoice tax analysis
//!
//! The persona and template text mirror the product's original Portuguese
//! prompt: an experienced accountant analyzing electronic invoices against
//! the CNAE tax-rate rules.

use crate::generation::openai::ChatMessage;
use crate::retrieval::SearchResult;

/// Default accountant persona for the system message
pub const DEFAULT_PERSONA: &str = "Você é um contador experiente e detalhista, \
     especializado em análise de notas fiscais eletrônicas.";

/// Prompt builder for analysis queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build retrieval context from search results, labeling each block with
    /// its source.
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] Fonte: {}\n{}\n\n---\n\n",
                i + 1,
                result.chunk.source,
                result.chunk.content
            ));
        }

        context
    }

    /// Build the analysis prompt body
    pub fn build_analysis_prompt(
        question: &str,
        context: &str,
        history: &[(String, String)],
    ) -> String {
        format!(
            "Analise os dados abaixo, considerando os dados da nota fiscal e também \
             as regras da tabela CNAE:\n\
             \n\
             {context}\n\
             \n\
             Histórico da conversa (se houver):\n\
             {history}\n\
             \n\
             Nova solicitação do usuário:\n\
             {question}\n\
             \n\
             Importante:\n\
             - Seja claro, objetivo e didático.\n\
             - Apresente possíveis erros ou inconsistências tributárias.\n\
             - Finalize com uma orientação útil (ex: consulte seu contador).",
            context = context,
            history = Self::format_history(history),
            question = question,
        )
    }

    /// Build the full chat message list: persona plus the analysis prompt
    pub fn build_messages(
        persona: Option<&str>,
        question: &str,
        context: &str,
        history: &[(String, String)],
    ) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(persona.unwrap_or(DEFAULT_PERSONA)),
            ChatMessage::user(Self::build_analysis_prompt(question, context, history)),
        ]
    }

    /// Format conversation history as question/answer lines
    fn format_history(history: &[(String, String)]) -> String {
        if history.is_empty() {
            return "(sem histórico)".to_string();
        }

        history
            .iter()
            .map(|(q, a)| format!("Usuário: {}\nContador: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
