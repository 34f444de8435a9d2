//! Static CNAE tax-rate reference table
//!
//! CNAE is the Brazilian standard classification of economic activities; the
//! table maps activity codes to ISS rates and withholding rules. It is loaded
//! once at startup and each record is rendered to a human-readable text block
//! that joins the invoice text in the per-request retrieval set.
//!
//! The source JSON comes straight out of a spreadsheet export, so field values
//! are a mix of numbers and free text, codes sometimes carry a trailing
//! timestamp marker (`...T00:00:00`), and the observation column kept its
//! unnamed-column header.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::document::{Document, DocumentKind};

/// A spreadsheet cell: numeric rate or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    /// Numeric rate as a fraction (0.05 = 5%)
    Number(f64),
    /// Free-text value ("Sim", "Não", "Isento", ...)
    Text(String),
}

impl Rate {
    /// Format a possibly-missing rate for display.
    ///
    /// Numbers are fractions and render as percentages with two decimals;
    /// text passes through unchanged; missing values render as "-".
    pub fn format(value: Option<&Rate>) -> String {
        match value {
            Some(Rate::Number(v)) => format!("{:.2}%", v * 100.0),
            Some(Rate::Text(s)) => s.clone(),
            None => "-".to_string(),
        }
    }
}

/// One record of the CNAE tax-rate table, keyed by the original export's
/// column headers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CnaeRecord {
    /// CNAE 2.1 activity code (may carry a trailing "T..." timestamp marker)
    #[serde(rename = "Código CNAE 2.1", default)]
    pub code: Option<Rate>,

    /// Activity description
    #[serde(rename = "Descrição do Código CNAE 2.0", default)]
    pub description: Option<String>,

    /// Service item description from LC 116/2003
    #[serde(rename = "Descrição do Item da Lista (LC Nº 116/2003)", default)]
    pub item_description: Option<String>,

    /// ISS rate
    #[serde(rename = "ALIQUOTA", default)]
    pub iss_rate: Option<Rate>,

    /// Minimum ISS rate
    #[serde(rename = "ALIQUOTA_MINIMA", default)]
    pub iss_rate_min: Option<Rate>,

    /// Maximum ISS rate
    #[serde(rename = "ALIQUOTA_MAXIMA", default)]
    pub iss_rate_max: Option<Rate>,

    /// When ISS is withheld at source
    #[serde(rename = "Qual situação que retém o ISS?", default)]
    pub iss_withholding: Option<String>,

    /// IRRF withholding
    #[serde(rename = "IRRF", default)]
    pub irrf: Option<Rate>,

    /// PCC withholding (PIS/COFINS/CSLL)
    #[serde(rename = "PCC", default)]
    pub pcc: Option<Rate>,

    /// INSS withholding
    #[serde(rename = "INSS", default)]
    pub inss: Option<Rate>,

    /// Observation column (unnamed in the spreadsheet export)
    #[serde(rename = "Unnamed: 11", default)]
    pub observation: Option<String>,
}

impl CnaeRecord {
    /// Normalized CNAE code: the part before a 'T' marker, or "Desconhecido"
    /// when the cell is empty.
    pub fn normalized_code(&self) -> String {
        let raw = match &self.code {
            Some(Rate::Text(s)) => s.clone(),
            Some(Rate::Number(v)) => {
                if v.fract() == 0.0 {
                    format!("{}", *v as i64)
                } else {
                    format!("{}", v)
                }
            }
            None => String::new(),
        };

        if raw.is_empty() {
            return "Desconhecido".to_string();
        }

        raw.split('T').next().unwrap_or("Desconhecido").to_string()
    }

    /// Render the record as the human-readable reference block used for
    /// retrieval. Always non-empty.
    pub fn to_reference_text(&self) -> String {
        let description = self
            .description
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Sem descrição");
        let item_description = self
            .item_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("Sem item");
        let observation = self.observation.as_deref().unwrap_or("");

        format!(
            "CNAE {}: {}\n\
             Descrição: {}\n\
             Alíquota ISS: {} (mín: {}, máx: {})\n\
             Retenção ISS: {}\n\
             Outras retenções: IRRF - {}, PCC - {}, INSS - {}\n\
             Observação: {}",
            self.normalized_code(),
            description,
            item_description,
            Rate::format(self.iss_rate.as_ref()),
            Rate::format(self.iss_rate_min.as_ref()),
            Rate::format(self.iss_rate_max.as_ref()),
            self.iss_withholding.as_deref().unwrap_or("-"),
            Rate::format(self.irrf.as_ref()),
            Rate::format(self.pcc.as_ref()),
            Rate::format(self.inss.as_ref()),
            observation,
        )
    }
}

/// The CNAE reference table, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct CnaeTable {
    records: Vec<CnaeRecord>,
    /// Source label attached to the generated reference documents
    source: String,
}

impl CnaeTable {
    /// Load the table from a JSON file.
    ///
    /// A missing or malformed table is logged and yields an empty table: the
    /// service still answers from the invoice text alone.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "cnae_table.json".to_string());

        let records = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Vec<CnaeRecord>>(&content) {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("Failed to parse CNAE table {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read CNAE table {}: {}", path.display(), e);
                Vec::new()
            }
        };

        if records.is_empty() {
            tracing::warn!(
                "CNAE table is empty or malformed, answers will rely on invoice text only ({})",
                path.display()
            );
        } else {
            tracing::info!("Loaded {} CNAE records from {}", records.len(), path.display());
        }

        Self { records, source }
    }

    /// Build a table from in-memory records (used by tests)
    pub fn from_records(records: Vec<CnaeRecord>, source: impl Into<String>) -> Self {
        Self {
            records,
            source: source.into(),
        }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the table
    pub fn records(&self) -> &[CnaeRecord] {
        &self.records
    }

    /// Render every record into a reference document for the per-request
    /// retrieval set.
    pub fn to_documents(&self) -> Vec<Document> {
        self.records
            .iter()
            .map(|record| {
                Document::new(
                    self.source.clone(),
                    DocumentKind::CnaeReference,
                    record.to_reference_text(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "Código CNAE 2.1": "6201-5/00T00:00:00",
            "Descrição do Código CNAE 2.0": "Desenvolvimento de programas de computador sob encomenda",
            "Descrição do Item da Lista (LC Nº 116/2003)": "1.01 - Análise e desenvolvimento de sistemas",
            "ALIQUOTA": 0.05,
            "ALIQUOTA_MINIMA": 0.02,
            "ALIQUOTA_MAXIMA": 0.05,
            "Qual situação que retém o ISS?": "Quando o tomador está no município",
            "IRRF": "1,5%",
            "PCC": "4,65%",
            "INSS": "Não",
            "Unnamed: 11": "Sujeito à retenção quando PJ"
        },
        {
            "Descrição do Código CNAE 2.0": "",
            "ALIQUOTA": "Isento"
        }
    ]"#;

    #[test]
    fn test_rate_formatting() {
        assert_eq!(Rate::format(Some(&Rate::Number(0.05))), "5.00%");
        assert_eq!(Rate::format(Some(&Rate::Number(0.0265))), "2.65%");
        assert_eq!(Rate::format(Some(&Rate::Text("Isento".to_string()))), "Isento");
        assert_eq!(Rate::format(None), "-");
    }

    #[test]
    fn test_code_normalization_strips_timestamp_marker() {
        let records: Vec<CnaeRecord> = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(records[0].normalized_code(), "6201-5/00");
    }

    #[test]
    fn test_missing_code_is_unknown() {
        let record = CnaeRecord::default();
        assert_eq!(record.normalized_code(), "Desconhecido");
    }

    #[test]
    fn test_numeric_code() {
        let record = CnaeRecord {
            code: Some(Rate::Number(6201500.0)),
            ..Default::default()
        };
        assert_eq!(record.normalized_code(), "6201500");
    }

    #[test]
    fn test_reference_text_full_record() {
        let records: Vec<CnaeRecord> = serde_json::from_str(SAMPLE).unwrap();
        let text = records[0].to_reference_text();

        assert!(text.starts_with("CNAE 6201-5/00: Desenvolvimento"));
        assert!(text.contains("Alíquota ISS: 5.00% (mín: 2.00%, máx: 5.00%)"));
        assert!(text.contains("IRRF - 1,5%, PCC - 4,65%, INSS - Não"));
        assert!(text.contains("Observação: Sujeito à retenção quando PJ"));
    }

    #[test]
    fn test_reference_text_sparse_record_uses_placeholders() {
        let records: Vec<CnaeRecord> = serde_json::from_str(SAMPLE).unwrap();
        let text = records[1].to_reference_text();

        assert!(text.starts_with("CNAE Desconhecido: Sem descrição"));
        assert!(text.contains("Descrição: Sem item"));
        assert!(text.contains("Alíquota ISS: Isento (mín: -, máx: -)"));
        assert!(text.contains("Retenção ISS: -"));
    }

    #[test]
    fn test_every_record_formats_non_empty() {
        let records: Vec<CnaeRecord> = serde_json::from_str(SAMPLE).unwrap();
        for record in &records {
            assert!(!record.to_reference_text().trim().is_empty());
        }
        // Even a fully empty record produces a usable block
        assert!(!CnaeRecord::default().to_reference_text().trim().is_empty());
    }

    #[test]
    fn test_to_documents() {
        let records: Vec<CnaeRecord> = serde_json::from_str(SAMPLE).unwrap();
        let table = CnaeTable::from_records(records, "cnae_table.json");
        let docs = table.to_documents();

        assert_eq!(docs.len(), 2);
        for doc in &docs {
            assert_eq!(doc.kind, DocumentKind::CnaeReference);
            assert_eq!(doc.source, "cnae_table.json");
            assert!(!doc.content.is_empty());
        }
    }

    #[test]
    fn test_load_missing_file_yields_empty_table() {
        let table = CnaeTable::load("does-not-exist.json");
        assert!(table.is_empty());
    }
}
