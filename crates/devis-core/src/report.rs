//! Human review report for a processed record.

use std::fmt;

use serde::Serialize;

use crate::models::config::ReviewConfig;
use crate::models::enum_match::EnumMatch;
use crate::models::field::{ConfidenceLevel, FieldValue};
use crate::models::record::ExtractedRecord;

/// A required field whose confidence is below the high band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReview {
    /// Wire key, e.g. `code_postal`.
    pub field: &'static str,
    /// Display label, e.g. `Code postal`.
    pub label: &'static str,
    pub value: Option<FieldValue>,
    pub confidence: f32,
    pub level: ConfidenceLevel,
}

/// What a reviewer needs to know about one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    pub overall_confidence: f32,
    pub ready_for_auto_insert: bool,
    pub fields_needing_review: Vec<FieldReview>,
    pub metiers_detected: Vec<EnumMatch>,
    pub metiers_suggested: Vec<EnumMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agence: Option<EnumMatch>,
    pub extraction_date: String,
}

impl ReviewReport {
    /// Build the report with the configured auto-insert threshold.
    pub fn from_record(record: &ExtractedRecord, config: &ReviewConfig) -> Self {
        Self::with_threshold(record, config.auto_insert_threshold)
    }

    /// Build the report. A record is ready for auto-insert when its overall
    /// confidence reaches `threshold`.
    pub fn with_threshold(record: &ExtractedRecord, threshold: f32) -> Self {
        let overall_confidence = record.overall_confidence();

        let fields_needing_review = record
            .required_fields()
            .filter(|(_, field)| field.confidence_level() != ConfidenceLevel::High)
            .map(|(name, field)| FieldReview {
                field: name.key(),
                label: name.label(),
                value: field.value.clone(),
                confidence: field.confidence(),
                level: field.confidence_level(),
            })
            .collect();

        let (metiers_suggested, metiers_detected): (Vec<_>, Vec<_>) = record
            .metiers
            .iter()
            .cloned()
            .partition(EnumMatch::requires_validation);

        Self {
            overall_confidence,
            ready_for_auto_insert: overall_confidence >= threshold,
            fields_needing_review,
            metiers_detected,
            metiers_suggested,
            agence: record.agency.clone(),
            extraction_date: record.extraction_timestamp().to_rfc3339(),
        }
    }

    /// Number of items a human has to look at.
    pub fn review_count(&self) -> usize {
        let agency = self
            .agence
            .as_ref()
            .is_some_and(EnumMatch::requires_validation);
        self.fields_needing_review.len() + self.metiers_suggested.len() + usize::from(agency)
    }

    /// True when nothing needs review and the record may be inserted as is.
    pub fn is_clean(&self) -> bool {
        self.ready_for_auto_insert && self.review_count() == 0
    }
}

fn percent(score: f32) -> String {
    format!("{:.1}%", score * 100.0)
}

impl fmt::Display for ReviewReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Confiance globale : {}", percent(self.overall_confidence))?;
        writeln!(
            f,
            "Insertion auto possible : {}",
            if self.ready_for_auto_insert { "OUI" } else { "NON" }
        )?;

        if !self.fields_needing_review.is_empty() {
            writeln!(f, "\nChamps nécessitant une revue :")?;
            for item in &self.fields_needing_review {
                let value = item.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
                writeln!(f, "  - {}: {} (confiance: {})", item.label, value, percent(item.confidence))?;
            }
        }

        writeln!(f, "\nMétiers détectés avec certitude :")?;
        for m in &self.metiers_detected {
            writeln!(
                f,
                "  - {} (confiance: {})",
                m.matched_value().unwrap_or_default(),
                percent(m.confidence())
            )?;
        }

        if !self.metiers_suggested.is_empty() {
            writeln!(f, "\nMétiers suggérés (à valider) :")?;
            for m in &self.metiers_suggested {
                let suggestions: Vec<String> = m
                    .suggestions()
                    .iter()
                    .take(3)
                    .map(|s| format!("{} ({})", s.member, percent(s.score)))
                    .collect();
                writeln!(f, "  - Texte: '{}'", m.original_text())?;
                writeln!(f, "    Suggestions: {}", suggestions.join(", "))?;
            }
        }

        if let Some(agency) = &self.agence {
            writeln!(
                f,
                "\nAgence : {} (confiance: {})",
                agency.matched_value().unwrap_or("?"),
                percent(agency.confidence())
            )?;
        }

        Ok(())
    }
}
