//! Adapter, validator and mapper run in sequence over one document.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::extraction::{self, RawResponse};
use crate::mapping::EnumMapper;
use crate::models::config::DevisConfig;
use crate::models::record::{ExtractedRecord, FieldName};
use crate::validation::FieldValidator;

/// Key of the free-text agency field in provider responses.
const AGENCY_KEY: &str = "agence";

/// The full extraction pipeline.
///
/// Holds only immutable state, so one instance can serve any number of
/// documents across threads.
#[derive(Debug, Clone)]
pub struct ExtractionPipeline {
    validator: FieldValidator,
    trade_mapper: EnumMapper,
    agency_mapper: Option<EnumMapper>,
}

impl ExtractionPipeline {
    /// Assemble a pipeline from prepared components.
    pub fn new(
        validator: FieldValidator,
        trade_mapper: EnumMapper,
        agency_mapper: Option<EnumMapper>,
    ) -> Self {
        Self {
            validator,
            trade_mapper,
            agency_mapper,
        }
    }

    /// Build every component from configuration.
    pub fn from_config(config: &DevisConfig) -> Result<Self> {
        config.validate()?;

        let validator = FieldValidator::new(&config.validation)?;
        let trade_mapper = EnumMapper::new(&config.taxonomy.trades, &config.mapping)?;
        let agency_mapper = if config.taxonomy.agencies.is_empty() {
            None
        } else {
            Some(EnumMapper::new(&config.taxonomy.agencies, &config.mapping)?)
        };

        Ok(Self::new(validator, trade_mapper, agency_mapper))
    }

    /// Process one response, scanning `sources` for trade mentions.
    ///
    /// Fails only when the response is structurally unusable.
    pub fn process(&self, raw: &RawResponse, sources: &[&str]) -> Result<ExtractedRecord> {
        let start = Instant::now();

        let mut record = extraction::adapt_response(raw)?;
        let rejected = self.validator.validate(&mut record);
        debug!("{} fields rejected by validation", rejected.len());

        record.metiers = self.trade_mapper.match_sources(sources)?;

        if let (Some(mapper), Some(agency)) = (&self.agency_mapper, extraction::payload_text(raw, AGENCY_KEY)) {
            record.agency = Some(mapper.match_text(agency)?);
        }

        info!(
            "Processed document in {}ms: overall confidence {:.2}, {} trade matches",
            start.elapsed().as_millis(),
            record.overall_confidence(),
            record.metiers.len()
        );

        Ok(record)
    }

    /// Process one response, scanning its subject then its main message.
    pub fn process_default(&self, raw: &RawResponse) -> Result<ExtractedRecord> {
        let sources: Vec<&str> = [FieldName::Subject, FieldName::MainMessage]
            .iter()
            .filter_map(|name| extraction::payload_text(raw, name.key()))
            .collect();

        self.process(raw, &sources)
    }

    /// Parse provider text (optionally fenced) and process it.
    pub fn process_response_text(&self, text: &str, sources: &[&str]) -> Result<ExtractedRecord> {
        let raw = extraction::parse_response_text(text)?;
        if sources.is_empty() {
            self.process_default(&raw)
        } else {
            self.process(&raw, sources)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DevisError, ExtractionError};
    use serde_json::json;

    fn response() -> RawResponse {
        json!({
            "nom_client": {"value": "Martin", "confidence": 1.0},
            "prenom_client": {"value": "Claire", "confidence": 1.0},
            "adresse": {"value": "4 rue Pasteur", "confidence": 0.9},
            "code_postal": {"value": "69003", "confidence": 0.95},
            "ville": {"value": "Lyon", "confidence": 0.95},
            "date_demande": {"value": "2025-10-02", "confidence": 0.9},
            "objet_devis": {"value": "Volet roulant bloqué", "confidence": 0.9},
            "message_principal": {"value": "Le volet de la chambre ne descend plus", "confidence": 0.9},
            "agence": {"value": "Imo Direct", "confidence": 0.8},
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    fn pipeline() -> ExtractionPipeline {
        ExtractionPipeline::from_config(&DevisConfig::default()).unwrap()
    }

    #[test]
    fn test_process_default_scans_subject_and_message() {
        let record = pipeline().process_default(&response()).unwrap();
        let trades: Vec<_> = record.metiers.iter().filter_map(|m| m.matched_value()).collect();
        assert_eq!(trades, vec!["VOLET-STORE"]);
    }

    #[test]
    fn test_process_default_matches_explicit_sources() {
        let raw = response();
        let by_default = pipeline().process_default(&raw).unwrap();
        let explicit = pipeline()
            .process(&raw, &["Volet roulant bloqué", "Le volet de la chambre ne descend plus"])
            .unwrap();
        assert_eq!(by_default.metiers, explicit.metiers);
        assert_eq!(by_default.required, explicit.required);
    }

    #[test]
    fn test_agency_matched() {
        let record = pipeline().process(&response(), &[]).unwrap();
        let agency = record.agency.unwrap();
        assert_eq!(agency.matched_value(), Some("IMODIRECT"));
        assert!(!agency.requires_validation());
        assert!(record.metiers.is_empty());
    }

    #[test]
    fn test_agency_disabled_with_empty_table() {
        let mut config = DevisConfig::default();
        config.taxonomy.agencies = Default::default();
        let record = ExtractionPipeline::from_config(&config)
            .unwrap()
            .process(&response(), &[])
            .unwrap();
        assert!(record.agency.is_none());
    }

    #[test]
    fn test_missing_field_propagates() {
        let mut raw = response();
        raw.remove("ville");
        let err = pipeline().process(&raw, &["fuite"]).unwrap_err();
        assert!(matches!(
            err,
            DevisError::Extraction(ExtractionError::MissingField(ref f)) if f == "ville"
        ));
    }

    #[test]
    fn test_fenced_response_text() {
        let text = format!("Voici le résultat :\n```json\n{}\n```", serde_json::Value::Object(response()));
        let record = pipeline().process_response_text(&text, &[]).unwrap();
        assert_eq!(record.required.city.text_value().as_deref(), Some("Lyon"));
    }

    #[test]
    fn test_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionPipeline>();
    }
}
