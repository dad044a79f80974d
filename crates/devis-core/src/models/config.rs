//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use super::enum_match::MAX_SUGGESTIONS;
use super::taxonomy::Taxonomy;
use crate::error::{DevisError, Result};

/// Main configuration for the devis pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevisConfig {
    /// Enumeration mapping thresholds.
    pub mapping: MappingConfig,

    /// Confidence penalties for failed normalization.
    pub validation: ValidationConfig,

    /// Review report settings.
    pub review: ReviewConfig,

    /// Enumerations to map free text onto.
    pub taxonomy: TaxonomyConfig,
}

/// Thresholds for the enumeration mapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Candidates scoring at or below this are dropped.
    pub discard_threshold: f32,

    /// Lowest top score that still yields a (reviewable) match.
    pub tentative_threshold: f32,

    /// Lowest top score accepted without review.
    pub confident_threshold: f32,

    /// Suggestions kept when a member matched.
    pub matched_suggestions: usize,

    /// Suggestions kept when nothing matched.
    pub unmatched_suggestions: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            discard_threshold: 0.3,
            tentative_threshold: 0.6,
            confident_threshold: 0.85,
            matched_suggestions: 3,
            unmatched_suggestions: 5,
        }
    }
}

/// Multiplicative penalties applied when a rule rejects a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub postal_code_penalty: f32,
    pub phone_penalty: f32,
    /// Steeper than the others: an unparsed date is rarely usable.
    pub date_penalty: f32,
    pub email_penalty: f32,
    pub flag_penalty: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            postal_code_penalty: 0.5,
            phone_penalty: 0.5,
            date_penalty: 0.3,
            email_penalty: 0.5,
            flag_penalty: 0.5,
        }
    }
}

/// Review report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Overall confidence needed for unattended acceptance.
    pub auto_insert_threshold: f32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            auto_insert_threshold: 0.85,
        }
    }
}

/// Enumeration tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyConfig {
    /// Trade categories.
    pub trades: Taxonomy,

    /// Issuing agencies. Empty disables agency matching.
    pub agencies: Taxonomy,
}

impl Default for TaxonomyConfig {
    fn default() -> Self {
        Self {
            trades: Taxonomy::default_trades(),
            agencies: Taxonomy::default_agencies(),
        }
    }
}

fn check_unit(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DevisError::Config(format!("{} must be within [0, 1], got {}", name, value)))
    }
}

impl MappingConfig {
    /// Check threshold ranges and tier ordering.
    pub fn validate(&self) -> Result<()> {
        check_unit("mapping.discard_threshold", self.discard_threshold)?;
        check_unit("mapping.tentative_threshold", self.tentative_threshold)?;
        check_unit("mapping.confident_threshold", self.confident_threshold)?;

        if self.tentative_threshold > self.confident_threshold {
            return Err(DevisError::Config(
                "mapping.tentative_threshold exceeds mapping.confident_threshold".to_string(),
            ));
        }
        if self.discard_threshold > self.tentative_threshold {
            return Err(DevisError::Config(
                "mapping.discard_threshold exceeds mapping.tentative_threshold".to_string(),
            ));
        }
        for (name, limit) in [
            ("mapping.matched_suggestions", self.matched_suggestions),
            ("mapping.unmatched_suggestions", self.unmatched_suggestions),
        ] {
            if limit > MAX_SUGGESTIONS {
                return Err(DevisError::Config(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_SUGGESTIONS, limit
                )));
            }
        }
        Ok(())
    }
}

impl ValidationConfig {
    pub fn validate(&self) -> Result<()> {
        check_unit("validation.postal_code_penalty", self.postal_code_penalty)?;
        check_unit("validation.phone_penalty", self.phone_penalty)?;
        check_unit("validation.date_penalty", self.date_penalty)?;
        check_unit("validation.email_penalty", self.email_penalty)?;
        check_unit("validation.flag_penalty", self.flag_penalty)
    }
}

impl DevisConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.mapping.validate()?;
        self.validation.validate()?;
        self.taxonomy.trades.validate("taxonomy.trades")?;
        self.taxonomy.agencies.validate("taxonomy.agencies")?;
        check_unit("review.auto_insert_threshold", self.review.auto_insert_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DevisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mapping.confident_threshold, 0.85);
        assert_eq!(config.validation.date_penalty, 0.3);
        assert!(!config.taxonomy.trades.is_empty());
    }

    #[test]
    fn test_inverted_tiers_rejected() {
        let mut config = DevisConfig::default();
        config.mapping.tentative_threshold = 0.9;
        assert!(matches!(config.validate(), Err(DevisError::Config(_))));
    }

    #[test]
    fn test_blank_taxonomy_keyword_rejected() {
        use crate::models::taxonomy::TaxonomyEntry;

        let mut config = DevisConfig::default();
        let mut entries = config.taxonomy.trades.entries().to_vec();
        entries.push(TaxonomyEntry::new("JARDIN-X", &["haie", ""]));
        config.taxonomy.trades = Taxonomy::new(entries);
        assert!(matches!(config.validate(), Err(DevisError::Config(_))));
    }

    #[test]
    fn test_penalty_out_of_range_rejected() {
        let mut config = DevisConfig::default();
        config.validation.phone_penalty = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"review": {"auto_insert_threshold": 0.9}}"#).unwrap();

        let config = DevisConfig::from_file(&path).unwrap();
        assert_eq!(config.review.auto_insert_threshold, 0.9);
        assert_eq!(config.mapping, MappingConfig::default());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = DevisConfig::default();
        config.save(&path).unwrap();
        assert_eq!(DevisConfig::from_file(&path).unwrap(), config);
    }
}
