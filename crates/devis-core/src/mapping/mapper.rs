//! Tiered keyword and fuzzy matching against a [`Taxonomy`].

use std::collections::HashSet;

use tracing::debug;

use super::similarity::similarity;
use crate::error::Result;
use crate::models::config::MappingConfig;
use crate::models::enum_match::{EnumMatch, Suggestion};
use crate::models::field::Confidence;
use crate::models::taxonomy::Taxonomy;

/// A taxonomy member prepared for matching.
#[derive(Debug, Clone)]
struct Member {
    name: String,
    name_lower: String,
    keywords: Vec<String>,
}

impl Member {
    fn score(&self, text_lower: &str) -> f32 {
        if text_lower.contains(&self.name_lower) {
            return 1.0;
        }

        self.keywords
            .iter()
            .map(|keyword| {
                if text_lower.contains(keyword.as_str()) {
                    1.0
                } else {
                    similarity(text_lower, keyword)
                }
            })
            .fold(0.0f32, f32::max)
    }
}

/// Maps free text onto the members of one enumeration.
///
/// Built once from an immutable taxonomy and reused across documents.
#[derive(Debug, Clone)]
pub struct EnumMapper {
    members: Vec<Member>,
    config: MappingConfig,
}

impl EnumMapper {
    /// Prepare a mapper for `taxonomy` with the given thresholds.
    pub fn new(taxonomy: &Taxonomy, config: &MappingConfig) -> Result<Self> {
        config.validate()?;
        taxonomy.validate("taxonomy")?;

        let members = taxonomy
            .entries()
            .iter()
            .map(|entry| Member {
                name: entry.name.clone(),
                name_lower: entry.name.to_lowercase(),
                keywords: entry.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        Ok(Self {
            members,
            config: config.clone(),
        })
    }

    /// Candidates scoring above the discard threshold, best first.
    ///
    /// Ties keep taxonomy declaration order.
    pub fn score_members(&self, text: &str) -> Vec<Suggestion> {
        let text_lower = text.to_lowercase();

        let mut scored: Vec<Suggestion> = self
            .members
            .iter()
            .map(|m| Suggestion::new(m.name.clone(), Confidence::clamped(m.score(&text_lower)).value()))
            .filter(|s| s.score > self.config.discard_threshold)
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Match one snippet.
    pub fn match_text(&self, text: &str) -> Result<EnumMatch> {
        let mut suggestions = self.score_members(text);
        let best = suggestions
            .first()
            .filter(|s| s.score >= self.config.tentative_threshold)
            .cloned();

        let enum_match = if let Some(best) = best {
            suggestions.truncate(self.config.matched_suggestions.max(1));
            let requires_validation = best.score < self.config.confident_threshold;
            EnumMatch::new(Some(best.member), best.score, text, suggestions, requires_validation)?
        } else {
            suggestions.truncate(self.config.unmatched_suggestions);
            EnumMatch::new(None, 0.0, text, suggestions, true)?
        };

        debug!(
            "Mapped {:?} to {:?} (confidence {:.2}, review: {})",
            text,
            enum_match.matched_value(),
            enum_match.confidence(),
            enum_match.requires_validation()
        );

        Ok(enum_match)
    }

    /// Match several snippets, keeping one entry per matched member.
    ///
    /// Unmatched results are always kept. Blank snippets are skipped.
    pub fn match_sources(&self, sources: &[&str]) -> Result<Vec<EnumMatch>> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for source in sources.iter().filter(|s| !s.trim().is_empty()) {
            let enum_match = self.match_text(source)?;
            if let Some(value) = enum_match.matched_value() {
                if !seen.insert(value.to_string()) {
                    debug!("Dropping duplicate match {} from {:?}", value, source);
                    continue;
                }
            }
            matches.push(enum_match);
        }

        Ok(matches)
    }
}
