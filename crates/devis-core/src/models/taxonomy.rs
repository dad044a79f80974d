//! Closed enumerations that free text is mapped onto.

use serde::{Deserialize, Serialize};

use crate::error::{DevisError, Result};

/// One enumeration member and the keywords that hint at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    /// Canonical member name.
    pub name: String,

    /// Keywords that suggest this member.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl TaxonomyEntry {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// An ordered enumeration. Declaration order breaks score ties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    pub fn new(entries: Vec<TaxonomyEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TaxonomyEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Find a member by canonical name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&TaxonomyEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Reject blank member names and keywords, which would match any text.
    ///
    /// `table` names the table in error messages (e.g. "taxonomy.trades").
    pub fn validate(&self, table: &str) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(DevisError::Config(format!(
                    "{}[{}] has a blank name",
                    table, index
                )));
            }
            if entry.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(DevisError::Config(format!(
                    "{} entry {} has a blank keyword",
                    table, entry.name
                )));
            }
        }
        Ok(())
    }

    /// Trade categories used for maintenance quote requests.
    pub fn default_trades() -> Self {
        Self::new(vec![
            TaxonomyEntry::new("AUTRES", &[]),
            TaxonomyEntry::new(
                "BRICOLAGE",
                &["bricolage", "petit travaux", "divers", "fixation", "montage", "installation"],
            ),
            TaxonomyEntry::new("CAMION", &[]),
            TaxonomyEntry::new(
                "CHAUFFAGE",
                &[
                    "chauffage",
                    "chaudière",
                    "radiateur",
                    "thermostat",
                    "ballon d'eau chaude",
                    "température",
                    "froid",
                    "chauffe",
                ],
            ),
            TaxonomyEntry::new(
                "CLIMATISATION",
                &[
                    "climatisation",
                    "clim",
                    "climatiseur",
                    "ventilation",
                    "vmc",
                    "rafraîchissement",
                    "air conditionné",
                ],
            ),
            TaxonomyEntry::new(
                "ELECTRICITE",
                &[
                    "électricité",
                    "électricien",
                    "panne",
                    "courant",
                    "disjoncteur",
                    "tableau électrique",
                    "prise",
                    "interrupteur",
                    "lumière",
                    "éclairage",
                    "installation électrique",
                ],
            ),
            TaxonomyEntry::new(
                "JARDINAGE",
                &[
                    "jardinage",
                    "jardinier",
                    "jardin",
                    "espaces verts",
                    "tonte",
                    "pelouse",
                    "haie",
                    "taille",
                    "élagage",
                ],
            ),
            TaxonomyEntry::new(
                "MENUISIER",
                &[
                    "menuiserie",
                    "menuisier",
                    "bois",
                    "parquet",
                    "porte en bois",
                    "placard",
                    "étagère",
                    "meuble",
                ],
            ),
            TaxonomyEntry::new("MULTI-SERVICE", &[]),
            TaxonomyEntry::new(
                "MENAGE",
                &["ménage", "nettoyage", "nettoyer", "entretien", "propreté", "fin de chantier"],
            ),
            TaxonomyEntry::new(
                "NUISIBLE",
                &[
                    "nuisible",
                    "rat",
                    "souris",
                    "cafard",
                    "punaise",
                    "insecte",
                    "dératisation",
                    "désinsectisation",
                ],
            ),
            TaxonomyEntry::new(
                "PEINTURE",
                &[
                    "peinture",
                    "peintre",
                    "repeindre",
                    "ravalement",
                    "mur",
                    "plafond",
                    "enduit",
                    "tapisserie",
                ],
            ),
            TaxonomyEntry::new(
                "PLOMBERIE",
                &[
                    "plomberie",
                    "plombier",
                    "fuite",
                    "eau",
                    "robinet",
                    "chasse d'eau",
                    "wc",
                    "lavabo",
                    "évier",
                    "canalisation",
                    "tuyau",
                    "sanitaire",
                    "salle de bain",
                ],
            ),
            TaxonomyEntry::new("RDF", &[]),
            TaxonomyEntry::new(
                "RENOVATION",
                &[
                    "rénovation",
                    "travaux",
                    "réfection",
                    "modernisation",
                    "aménagement",
                    "transformation",
                ],
            ),
            TaxonomyEntry::new(
                "SERRURERIE",
                &[
                    "serrurerie",
                    "serrurier",
                    "porte",
                    "clé",
                    "serrure",
                    "verrou",
                    "cylindre",
                    "ouverture de porte",
                    "claquée",
                    "fermeture",
                    "sécurité",
                ],
            ),
            TaxonomyEntry::new(
                "VITRERIE",
                &[
                    "vitrerie",
                    "vitrier",
                    "vitre",
                    "fenêtre",
                    "double vitrage",
                    "carreau",
                    "bris de glace",
                    "verre",
                ],
            ),
            TaxonomyEntry::new(
                "VOLET-STORE",
                &["volet", "store", "persienne", "rideau métallique", "motorisation", "manivelle"],
            ),
        ])
    }

    /// Agencies that issue quote requests.
    pub fn default_agencies() -> Self {
        Self::new(vec![
            TaxonomyEntry::new("OQORO", &[]),
            TaxonomyEntry::new("IMODIRECT", &["imo direct"]),
            TaxonomyEntry::new("FLATLOOKER", &["flat looker"]),
            TaxonomyEntry::new("AFEDIM", &[]),
            TaxonomyEntry::new("HOMEPILOT", &["home pilot"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trades() {
        let trades = Taxonomy::default_trades();
        assert_eq!(trades.len(), 18);
        assert!(trades.get("menage").is_some());
        assert!(trades.get("CAMION").unwrap().keywords.is_empty());
    }

    #[test]
    fn test_taxonomy_json_shape() {
        let json = r#"[{"name": "PLOMBERIE", "keywords": ["fuite"]}, {"name": "AUTRES"}]"#;
        let taxonomy: Taxonomy = serde_json::from_str(json).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.entries()[0].keywords, vec!["fuite".to_string()]);
        assert!(taxonomy.entries()[1].keywords.is_empty());
    }

    #[test]
    fn test_blank_entries_rejected() {
        assert!(Taxonomy::default_trades().validate("taxonomy.trades").is_ok());

        let blank_keyword = Taxonomy::new(vec![TaxonomyEntry::new("JARDIN-X", &["haie", " "])]);
        let err = blank_keyword.validate("taxonomy.trades").unwrap_err();
        assert!(err.to_string().contains("JARDIN-X"));

        let blank_name = Taxonomy::new(vec![TaxonomyEntry::new("", &["haie"])]);
        assert!(matches!(
            blank_name.validate("taxonomy.agencies"),
            Err(DevisError::Config(msg)) if msg.contains("taxonomy.agencies[0]")
        ));
    }
}
