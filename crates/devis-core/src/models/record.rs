//! The record produced by the pipeline for one quote request.

use chrono::{DateTime, Local};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::enum_match::EnumMatch;
use super::field::ExtractedField;

/// Every field a provider response may carry, keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    ClientSurname,
    ClientGivenName,
    Address,
    PostalCode,
    City,
    RequestDate,
    Subject,
    MainMessage,
    Lot,
    Floor,
    Phone,
    Email,
    QuoteNumber,
    DesiredResponseDate,
    Urgency,
}

impl FieldName {
    /// Fields a response must carry, in record order.
    pub const REQUIRED: [FieldName; 8] = [
        FieldName::ClientSurname,
        FieldName::ClientGivenName,
        FieldName::Address,
        FieldName::PostalCode,
        FieldName::City,
        FieldName::RequestDate,
        FieldName::Subject,
        FieldName::MainMessage,
    ];

    /// Fields populated only when present.
    pub const OPTIONAL: [FieldName; 7] = [
        FieldName::Lot,
        FieldName::Floor,
        FieldName::Phone,
        FieldName::Email,
        FieldName::QuoteNumber,
        FieldName::DesiredResponseDate,
        FieldName::Urgency,
    ];

    /// Key used in provider responses and serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            FieldName::ClientSurname => "nom_client",
            FieldName::ClientGivenName => "prenom_client",
            FieldName::Address => "adresse",
            FieldName::PostalCode => "code_postal",
            FieldName::City => "ville",
            FieldName::RequestDate => "date_demande",
            FieldName::Subject => "objet_devis",
            FieldName::MainMessage => "message_principal",
            FieldName::Lot => "lot",
            FieldName::Floor => "etage",
            FieldName::Phone => "telephone",
            FieldName::Email => "email",
            FieldName::QuoteNumber => "numero_devis",
            FieldName::DesiredResponseDate => "date_reponse_souhaitee",
            FieldName::Urgency => "urgence",
        }
    }

    /// Human-readable label for review screens.
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::ClientSurname => "Nom client",
            FieldName::ClientGivenName => "Prénom client",
            FieldName::Address => "Adresse",
            FieldName::PostalCode => "Code postal",
            FieldName::City => "Ville",
            FieldName::RequestDate => "Date demande",
            FieldName::Subject => "Objet",
            FieldName::MainMessage => "Message",
            FieldName::Lot => "Lot",
            FieldName::Floor => "Étage",
            FieldName::Phone => "Téléphone",
            FieldName::Email => "Email",
            FieldName::QuoteNumber => "Numéro de devis",
            FieldName::DesiredResponseDate => "Date de réponse souhaitée",
            FieldName::Urgency => "Urgence",
        }
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

/// Required fields of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredFields {
    pub client_surname: ExtractedField,
    pub client_given_name: ExtractedField,
    pub address: ExtractedField,
    pub postal_code: ExtractedField,
    pub city: ExtractedField,
    pub request_date: ExtractedField,
    pub subject: ExtractedField,
    pub main_message: ExtractedField,
}

/// Optional fields of a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionalFields {
    pub lot: Option<ExtractedField>,
    pub floor: Option<ExtractedField>,
    pub phone: Option<ExtractedField>,
    pub email: Option<ExtractedField>,
    pub quote_number: Option<ExtractedField>,
    pub desired_response_date: Option<ExtractedField>,
    pub urgency: Option<ExtractedField>,
}

/// Full pipeline output for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRecord {
    pub required: RequiredFields,
    pub optional: OptionalFields,
    /// Trades detected in the free-text sources.
    pub metiers: Vec<EnumMatch>,
    /// Issuing agency, when the response names one.
    pub agency: Option<EnumMatch>,
    extraction_timestamp: DateTime<Local>,
}

impl ExtractedRecord {
    /// Create a record stamped with the current time.
    pub fn new(required: RequiredFields, optional: OptionalFields) -> Self {
        Self {
            required,
            optional,
            metiers: Vec::new(),
            agency: None,
            extraction_timestamp: Local::now(),
        }
    }

    pub fn extraction_timestamp(&self) -> DateTime<Local> {
        self.extraction_timestamp
    }

    /// Look up a field by name. Optional fields may be absent.
    pub fn field(&self, name: FieldName) -> Option<&ExtractedField> {
        let r = &self.required;
        let o = &self.optional;
        match name {
            FieldName::ClientSurname => Some(&r.client_surname),
            FieldName::ClientGivenName => Some(&r.client_given_name),
            FieldName::Address => Some(&r.address),
            FieldName::PostalCode => Some(&r.postal_code),
            FieldName::City => Some(&r.city),
            FieldName::RequestDate => Some(&r.request_date),
            FieldName::Subject => Some(&r.subject),
            FieldName::MainMessage => Some(&r.main_message),
            FieldName::Lot => o.lot.as_ref(),
            FieldName::Floor => o.floor.as_ref(),
            FieldName::Phone => o.phone.as_ref(),
            FieldName::Email => o.email.as_ref(),
            FieldName::QuoteNumber => o.quote_number.as_ref(),
            FieldName::DesiredResponseDate => o.desired_response_date.as_ref(),
            FieldName::Urgency => o.urgency.as_ref(),
        }
    }

    /// Required fields paired with their names, in record order.
    pub fn required_fields(&self) -> impl Iterator<Item = (FieldName, &ExtractedField)> {
        FieldName::REQUIRED
            .into_iter()
            .filter_map(move |name| self.field(name).map(|f| (name, f)))
    }

    /// Present optional fields paired with their names.
    pub fn optional_fields(&self) -> impl Iterator<Item = (FieldName, &ExtractedField)> {
        FieldName::OPTIONAL
            .into_iter()
            .filter_map(move |name| self.field(name).map(|f| (name, f)))
    }

    /// Mean confidence of the required fields, computed on every call.
    pub fn overall_confidence(&self) -> f32 {
        let (sum, count) = self
            .required_fields()
            .fold((0.0f32, 0usize), |(sum, n), (_, f)| (sum + f.confidence(), n + 1));
        if count == 0 { 0.0 } else { sum / count as f32 }
    }

    /// Trades matched without needing review.
    pub fn confirmed_metiers(&self) -> impl Iterator<Item = &str> {
        self.metiers
            .iter()
            .filter(|m| !m.requires_validation())
            .filter_map(|m| m.matched_value())
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, field) in self.required_fields().chain(self.optional_fields()) {
            map.serialize_entry(name.key(), field)?;
        }
        map.serialize_entry("metiers", &self.metiers)?;
        if let Some(agency) = &self.agency {
            map.serialize_entry("agence", agency)?;
        }
        map.serialize_entry("overall_confidence", &self.overall_confidence())?;
        map.serialize_entry("extraction_date", &self.extraction_timestamp.to_rfc3339())?;
        map.end()
    }
}
