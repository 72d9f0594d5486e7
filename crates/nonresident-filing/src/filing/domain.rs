use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::validators::{OwnershipEntry, TaxIdKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub Uuid);

impl OwnerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Resolve the opaque owner reference carried by an ownership entry.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for OwnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(pub Uuid);

impl PropertyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    Individual,
    Company,
}

/// Street types accepted by the Spanish address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetType {
    Calle,
    Avenida,
    Plaza,
    Paseo,
    Carretera,
    Camino,
    Travesia,
    Urbanizacion,
    Otro,
}

/// Raw owner form data, as typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSubmission {
    pub owner_type: OwnerType,
    pub tax_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    pub residence_country: String,
    pub residence_address: String,
    pub residence_city: String,
    pub residence_postal_code: String,
    #[serde(default)]
    pub iban: Option<String>,
}

/// Owner data after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub owner_type: OwnerType,
    pub tax_id: String,
    pub tax_id_type: TaxIdKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub residence: FiscalResidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
}

impl OwnerProfile {
    pub fn display_name(&self) -> String {
        match self.owner_type {
            OwnerType::Company => self.company_name.clone().unwrap_or_default(),
            OwnerType::Individual => [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Foreign tax residence of an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FiscalResidence {
    /// ISO 3166-1 alpha-2, uppercase.
    pub country: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// Raw property form data, including the co-ownership table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySubmission {
    pub street_type: StreetType,
    pub street_name: String,
    pub street_number: String,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub door: Option<String>,
    #[serde(default)]
    pub staircase: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub cadastral_reference: String,
    pub cadastral_value: String,
    #[serde(default)]
    pub collective_revision: bool,
    #[serde(default)]
    pub revision_year: Option<String>,
    pub owners: Vec<OwnershipEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAddress {
    pub street_type: StreetType,
    pub street_name: String,
    pub street_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub door: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staircase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// Property data after validation and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyProfile {
    pub address: PropertyAddress,
    pub cadastral_reference: String,
    pub cadastral_value_cents: i64,
    pub collective_revision: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision_year: Option<i32>,
    pub owners: Vec<OwnershipEntry>,
}
