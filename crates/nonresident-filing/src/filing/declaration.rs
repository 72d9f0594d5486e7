//! Imputed-income declarations for urban property that is not rented out.
//!
//! Each co-owner declares their share of the imputed income separately. Amounts are kept
//! in cents and rates in basis points; every product is computed in `i128` and rounded
//! half-up once at the end.

use serde::{Deserialize, Serialize};

use super::domain::{OwnerProfile, PropertyId, PropertyProfile};
use crate::validators::{format_hundredths, OwnershipEntry};

const BASIS_POINTS: i128 = 10_000;

/// Residence countries taxed at the EU/EEA rate.
const EEA_COUNTRIES: [&str; 30] = [
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IE",
    "IS", "IT", "LI", "LT", "LU", "LV", "MT", "NL", "NO", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Imputation and tax rates, in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRates {
    /// Applied when the municipality went through a collective cadastral revision.
    pub reduced_imputation_bp: u32,
    pub standard_imputation_bp: u32,
    pub eea_tax_bp: u32,
    pub other_tax_bp: u32,
}

impl Default for DeclarationRates {
    fn default() -> Self {
        Self {
            reduced_imputation_bp: 110,
            standard_imputation_bp: 200,
            eea_tax_bp: 1_900,
            other_tax_bp: 2_400,
        }
    }
}

impl DeclarationRates {
    pub fn imputation_bp(&self, collective_revision: bool) -> u32 {
        if collective_revision {
            self.reduced_imputation_bp
        } else {
            self.standard_imputation_bp
        }
    }

    pub fn tax_bp(&self, residence_country: &str) -> u32 {
        if is_eea_resident(residence_country) {
            self.eea_tax_bp
        } else {
            self.other_tax_bp
        }
    }
}

pub fn is_eea_resident(country: &str) -> bool {
    let country = country.trim();
    EEA_COUNTRIES
        .iter()
        .any(|code| code.eq_ignore_ascii_case(country))
}

/// One co-owner's declaration for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDeclaration {
    pub owner_id: String,
    pub owner_name: String,
    pub tax_id: String,
    pub residence_country: String,
    pub share_basis_points: i64,
    pub imputation_rate_bp: u32,
    pub imputed_income_cents: i64,
    pub tax_rate_bp: u32,
    pub tax_due_cents: i64,
    pub imputed_income_display: String,
    pub tax_due_display: String,
}

/// Declarations for every co-owner of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDeclaration {
    pub property_id: PropertyId,
    pub cadastral_reference: String,
    pub cadastral_value_cents: i64,
    pub owners: Vec<OwnerDeclaration>,
}

impl PropertyDeclaration {
    pub fn total_tax_due_cents(&self) -> i64 {
        self.owners.iter().map(|owner| owner.tax_due_cents).sum()
    }
}

/// Whole-property imputed income scaled to one owner's share.
pub fn imputed_income_cents(
    cadastral_value_cents: i64,
    imputation_bp: u32,
    share_basis_points: i64,
) -> i64 {
    let numerator = i128::from(cadastral_value_cents)
        * i128::from(imputation_bp)
        * i128::from(share_basis_points);
    round_half_up(numerator, BASIS_POINTS * BASIS_POINTS)
}

pub fn tax_due_cents(imputed_income_cents: i64, tax_bp: u32) -> i64 {
    round_half_up(
        i128::from(imputed_income_cents) * i128::from(tax_bp),
        BASIS_POINTS,
    )
}

pub fn owner_declaration(
    property: &PropertyProfile,
    entry: &OwnershipEntry,
    owner: &OwnerProfile,
    rates: &DeclarationRates,
) -> OwnerDeclaration {
    let share_basis_points = entry.basis_points();
    let imputation_rate_bp = rates.imputation_bp(property.collective_revision);
    let imputed = imputed_income_cents(
        property.cadastral_value_cents,
        imputation_rate_bp,
        share_basis_points,
    );
    let tax_rate_bp = rates.tax_bp(&owner.residence.country);
    let tax_due = tax_due_cents(imputed, tax_rate_bp);

    OwnerDeclaration {
        owner_id: entry.owner_id.clone(),
        owner_name: owner.display_name(),
        tax_id: owner.tax_id.clone(),
        residence_country: owner.residence.country.clone(),
        share_basis_points,
        imputation_rate_bp,
        imputed_income_cents: imputed,
        tax_rate_bp,
        tax_due_cents: tax_due,
        imputed_income_display: format_hundredths(imputed),
        tax_due_display: format_hundredths(tax_due),
    }
}

/// Half-up division for non-negative numerators; results beyond `i64` saturate.
fn round_half_up(numerator: i128, denominator: i128) -> i64 {
    let quotient = (numerator + denominator / 2).div_euclid(denominator);
    i64::try_from(quotient).unwrap_or(if quotient < 0 { i64::MIN } else { i64::MAX })
}
