use chrono::{Datelike, Utc};

use super::domain::{
    FiscalResidence, OwnerProfile, OwnerSubmission, OwnerType, PropertyAddress, PropertyProfile,
    PropertySubmission,
};
use crate::validators::{
    check_ownership, CadastralReference, Iban, IbanErrorCode, OwnershipErrorCode, TaxId,
};

/// Reason an owner or property submission was rejected. `code()` is the contract string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FilingViolation {
    #[error("tax ID is required")]
    TaxIdRequired,
    #[error("tax ID is not a valid NIF or NIE")]
    TaxIdInvalid,
    #[error("first name is required for individual owners")]
    FirstNameRequired,
    #[error("last name is required for individual owners")]
    LastNameRequired,
    #[error("company name is required for company owners")]
    CompanyNameRequired,
    #[error("country of residence is required")]
    CountryRequired,
    #[error("country of residence must be an ISO 3166 alpha-2 code")]
    CountryInvalid,
    #[error("address is required")]
    AddressRequired,
    #[error("city is required")]
    CityRequired,
    #[error("postal code is required")]
    PostalCodeRequired,
    #[error("Spanish postal codes have five digits")]
    PostalCodeInvalid,
    #[error("street name is required")]
    StreetNameRequired,
    #[error("street number is required")]
    StreetNumberRequired,
    #[error("province is required")]
    ProvinceRequired,
    #[error("cadastral reference is required")]
    CadastralReferenceRequired,
    #[error("cadastral reference failed its control check")]
    CadastralReferenceInvalid,
    #[error("cadastral value is required")]
    CadastralValueRequired,
    #[error("cadastral value must be a positive amount with at most two decimals")]
    CadastralValueInvalid,
    #[error("revision year must be a four digit year that is not in the future")]
    RevisionYearInvalid,
    #[error(transparent)]
    Iban(#[from] IbanErrorCode),
    #[error(transparent)]
    Ownership(#[from] OwnershipErrorCode),
}

impl FilingViolation {
    pub fn code(&self) -> &'static str {
        match self {
            FilingViolation::TaxIdRequired => "taxIdRequired",
            FilingViolation::TaxIdInvalid => "taxIdInvalid",
            FilingViolation::FirstNameRequired => "firstNameRequired",
            FilingViolation::LastNameRequired => "lastNameRequired",
            FilingViolation::CompanyNameRequired => "companyNameRequired",
            FilingViolation::CountryRequired => "countryRequired",
            FilingViolation::CountryInvalid => "countryInvalid",
            FilingViolation::AddressRequired => "addressRequired",
            FilingViolation::CityRequired => "cityRequired",
            FilingViolation::PostalCodeRequired => "postalCodeRequired",
            FilingViolation::PostalCodeInvalid => "postalCodeInvalid",
            FilingViolation::StreetNameRequired => "streetNameRequired",
            FilingViolation::StreetNumberRequired => "streetNumberRequired",
            FilingViolation::ProvinceRequired => "provinceRequired",
            FilingViolation::CadastralReferenceRequired => "cadastralReferenceRequired",
            FilingViolation::CadastralReferenceInvalid => "cadastralReferenceInvalid",
            FilingViolation::CadastralValueRequired => "cadastralValueRequired",
            FilingViolation::CadastralValueInvalid => "cadastralValueInvalid",
            FilingViolation::RevisionYearInvalid => "revisionYearInvalid",
            FilingViolation::Iban(code) => code.code(),
            FilingViolation::Ownership(code) => code.code(),
        }
    }
}

/// Turns raw form submissions into normalized profiles, first failure wins.
#[derive(Debug, Clone)]
pub struct FilingGuard {
    current_year: i32,
}

impl Default for FilingGuard {
    fn default() -> Self {
        Self::for_year(Utc::now().year())
    }
}

impl FilingGuard {
    /// Guard that treats `current_year` as the latest acceptable revision year.
    pub fn for_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn owner_from_submission(
        &self,
        submission: OwnerSubmission,
    ) -> Result<OwnerProfile, FilingViolation> {
        if is_blank(&submission.tax_id) {
            return Err(FilingViolation::TaxIdRequired);
        }
        let tax_id = TaxId::parse(&submission.tax_id).ok_or(FilingViolation::TaxIdInvalid)?;

        let first_name = non_blank(submission.first_name);
        let last_name = non_blank(submission.last_name);
        let company_name = non_blank(submission.company_name);
        match submission.owner_type {
            OwnerType::Individual => {
                if first_name.is_none() {
                    return Err(FilingViolation::FirstNameRequired);
                }
                if last_name.is_none() {
                    return Err(FilingViolation::LastNameRequired);
                }
            }
            OwnerType::Company => {
                if company_name.is_none() {
                    return Err(FilingViolation::CompanyNameRequired);
                }
            }
        }

        let country = submission.residence_country.trim();
        if country.is_empty() {
            return Err(FilingViolation::CountryRequired);
        }
        if country.len() != 2 || !country.bytes().all(|c| c.is_ascii_alphabetic()) {
            return Err(FilingViolation::CountryInvalid);
        }
        let address = required(submission.residence_address, FilingViolation::AddressRequired)?;
        let city = required(submission.residence_city, FilingViolation::CityRequired)?;
        let postal_code = required(
            submission.residence_postal_code,
            FilingViolation::PostalCodeRequired,
        )?;

        let iban = match non_blank(submission.iban) {
            Some(raw) => Some(Iban::parse(&raw)?.into_inner()),
            None => None,
        };

        let tax_id_type = tax_id.kind();
        Ok(OwnerProfile {
            owner_type: submission.owner_type,
            tax_id: tax_id.into_inner(),
            tax_id_type,
            first_name,
            last_name,
            company_name,
            residence: FiscalResidence {
                country: country.to_ascii_uppercase(),
                address,
                city,
                postal_code,
            },
            iban,
        })
    }

    pub fn property_from_submission(
        &self,
        submission: PropertySubmission,
    ) -> Result<PropertyProfile, FilingViolation> {
        let street_name = required(submission.street_name, FilingViolation::StreetNameRequired)?;
        let street_number =
            required(submission.street_number, FilingViolation::StreetNumberRequired)?;
        let city = required(submission.city, FilingViolation::CityRequired)?;
        let province = required(submission.province, FilingViolation::ProvinceRequired)?;
        let postal_code = required(submission.postal_code, FilingViolation::PostalCodeRequired)?;
        if postal_code.len() != 5 || !postal_code.bytes().all(|c| c.is_ascii_digit()) {
            return Err(FilingViolation::PostalCodeInvalid);
        }

        if is_blank(&submission.cadastral_reference) {
            return Err(FilingViolation::CadastralReferenceRequired);
        }
        let cadastral_reference = CadastralReference::parse(&submission.cadastral_reference)
            .ok_or(FilingViolation::CadastralReferenceInvalid)?;

        if is_blank(&submission.cadastral_value) {
            return Err(FilingViolation::CadastralValueRequired);
        }
        let cadastral_value_cents = parse_cents(&submission.cadastral_value)
            .filter(|cents| *cents > 0)
            .ok_or(FilingViolation::CadastralValueInvalid)?;

        let revision_year = match non_blank(submission.revision_year) {
            Some(raw) => Some(
                parse_year(&raw)
                    .filter(|year| *year <= self.current_year)
                    .ok_or(FilingViolation::RevisionYearInvalid)?,
            ),
            None => None,
        };

        check_ownership(&submission.owners)?;

        Ok(PropertyProfile {
            address: PropertyAddress {
                street_type: submission.street_type,
                street_name,
                street_number,
                floor: non_blank(submission.floor),
                door: non_blank(submission.door),
                staircase: non_blank(submission.staircase),
                block: non_blank(submission.block),
                city,
                province,
                postal_code,
            },
            cadastral_reference: cadastral_reference.into_inner(),
            cadastral_value_cents,
            collective_revision: submission.collective_revision,
            revision_year,
            owners: submission.owners,
        })
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn required(value: String, violation: FilingViolation) -> Result<String, FilingViolation> {
    non_blank(Some(value)).ok_or(violation)
}

/// Parse a euro amount with `.` or `,` as decimal separator into cents.
pub(crate) fn parse_cents(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let (units, fraction) = match trimmed.find(['.', ',']) {
        // a separator must be followed by at least one digit
        Some(index) if index + 1 == trimmed.len() => return None,
        Some(index) => (&trimmed[..index], &trimmed[index + 1..]),
        None => (trimmed, ""),
    };

    if units.is_empty()
        || !units.bytes().all(|c| c.is_ascii_digit())
        || fraction.len() > 2
        || !fraction.bytes().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let units: i64 = units.parse().ok()?;
    let fraction_cents = match fraction.len() {
        0 => 0,
        1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
        _ => fraction.parse::<i64>().ok()?,
    };

    units.checked_mul(100)?.checked_add(fraction_cents)
}

fn parse_year(raw: &str) -> Option<i32> {
    if raw.len() != 4 || !raw.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cents_accepts_both_separators() {
        assert_eq!(parse_cents("123456.78"), Some(12_345_678));
        assert_eq!(parse_cents("123456,7"), Some(12_345_670));
        assert_eq!(parse_cents(" 85000 "), Some(8_500_000));
        assert_eq!(parse_cents("0.05"), Some(5));
    }

    #[test]
    fn parse_cents_rejects_malformed_amounts() {
        for raw in [
            "",
            ".50",
            "12.",
            "12,",
            "12.345",
            "1.2.3",
            "-10",
            "12a",
            "1e5",
            "99999999999999999999",
        ] {
            assert_eq!(parse_cents(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn parse_year_requires_four_digits() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year("219"), None);
        assert_eq!(parse_year("20x9"), None);
    }

    #[test]
    fn nested_codes_pass_through() {
        assert_eq!(
            FilingViolation::from(IbanErrorCode::IbanChecksumInvalid).code(),
            "ibanChecksumInvalid"
        );
        assert_eq!(
            FilingViolation::from(OwnershipErrorCode::PercentageUnder100).code(),
            "percentageUnder100"
        );
    }
}
