use super::common::*;
use crate::filing::domain::{OwnerSubmission, OwnerType, PropertySubmission};
use crate::filing::guard::FilingViolation;
use crate::validators::{IbanErrorCode, OwnershipEntry, OwnershipErrorCode, TaxIdKind};

fn full_owner() -> Vec<OwnershipEntry> {
    vec![OwnershipEntry::new("owner-1", 100.0)]
}

#[test]
fn guard_normalizes_accepted_owners() {
    let profile = guard()
        .owner_from_submission(individual_submission())
        .expect("individual accepted");

    assert_eq!(profile.tax_id, "X1234567L");
    assert_eq!(profile.tax_id_type, TaxIdKind::Nie);
    assert_eq!(profile.first_name.as_deref(), Some("Claire"));
    assert_eq!(profile.residence.country, "FR");
    assert_eq!(
        profile.iban.as_deref(),
        Some("FR1420041010050500013M02606")
    );
    assert_eq!(profile.display_name(), "Claire Dubois");
}

#[test]
fn guard_accepts_companies_without_personal_names() {
    let profile = guard()
        .owner_from_submission(company_submission())
        .expect("company accepted");

    assert_eq!(profile.tax_id_type, TaxIdKind::Nif);
    assert_eq!(profile.display_name(), "Harbour Holdings Ltd");
    assert!(profile.iban.is_none());
}

fn owner_violation(mutate: impl FnOnce(&mut OwnerSubmission)) -> FilingViolation {
    let mut submission = individual_submission();
    mutate(&mut submission);
    guard()
        .owner_from_submission(submission)
        .expect_err("submission should be rejected")
}

fn property_violation(mutate: impl FnOnce(&mut PropertySubmission)) -> FilingViolation {
    let mut submission = property_submission(full_owner());
    mutate(&mut submission);
    guard()
        .property_from_submission(submission)
        .expect_err("submission should be rejected")
}

#[test]
fn guard_reports_owner_violations_in_form_order() {
    assert_eq!(
        owner_violation(|s| s.tax_id = "   ".to_string()),
        FilingViolation::TaxIdRequired
    );
    assert_eq!(
        owner_violation(|s| s.tax_id = "12345678A".to_string()),
        FilingViolation::TaxIdInvalid
    );
    assert_eq!(
        owner_violation(|s| s.first_name = Some(String::new())),
        FilingViolation::FirstNameRequired
    );
    assert_eq!(
        owner_violation(|s| s.last_name = None),
        FilingViolation::LastNameRequired
    );
    assert_eq!(
        owner_violation(|s| s.residence_country = " ".to_string()),
        FilingViolation::CountryRequired
    );
    assert_eq!(
        owner_violation(|s| s.residence_country = "FRA".to_string()),
        FilingViolation::CountryInvalid
    );
    assert_eq!(
        owner_violation(|s| s.residence_address = String::new()),
        FilingViolation::AddressRequired
    );
    assert_eq!(
        owner_violation(|s| s.residence_city = String::new()),
        FilingViolation::CityRequired
    );
    assert_eq!(
        owner_violation(|s| s.residence_postal_code = String::new()),
        FilingViolation::PostalCodeRequired
    );
    assert_eq!(
        owner_violation(|s| s.iban = Some("FR1520041010050500013M02606".to_string())),
        FilingViolation::Iban(IbanErrorCode::IbanChecksumInvalid)
    );
}

#[test]
fn guard_reports_the_first_failure_only() {
    let violation = owner_violation(|s| {
        s.tax_id = "bogus".to_string();
        s.residence_country = String::new();
    });
    assert_eq!(violation.code(), "taxIdInvalid");
}

#[test]
fn guard_requires_company_name_for_companies() {
    let mut submission = company_submission();
    submission.owner_type = OwnerType::Company;
    submission.company_name = Some("  ".to_string());

    match guard().owner_from_submission(submission) {
        Err(FilingViolation::CompanyNameRequired) => {}
        other => panic!("expected company name violation, got {other:?}"),
    }
}

#[test]
fn guard_treats_blank_iban_as_not_provided() {
    let mut submission = individual_submission();
    submission.iban = Some("   ".to_string());

    let profile = guard()
        .owner_from_submission(submission)
        .expect("blank iban is optional");
    assert!(profile.iban.is_none());
}

#[test]
fn guard_normalizes_accepted_properties() {
    let profile = guard()
        .property_from_submission(property_submission(full_owner()))
        .expect("property accepted");

    assert_eq!(profile.cadastral_reference, VALID_CADASTRAL);
    assert_eq!(profile.cadastral_value_cents, 8_500_000);
    assert_eq!(profile.address.floor.as_deref(), Some("2"));
    assert!(profile.address.staircase.is_none());
    assert!(profile.revision_year.is_none());
}

#[test]
fn guard_reports_property_violations_in_form_order() {
    assert_eq!(
        property_violation(|s| s.street_name = String::new()),
        FilingViolation::StreetNameRequired
    );
    assert_eq!(
        property_violation(|s| s.street_number = " ".to_string()),
        FilingViolation::StreetNumberRequired
    );
    assert_eq!(
        property_violation(|s| s.city = String::new()),
        FilingViolation::CityRequired
    );
    assert_eq!(
        property_violation(|s| s.province = String::new()),
        FilingViolation::ProvinceRequired
    );
    assert_eq!(
        property_violation(|s| s.postal_code = String::new()),
        FilingViolation::PostalCodeRequired
    );
    assert_eq!(
        property_violation(|s| s.postal_code = "3001".to_string()),
        FilingViolation::PostalCodeInvalid
    );
    assert_eq!(
        property_violation(|s| s.cadastral_reference = " ".to_string()),
        FilingViolation::CadastralReferenceRequired
    );
    assert_eq!(
        property_violation(|s| s.cadastral_reference = "9872023VH5797S0001WY".to_string()),
        FilingViolation::CadastralReferenceInvalid
    );
    assert_eq!(
        property_violation(|s| s.cadastral_value = String::new()),
        FilingViolation::CadastralValueRequired
    );
    assert_eq!(
        property_violation(|s| s.cadastral_value = "0.00".to_string()),
        FilingViolation::CadastralValueInvalid
    );
    assert_eq!(
        property_violation(|s| s.cadastral_value = "85000.005".to_string()),
        FilingViolation::CadastralValueInvalid
    );
    assert_eq!(
        property_violation(|s| s.cadastral_value = "85000,".to_string()),
        FilingViolation::CadastralValueInvalid
    );
    assert_eq!(
        property_violation(|s| s.revision_year = Some("2031".to_string())),
        FilingViolation::RevisionYearInvalid
    );
    assert_eq!(
        property_violation(|s| s.owners = Vec::new()),
        FilingViolation::Ownership(OwnershipErrorCode::AtLeastOneOwner)
    );
    assert_eq!(
        property_violation(|s| {
            s.owners = vec![
                OwnershipEntry::new("a", 33.33),
                OwnershipEntry::new("b", 33.33),
                OwnershipEntry::new("c", 33.33),
            ]
        }),
        FilingViolation::Ownership(OwnershipErrorCode::PercentageUnder100)
    );
}

#[test]
fn guard_accepts_revision_year_up_to_current_year() {
    let mut submission = property_submission(full_owner());
    submission.collective_revision = true;
    submission.revision_year = Some("2025".to_string());

    let profile = guard()
        .property_from_submission(submission)
        .expect("current year accepted");
    assert_eq!(profile.revision_year, Some(2025));
    assert!(profile.collective_revision);
}
