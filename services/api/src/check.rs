use clap::{Args, Subcommand};
use nonresident_filing::error::AppError;
use nonresident_filing::filing::entries_from_path;
use nonresident_filing::validators::{
    normalize_cadastral_reference, ownership_summary, validate_iban,
    validate_ownership_percentages, CadastralReference, OwnershipEntry, TaxId,
};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub(crate) enum CheckCommand {
    /// Validate a NIF or NIE
    TaxId(ValueArgs),
    /// Validate a 20 character cadastral reference
    Cadastral(ValueArgs),
    /// Validate an IBAN and print its electronic form
    Iban(ValueArgs),
    /// Check that an ownership table adds up to exactly 100 %
    Ownership(OwnershipArgs),
}

#[derive(Args, Debug)]
pub(crate) struct ValueArgs {
    /// Value as typed by the user; spaces and separators are allowed
    pub(crate) value: String,
}

#[derive(Args, Debug)]
pub(crate) struct OwnershipArgs {
    /// CSV file with `owner_id,percentage` rows
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_check(command: CheckCommand) -> Result<(), AppError> {
    let lines = match command {
        CheckCommand::TaxId(args) => tax_id_report(&args.value),
        CheckCommand::Cadastral(args) => cadastral_report(&args.value),
        CheckCommand::Iban(args) => iban_report(&args.value),
        CheckCommand::Ownership(args) => {
            let entries = entries_from_path(&args.csv)?;
            ownership_report(&entries)
        }
    };

    for line in lines {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn tax_id_report(raw: &str) -> Vec<String> {
    match TaxId::parse(raw) {
        Some(tax_id) => vec![format!("valid {}: {}", tax_id.kind(), tax_id.as_str())],
        None => vec![format!("invalid tax ID: {raw:?}")],
    }
}

pub(crate) fn cadastral_report(raw: &str) -> Vec<String> {
    match CadastralReference::parse(raw) {
        Some(reference) => vec![
            format!("valid cadastral reference: {reference}"),
            format!(
                "  parcel {} | sheet {} | sequence {} | control {}",
                reference.parcel(),
                reference.sheet(),
                reference.sequence(),
                reference.control()
            ),
        ],
        None => vec![format!(
            "invalid cadastral reference: {}",
            normalize_cadastral_reference(raw)
        )],
    }
}

pub(crate) fn iban_report(raw: &str) -> Vec<String> {
    let verdict = validate_iban(raw);
    match (verdict.formatted, verdict.error_code) {
        (Some(formatted), _) => vec![format!("valid IBAN: {formatted}")],
        (None, Some(code)) => vec![format!("invalid IBAN ({}): {code}", code.code())],
        (None, None) => vec!["invalid IBAN".to_string()],
    }
}

pub(crate) fn ownership_report(entries: &[OwnershipEntry]) -> Vec<String> {
    let verdict = validate_ownership_percentages(entries);
    let summary = ownership_summary(entries);

    let mut lines = vec![match verdict.error_code {
        None => format!("ownership valid across {} owners", entries.len()),
        Some(code) => format!("ownership invalid ({}): {code}", code.code()),
    }];
    lines.push(format!(
        "  total {} % | remaining {} basis points",
        summary.total_display, summary.remaining_basis_points
    ));
    for entry in entries {
        lines.push(format!(
            "  - {}: {} basis points",
            entry.owner_id,
            entry.basis_points()
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_id_report_shows_kind_and_normalized_value() {
        assert_eq!(tax_id_report("x1234567-l"), vec!["valid NIE: X1234567L"]);
        assert!(tax_id_report("12345678A")[0].starts_with("invalid"));
    }

    #[test]
    fn cadastral_report_breaks_down_segments() {
        let lines = cadastral_report("9872023 VH5797S 0001 WX");
        assert_eq!(lines[0], "valid cadastral reference: 9872023VH5797S0001WX");
        assert!(lines[1].contains("sheet VH5797S"));
    }

    #[test]
    fn iban_report_includes_error_code() {
        assert_eq!(
            iban_report("ES91 2100 0418 4502 0005 1332"),
            vec!["valid IBAN: ES9121000418450200051332"]
        );
        assert!(iban_report("ES9221000418450200051332")[0].contains("ibanChecksumInvalid"));
    }

    #[test]
    fn ownership_report_lists_each_share() {
        let entries = [
            OwnershipEntry::new("ana", 33.33),
            OwnershipEntry::new("luis", 33.33),
            OwnershipEntry::new("marta", 33.33),
        ];
        let lines = ownership_report(&entries);
        assert!(lines[0].contains("percentageUnder100"));
        assert_eq!(lines[1], "  total 99.99 % | remaining 1 basis points");
        assert_eq!(lines.len(), 5);
    }
}
