//! Pure validators for Spanish fiscal identifiers and co-ownership shares.
//!
//! Every function here is synchronous and side-effect free. Malformed input yields a
//! negative verdict or an error code, never a panic.

pub mod cadastral;
pub mod checksum;
pub mod iban;
pub mod ownership;
pub mod tax_id;

pub use cadastral::{
    cadastral_control_characters, normalize_cadastral_reference, validate_cadastral_reference,
    CadastralReference,
};
pub use iban::{format_iban_for_storage, validate_iban, Iban, IbanErrorCode, IbanValidation};
pub use ownership::{
    check_ownership, format_hundredths, ownership_summary, validate_ownership_percentages,
    OwnershipBalance, OwnershipEntry, OwnershipErrorCode, OwnershipSummary, OwnershipValidation,
};
pub use tax_id::{nie_nif_type, normalize_nie_nif, validate_nie_nif, TaxId, TaxIdKind};
