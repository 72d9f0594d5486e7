//! Owner and property intake, co-ownership declarations, and their HTTP surface.
//!
//! Submissions pass through [`FilingGuard`], which reuses the validators and reports the
//! first failing field as a stable code. [`FilingService`] persists accepted records behind
//! the [`FilingRepository`] seam and derives per-owner declarations.

pub mod declaration;
pub mod domain;
pub mod guard;
pub mod import;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use declaration::{
    imputed_income_cents, is_eea_resident, tax_due_cents, DeclarationRates, OwnerDeclaration,
    PropertyDeclaration,
};
pub use domain::{
    FiscalResidence, OwnerId, OwnerProfile, OwnerSubmission, OwnerType, PropertyAddress,
    PropertyId, PropertyProfile, PropertySubmission, StreetType,
};
pub use guard::{FilingGuard, FilingViolation};
pub use import::{entries_from_path, entries_from_reader, OwnershipImportError};
pub use repository::{FilingRepository, OwnerRecord, PropertyRecord, RepositoryError};
pub use router::{filing_router, validation_router};
pub use service::{FilingService, FilingServiceError};
