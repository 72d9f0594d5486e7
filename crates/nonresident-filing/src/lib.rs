//! Validation and filing core for non-resident property owners in Spain.
//!
//! The [`validators`] module holds the pure identifier checks (NIF/NIE, cadastral
//! reference, IBAN) and the co-ownership rule. [`filing`] builds owner and property
//! intake, declarations, and the HTTP router on top of them.

pub mod config;
pub mod error;
pub mod filing;
pub mod telemetry;
pub mod validators;
