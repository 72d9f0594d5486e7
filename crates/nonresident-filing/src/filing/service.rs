use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::declaration::{owner_declaration, DeclarationRates, PropertyDeclaration};
use super::domain::{OwnerId, OwnerSubmission, PropertyId, PropertyProfile, PropertySubmission};
use super::guard::{FilingGuard, FilingViolation};
use super::repository::{FilingRepository, OwnerRecord, PropertyRecord, RepositoryError};
use crate::config::FilingConfig;

/// Service composing the intake guard, repository, and declaration rates.
pub struct FilingService<R> {
    guard: FilingGuard,
    repository: Arc<R>,
    rates: DeclarationRates,
}

impl<R> FilingService<R>
where
    R: FilingRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: &FilingConfig) -> Self {
        Self::with_guard(FilingGuard::default(), repository, config)
    }

    pub fn with_guard(guard: FilingGuard, repository: Arc<R>, config: &FilingConfig) -> Self {
        Self {
            guard,
            repository,
            rates: config.rates,
        }
    }

    pub fn rates(&self) -> &DeclarationRates {
        &self.rates
    }

    pub fn create_owner(
        &self,
        submission: OwnerSubmission,
    ) -> Result<OwnerRecord, FilingServiceError> {
        let profile = self
            .guard
            .owner_from_submission(submission)
            .inspect_err(|violation| debug!(code = violation.code(), "owner rejected"))?;

        let now = Utc::now();
        let record = OwnerRecord {
            id: OwnerId::new(),
            profile,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert_owner(record).inspect_err(log_repository)?;
        info!(owner_id = %stored.id, tax_id_type = %stored.profile.tax_id_type, "owner created");
        Ok(stored)
    }

    pub fn update_owner(
        &self,
        id: &OwnerId,
        submission: OwnerSubmission,
    ) -> Result<OwnerRecord, FilingServiceError> {
        let existing = self.get_owner(id)?;
        let profile = self
            .guard
            .owner_from_submission(submission)
            .inspect_err(|violation| debug!(code = violation.code(), "owner update rejected"))?;

        let record = OwnerRecord {
            profile,
            updated_at: Utc::now(),
            ..existing
        };
        self.repository
            .update_owner(record.clone())
            .inspect_err(log_repository)?;
        info!(owner_id = %id, "owner updated");
        Ok(record)
    }

    /// Owners still holding a share of some property cannot be removed.
    pub fn delete_owner(&self, id: &OwnerId) -> Result<(), FilingServiceError> {
        self.repository.delete_owner(id).inspect_err(log_repository)?;
        info!(owner_id = %id, "owner deleted");
        Ok(())
    }

    pub fn get_owner(&self, id: &OwnerId) -> Result<OwnerRecord, FilingServiceError> {
        let record = self
            .repository
            .fetch_owner(id)
            .inspect_err(log_repository)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list_owners(&self) -> Result<Vec<OwnerRecord>, FilingServiceError> {
        Ok(self.repository.list_owners().inspect_err(log_repository)?)
    }

    pub fn create_property(
        &self,
        submission: PropertySubmission,
    ) -> Result<PropertyRecord, FilingServiceError> {
        let profile = self.checked_property(submission)?;

        let now = Utc::now();
        let record = PropertyRecord {
            id: PropertyId::new(),
            profile,
            created_at: now,
            updated_at: now,
        };

        let stored = self
            .repository
            .insert_property(record)
            .inspect_err(log_repository)?;
        info!(
            property_id = %stored.id,
            owners = stored.profile.owners.len(),
            "property created"
        );
        Ok(stored)
    }

    /// Replaces the whole property, ownership table included.
    pub fn update_property(
        &self,
        id: &PropertyId,
        submission: PropertySubmission,
    ) -> Result<PropertyRecord, FilingServiceError> {
        let existing = self.get_property(id)?;
        let profile = self.checked_property(submission)?;

        let record = PropertyRecord {
            profile,
            updated_at: Utc::now(),
            ..existing
        };
        self.repository
            .update_property(record.clone())
            .inspect_err(log_repository)?;
        info!(property_id = %id, "property updated");
        Ok(record)
    }

    pub fn delete_property(&self, id: &PropertyId) -> Result<(), FilingServiceError> {
        self.repository
            .delete_property(id)
            .inspect_err(log_repository)?;
        info!(property_id = %id, "property deleted");
        Ok(())
    }

    pub fn get_property(&self, id: &PropertyId) -> Result<PropertyRecord, FilingServiceError> {
        let record = self
            .repository
            .fetch_property(id)
            .inspect_err(log_repository)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list_properties(&self) -> Result<Vec<PropertyRecord>, FilingServiceError> {
        Ok(self
            .repository
            .list_properties()
            .inspect_err(log_repository)?)
    }

    /// Per-owner imputed income and tax due for a stored property.
    pub fn declarations(
        &self,
        property_id: &PropertyId,
    ) -> Result<PropertyDeclaration, FilingServiceError> {
        let property = self.get_property(property_id)?;

        let mut owners = Vec::with_capacity(property.profile.owners.len());
        for entry in &property.profile.owners {
            let owner = self.resolve_owner(&entry.owner_id)?;
            owners.push(owner_declaration(
                &property.profile,
                entry,
                &owner.profile,
                &self.rates,
            ));
        }

        Ok(PropertyDeclaration {
            property_id: property.id,
            cadastral_reference: property.profile.cadastral_reference,
            cadastral_value_cents: property.profile.cadastral_value_cents,
            owners,
        })
    }

    fn checked_property(
        &self,
        submission: PropertySubmission,
    ) -> Result<PropertyProfile, FilingServiceError> {
        let profile = self
            .guard
            .property_from_submission(submission)
            .inspect_err(|violation| debug!(code = violation.code(), "property rejected"))?;

        for entry in &profile.owners {
            self.resolve_owner(&entry.owner_id)?;
        }
        Ok(profile)
    }

    fn resolve_owner(&self, raw_id: &str) -> Result<OwnerRecord, FilingServiceError> {
        let unknown = || FilingServiceError::UnknownOwner(raw_id.to_string());
        let id = OwnerId::parse(raw_id).ok_or_else(unknown)?;
        self.repository
            .fetch_owner(&id)
            .inspect_err(log_repository)?
            .ok_or_else(unknown)
    }
}

fn log_repository(error: &RepositoryError) {
    if matches!(error, RepositoryError::Unavailable(_)) {
        warn!(%error, "filing repository failure");
    }
}

/// Error raised by the filing service.
#[derive(Debug, thiserror::Error)]
pub enum FilingServiceError {
    #[error(transparent)]
    Violation(#[from] FilingViolation),
    #[error("ownership entry references unknown owner '{0}'")]
    UnknownOwner(String),
    #[error("owner {owner_id} still holds a share of property {property_id}")]
    OwnerInUse {
        owner_id: OwnerId,
        property_id: PropertyId,
    },
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for FilingServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::OwnerInUse {
                owner_id,
                property_id,
            } => Self::OwnerInUse {
                owner_id,
                property_id,
            },
            RepositoryError::MissingOwner(raw_id) => Self::UnknownOwner(raw_id),
            other => Self::Repository(other),
        }
    }
}
