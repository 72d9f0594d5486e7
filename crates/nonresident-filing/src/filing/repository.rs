use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{OwnerId, OwnerProfile, PropertyId, PropertyProfile};

/// Stored owner with its audit stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRecord {
    pub id: OwnerId,
    pub profile: OwnerProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored property, co-ownership table included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    pub id: PropertyId,
    pub profile: PropertyProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyRecord {
    pub fn references_owner(&self, owner_id: &OwnerId) -> bool {
        self.profile
            .owners
            .iter()
            .any(|entry| OwnerId::parse(&entry.owner_id).as_ref() == Some(owner_id))
    }

    /// First ownership entry whose owner `is_stored` does not recognize.
    pub fn missing_owner<F>(&self, is_stored: F) -> Option<&str>
    where
        F: Fn(&OwnerId) -> bool,
    {
        self.profile
            .owners
            .iter()
            .map(|entry| entry.owner_id.as_str())
            .find(|raw| !OwnerId::parse(raw).is_some_and(|id| is_stored(&id)))
    }
}

/// Storage abstraction so the filing service can be exercised in isolation.
///
/// Owner references are enforced by the store itself: each check below runs in the same
/// critical section (or transaction) as the write it guards.
pub trait FilingRepository: Send + Sync {
    fn insert_owner(&self, record: OwnerRecord) -> Result<OwnerRecord, RepositoryError>;
    fn update_owner(&self, record: OwnerRecord) -> Result<(), RepositoryError>;
    fn fetch_owner(&self, id: &OwnerId) -> Result<Option<OwnerRecord>, RepositoryError>;
    /// Fails with `OwnerInUse` while any stored property references the owner.
    fn delete_owner(&self, id: &OwnerId) -> Result<(), RepositoryError>;
    fn list_owners(&self) -> Result<Vec<OwnerRecord>, RepositoryError>;

    /// Fails with `MissingOwner` unless every referenced owner is stored.
    fn insert_property(&self, record: PropertyRecord) -> Result<PropertyRecord, RepositoryError>;
    /// Same owner rule as `insert_property`.
    fn update_property(&self, record: PropertyRecord) -> Result<(), RepositoryError>;
    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError>;
    fn delete_property(&self, id: &PropertyId) -> Result<(), RepositoryError>;
    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("owner {owner_id} still holds a share of property {property_id}")]
    OwnerInUse {
        owner_id: OwnerId,
        property_id: PropertyId,
    },
    #[error("referenced owner '{0}' is not stored")]
    MissingOwner(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
