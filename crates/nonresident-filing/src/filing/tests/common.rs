use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::FilingConfig;
use crate::filing::domain::{
    OwnerId, OwnerSubmission, OwnerType, PropertyId, PropertySubmission, StreetType,
};
use crate::filing::guard::FilingGuard;
use crate::filing::repository::{FilingRepository, OwnerRecord, PropertyRecord, RepositoryError};
use crate::filing::{filing_router, FilingService};
use crate::validators::OwnershipEntry;

pub(super) const VALID_CADASTRAL: &str = "9872023VH5797S0001WX";

pub(super) fn guard() -> FilingGuard {
    FilingGuard::for_year(2025)
}

pub(super) fn individual_submission() -> OwnerSubmission {
    OwnerSubmission {
        owner_type: OwnerType::Individual,
        tax_id: "x-1234567-l".to_string(),
        first_name: Some(" Claire ".to_string()),
        last_name: Some("Dubois".to_string()),
        company_name: None,
        residence_country: "fr".to_string(),
        residence_address: "12 Rue de Rivoli".to_string(),
        residence_city: "Paris".to_string(),
        residence_postal_code: "75001".to_string(),
        iban: Some("fr14 2004 1010 0505 0001 3m02 606".to_string()),
    }
}

pub(super) fn company_submission() -> OwnerSubmission {
    OwnerSubmission {
        owner_type: OwnerType::Company,
        tax_id: "12345678Z".to_string(),
        first_name: None,
        last_name: None,
        company_name: Some("Harbour Holdings Ltd".to_string()),
        residence_country: "GB".to_string(),
        residence_address: "1 King Street".to_string(),
        residence_city: "London".to_string(),
        residence_postal_code: "EC2V 8AU".to_string(),
        iban: None,
    }
}

pub(super) fn property_submission(owners: Vec<OwnershipEntry>) -> PropertySubmission {
    PropertySubmission {
        street_type: StreetType::Calle,
        street_name: "Mayor".to_string(),
        street_number: "7".to_string(),
        floor: Some("2".to_string()),
        door: Some("B".to_string()),
        staircase: Some("  ".to_string()),
        block: None,
        city: "Alicante".to_string(),
        province: "Alicante".to_string(),
        postal_code: "03001".to_string(),
        cadastral_reference: "9872023 vh5797s 0001 wx".to_string(),
        cadastral_value: "85000,00".to_string(),
        collective_revision: false,
        revision_year: None,
        owners,
    }
}

pub(super) fn build_service() -> (FilingService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        FilingService::with_guard(guard(), repository.clone(), &FilingConfig::default());
    (service, repository)
}

/// Service holding one EEA individual and one non-EEA company.
pub(super) fn seeded_service() -> (FilingService<MemoryRepository>, OwnerId, OwnerId) {
    let (service, _) = build_service();
    let resident = service
        .create_owner(individual_submission())
        .expect("individual accepted");
    let company = service
        .create_owner(company_submission())
        .expect("company accepted");
    (service, resident.id, company.id)
}

pub(super) fn split(first: &OwnerId, second: &OwnerId) -> Vec<OwnershipEntry> {
    vec![
        OwnershipEntry::new(first.to_string(), 66.66),
        OwnershipEntry::new(second.to_string(), 33.34),
    ]
}

#[derive(Default)]
pub(super) struct MemoryStore {
    owners: HashMap<OwnerId, OwnerRecord>,
    properties: HashMap<PropertyId, PropertyRecord>,
}

impl MemoryStore {
    fn check_owners(&self, record: &PropertyRecord) -> Result<(), RepositoryError> {
        match record.missing_owner(|id| self.owners.contains_key(id)) {
            Some(raw_id) => Err(RepositoryError::MissingOwner(raw_id.to_string())),
            None => Ok(()),
        }
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) store: Arc<Mutex<MemoryStore>>,
}

impl FilingRepository for MemoryRepository {
    fn insert_owner(&self, record: OwnerRecord) -> Result<OwnerRecord, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.owners.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        store.owners.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_owner(&self, record: OwnerRecord) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store.owners.insert(record.id, record);
        Ok(())
    }

    fn fetch_owner(&self, id: &OwnerId) -> Result<Option<OwnerRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.owners.get(id).cloned())
    }

    fn delete_owner(&self, id: &OwnerId) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if let Some(property) = store
            .properties
            .values()
            .find(|property| property.references_owner(id))
        {
            return Err(RepositoryError::OwnerInUse {
                owner_id: *id,
                property_id: property.id,
            });
        }
        store
            .owners
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_owners(&self) -> Result<Vec<OwnerRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.owners.values().cloned().collect())
    }

    fn insert_property(&self, record: PropertyRecord) -> Result<PropertyRecord, RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        if store.properties.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        store.check_owners(&record)?;
        store.properties.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_property(&self, record: PropertyRecord) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store.check_owners(&record)?;
        store.properties.insert(record.id, record);
        Ok(())
    }

    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.properties.get(id).cloned())
    }

    fn delete_property(&self, id: &PropertyId) -> Result<(), RepositoryError> {
        let mut store = self.store.lock().expect("repository mutex poisoned");
        store
            .properties
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let store = self.store.lock().expect("repository mutex poisoned");
        Ok(store.properties.values().cloned().collect())
    }
}

pub(super) struct ConflictRepository;

impl FilingRepository for ConflictRepository {
    fn insert_owner(&self, _record: OwnerRecord) -> Result<OwnerRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_owner(&self, _record: OwnerRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_owner(&self, _id: &OwnerId) -> Result<Option<OwnerRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete_owner(&self, _id: &OwnerId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list_owners(&self) -> Result<Vec<OwnerRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_property(&self, _record: PropertyRecord) -> Result<PropertyRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_property(&self, _record: PropertyRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_property(&self, _id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        Ok(None)
    }

    fn delete_property(&self, _id: &PropertyId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl FilingRepository for UnavailableRepository {
    fn insert_owner(&self, _record: OwnerRecord) -> Result<OwnerRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_owner(&self, _record: OwnerRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_owner(&self, _id: &OwnerId) -> Result<Option<OwnerRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_owner(&self, _id: &OwnerId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_owners(&self) -> Result<Vec<OwnerRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_property(&self, _record: PropertyRecord) -> Result<PropertyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_property(&self, _record: PropertyRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_property(&self, _id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete_property(&self, _id: &PropertyId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(service: FilingService<MemoryRepository>) -> axum::Router {
    filing_router(Arc::new(service))
}
