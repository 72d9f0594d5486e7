use metrics_exporter_prometheus::PrometheusHandle;
use nonresident_filing::filing::{
    FilingRepository, OwnerId, OwnerRecord, PropertyId, PropertyRecord, RepositoryError,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store; records are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFilingRepository {
    store: Arc<Mutex<Store>>,
}

/// Owners and properties share one lock so reference checks and writes are atomic.
#[derive(Default)]
struct Store {
    owners: HashMap<OwnerId, OwnerRecord>,
    properties: HashMap<PropertyId, PropertyRecord>,
}

impl Store {
    fn check_owners(&self, record: &PropertyRecord) -> Result<(), RepositoryError> {
        match record.missing_owner(|id| self.owners.contains_key(id)) {
            Some(raw_id) => Err(RepositoryError::MissingOwner(raw_id.to_string())),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
}

impl FilingRepository for InMemoryFilingRepository {
    fn insert_owner(&self, record: OwnerRecord) -> Result<OwnerRecord, RepositoryError> {
        let mut store = lock(&self.store)?;
        if store.owners.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        store.owners.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_owner(&self, record: OwnerRecord) -> Result<(), RepositoryError> {
        let mut store = lock(&self.store)?;
        match store.owners.get_mut(&record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_owner(&self, id: &OwnerId) -> Result<Option<OwnerRecord>, RepositoryError> {
        let store = lock(&self.store)?;
        Ok(store.owners.get(id).cloned())
    }

    fn delete_owner(&self, id: &OwnerId) -> Result<(), RepositoryError> {
        let mut store = lock(&self.store)?;
        if !store.owners.contains_key(id) {
            return Err(RepositoryError::NotFound);
        }
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
        store.owners.remove(id);
        Ok(())
    }

    fn list_owners(&self) -> Result<Vec<OwnerRecord>, RepositoryError> {
        let store = lock(&self.store)?;
        let mut records: Vec<OwnerRecord> = store.owners.values().cloned().collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    fn insert_property(&self, record: PropertyRecord) -> Result<PropertyRecord, RepositoryError> {
        let mut store = lock(&self.store)?;
        if store.properties.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        store.check_owners(&record)?;
        store.properties.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_property(&self, record: PropertyRecord) -> Result<(), RepositoryError> {
        let mut store = lock(&self.store)?;
        if !store.properties.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        store.check_owners(&record)?;
        store.properties.insert(record.id, record);
        Ok(())
    }

    fn fetch_property(&self, id: &PropertyId) -> Result<Option<PropertyRecord>, RepositoryError> {
        let store = lock(&self.store)?;
        Ok(store.properties.get(id).cloned())
    }

    fn delete_property(&self, id: &PropertyId) -> Result<(), RepositoryError> {
        let mut store = lock(&self.store)?;
        store
            .properties
            .remove(id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_properties(&self) -> Result<Vec<PropertyRecord>, RepositoryError> {
        let store = lock(&self.store)?;
        let mut records: Vec<PropertyRecord> = store.properties.values().cloned().collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}
