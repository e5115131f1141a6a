//! Named configurations and saved filter views.
//!
//! Both are write-through records in the [`RecordStore`]; listing returns them newest first.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceResult;
use crate::filtering::FilterSelection;
use crate::identity::Identity;
use crate::store::{Collection, RecordId, RecordStore, StoredRecord};

/// A stored dashboard configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedConfig {
    pub id: RecordId,
    pub created_at: u64,
    pub name: String,
    /// Opaque configuration document.
    pub config: serde_json::Value,
    pub user_id: Option<String>,
}

/// A stored filter view.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedView {
    pub id: RecordId,
    pub created_at: u64,
    pub name: String,
    pub filters: FilterSelection,
    pub user_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ConfigPayload {
    name: String,
    config: serde_json::Value,
    user_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct ViewPayload {
    name: String,
    filters: FilterSelection,
    user_id: Option<String>,
}

/// Saves and lists configurations and views for the signed-in user.
#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn RecordStore>,
    identity: Arc<dyn Identity>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn RecordStore>, identity: Arc<dyn Identity>) -> Self {
        Self { store, identity }
    }

    /// Store a named configuration.
    pub fn save_config(&self, name: &str, config: serde_json::Value) -> PersistenceResult<SavedConfig> {
        let payload = ConfigPayload {
            name: name.to_string(),
            config,
            user_id: self.identity.current_user_id(),
        };
        let record = self
            .store
            .insert(Collection::DashboardConfigs, serde_json::to_value(&payload)?)?;
        log::debug!("saved config {name:?} as record {}", record.id);
        decode_config(record)
    }

    /// All stored configurations, newest first.
    pub fn get_configs(&self) -> PersistenceResult<Vec<SavedConfig>> {
        self.store
            .select_newest_first(Collection::DashboardConfigs)?
            .into_iter()
            .map(decode_config)
            .collect()
    }

    /// Store the current filter selection under `name`.
    pub fn save_view(&self, name: &str, filters: &FilterSelection) -> PersistenceResult<SavedView> {
        let payload = ViewPayload {
            name: name.to_string(),
            filters: filters.clone(),
            user_id: self.identity.current_user_id(),
        };
        let record = self
            .store
            .insert(Collection::SavedViews, serde_json::to_value(&payload)?)?;
        log::debug!("saved view {name:?} as record {}", record.id);
        decode_view(record)
    }

    /// All stored views, newest first.
    pub fn get_views(&self) -> PersistenceResult<Vec<SavedView>> {
        self.store
            .select_newest_first(Collection::SavedViews)?
            .into_iter()
            .map(decode_view)
            .collect()
    }
}

fn decode_config(record: StoredRecord) -> PersistenceResult<SavedConfig> {
    let payload: ConfigPayload = serde_json::from_value(record.payload)?;
    Ok(SavedConfig {
        id: record.id,
        created_at: record.created_at,
        name: payload.name,
        config: payload.config,
        user_id: payload.user_id,
    })
}

fn decode_view(record: StoredRecord) -> PersistenceResult<SavedView> {
    let payload: ViewPayload = serde_json::from_value(record.payload)?;
    Ok(SavedView {
        id: record.id,
        created_at: record.created_at,
        name: payload.name,
        filters: payload.filters,
        user_id: payload.user_id,
    })
}
