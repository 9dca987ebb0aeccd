//! Best-effort key/value persistence in the browser's localStorage.
//!
//! Values are stored as JSON strings under a fixed set of `senda_*` keys.
//! Nothing here is durable or synced: private browsing, quota limits or a
//! user clearing site data simply make reads come back empty.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("localStorage is not available")]
    Unavailable,
    #[error("storage backend rejected the operation: {0}")]
    Backend(String),
    #[error("could not encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl StorageBackend for web_sys::Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        web_sys::Storage::get_item(self, key).map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        web_sys::Storage::set_item(self, key, value)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        web_sys::Storage::remove_item(self, key)
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}

/// Keeps values for the lifetime of the page only.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    items: RefCell<BTreeMap<String, String>>,
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Behaves like `MemoryBackend` but refuses to write or remove one key,
/// the way a full quota or a locked-down browser would.
#[cfg(test)]
pub(crate) struct RejectingBackend {
    inner: MemoryBackend,
    rejected: &'static str,
}

#[cfg(test)]
impl RejectingBackend {
    pub(crate) fn new(rejected: StorageKey) -> Self {
        Self {
            inner: MemoryBackend::default(),
            rejected: rejected.as_str(),
        }
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if key == self.rejected {
            return Err(StorageError::Backend(format!("QuotaExceededError: {}", key)));
        }
        Ok(())
    }
}

#[cfg(test)]
impl StorageBackend for RejectingBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.remove_item(key)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKey {
    Waitlist,
    WaitlistEmail,
    SurveyDraft,
    Preferences,
}

impl StorageKey {
    pub const ALL: [StorageKey; 4] = [
        StorageKey::Waitlist,
        StorageKey::WaitlistEmail,
        StorageKey::SurveyDraft,
        StorageKey::Preferences,
    ];

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Waitlist => "senda_waitlist",
            StorageKey::WaitlistEmail => "senda_waitlist_email",
            StorageKey::SurveyDraft => "senda_survey_draft",
            StorageKey::Preferences => "senda_preferences",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub theme: String,
    pub notifications: bool,
    #[serde(rename = "preferAI")]
    pub prefer_ai: bool,
    pub language: String,
    pub yearly_pricing: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            notifications: true,
            prefer_ai: true,
            language: "es".to_string(),
            yearly_pricing: false,
        }
    }
}

#[derive(Clone)]
pub struct LocalStore {
    backend: Rc<dyn StorageBackend>,
}

impl PartialEq for LocalStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }
}

impl LocalStore {
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Rc::new(backend),
        }
    }

    pub fn browser() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self::with_backend(storage))
    }

    /// localStorage when the browser allows it, an in-memory map otherwise.
    pub fn open() -> Self {
        Self::browser().unwrap_or_else(|e| {
            warn!("Falling back to in-memory storage: {}", e);
            Self::with_backend(MemoryBackend::default())
        })
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.backend.set_item(key.as_str(), &json).map_err(|e| {
            error!("Error saving {} to localStorage: {}", key.as_str(), e);
            e
        })
    }

    /// Missing, unreadable and corrupt entries all read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: StorageKey) -> Option<T> {
        let raw = match self.backend.get_item(key.as_str()) {
            Ok(raw) => raw?,
            Err(e) => {
                error!("Error reading {} from localStorage: {}", key.as_str(), e);
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring corrupt {} entry: {}", key.as_str(), e);
                None
            }
        }
    }

    pub fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.backend.remove_item(key.as_str()).map_err(|e| {
            error!("Error removing {} from localStorage: {}", key.as_str(), e);
            e
        })
    }

    /// Read-modify-write, starting from `T::default()` when nothing is stored.
    pub fn update<T, F>(&self, key: StorageKey, f: F) -> Result<T, StorageError>
    where
        T: Serialize + DeserializeOwned + Default,
        F: FnOnce(&mut T),
    {
        let mut value = self.get::<T>(key).unwrap_or_default();
        f(&mut value);
        self.set(key, &value)?;
        Ok(value)
    }

    pub fn push<T>(&self, key: StorageKey, item: T) -> Result<usize, StorageError>
    where
        T: Serialize + DeserializeOwned,
    {
        self.update::<Vec<T>, _>(key, |items| items.push(item))
            .map(|items| items.len())
    }

    pub fn preferences(&self) -> Preferences {
        self.get(StorageKey::Preferences).unwrap_or_default()
    }

    /// Removes every key this site owns. Keeps going past failures and
    /// reports the first one.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        let mut first_error = None;
        for key in StorageKey::ALL {
            if let Err(e) = self.remove(key) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// All stored values keyed by their storage key, `null` for absent ones.
    pub fn export(&self) -> Map<String, Value> {
        StorageKey::ALL
            .iter()
            .map(|key| {
                let value = self.get::<Value>(*key).unwrap_or(Value::Null);
                (key.as_str().to_string(), value)
            })
            .collect()
    }

    /// Inverse of `export`. Unknown keys are skipped, `null` removes the
    /// entry. Returns how many keys were written or removed; the first
    /// backend failure stops the import.
    pub fn import(&self, data: &Map<String, Value>) -> Result<usize, StorageError> {
        let mut applied = 0;
        for (name, value) in data {
            let Some(key) = StorageKey::parse(name) else {
                warn!("Skipping unknown storage key {}", name);
                continue;
            };
            if value.is_null() {
                self.remove(key)?;
            } else {
                self.set(key, value)?;
            }
            applied += 1;
        }
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> LocalStore {
        LocalStore::with_backend(MemoryBackend::default())
    }

    #[test]
    fn set_get_remove() {
        let store = store();
        store.set(StorageKey::WaitlistEmail, "ana@example.com").unwrap();
        assert_eq!(
            store.get::<String>(StorageKey::WaitlistEmail).as_deref(),
            Some("ana@example.com")
        );
        store.remove(StorageKey::WaitlistEmail).unwrap();
        assert_eq!(store.get::<String>(StorageKey::WaitlistEmail), None);
    }

    #[test]
    fn corrupt_values_read_as_missing() {
        let backend = MemoryBackend::default();
        backend.set_item("senda_preferences", "{not json").unwrap();
        let store = LocalStore::with_backend(backend);
        assert_eq!(store.get::<Preferences>(StorageKey::Preferences), None);
        assert_eq!(store.preferences(), Preferences::default());
    }

    #[test]
    fn push_appends_to_list() {
        let store = store();
        assert_eq!(store.push(StorageKey::Waitlist, json!({"email": "a@b.co"})).unwrap(), 1);
        assert_eq!(store.push(StorageKey::Waitlist, json!({"email": "c@d.co"})).unwrap(), 2);
        let items: Vec<Value> = store.get(StorageKey::Waitlist).unwrap();
        assert_eq!(items[1]["email"], "c@d.co");
    }

    #[test]
    fn update_starts_from_default() {
        let store = store();
        let prefs = store
            .update(StorageKey::Preferences, |p: &mut Preferences| p.yearly_pricing = true)
            .unwrap();
        assert!(prefs.yearly_pricing);
        assert!(store.preferences().yearly_pricing);
    }

    #[test]
    fn partial_preferences_fill_defaults() {
        let store = store();
        store.set(StorageKey::Preferences, &json!({})).unwrap();
        assert_eq!(store.preferences(), Preferences::default());
    }

    #[test]
    fn clear_all_and_export_cover_known_keys() {
        let store = store();
        store.set(StorageKey::WaitlistEmail, "x@y.z").unwrap();
        store.set(StorageKey::SurveyDraft, &json!({"pricing": "9"})).unwrap();

        let exported = store.export();
        assert_eq!(exported.len(), StorageKey::ALL.len());
        assert_eq!(exported["senda_waitlist_email"], "x@y.z");
        assert_eq!(exported["senda_waitlist"], Value::Null);

        store.clear_all().unwrap();
        assert!(store.export().values().all(Value::is_null));
    }

    #[test]
    fn preferences_use_the_stored_field_names() {
        let store = store();
        store
            .set(StorageKey::Preferences, &json!({"theme": "dark", "preferAI": false}))
            .unwrap();
        let prefs = store.preferences();
        assert_eq!(prefs.theme, "dark");
        assert!(!prefs.prefer_ai);
        assert!(prefs.notifications);
        assert_eq!(prefs.language, "es");

        let saved = store
            .update(StorageKey::Preferences, |p: &mut Preferences| p.yearly_pricing = true)
            .unwrap();
        assert_eq!(saved.theme, "dark");
        let raw: Value = store.get(StorageKey::Preferences).unwrap();
        assert_eq!(raw["yearlyPricing"], true);
    }

    #[test]
    fn import_restores_an_export() {
        let source = store();
        source.set(StorageKey::WaitlistEmail, "x@y.z").unwrap();
        source.push(StorageKey::Waitlist, json!({"email": "x@y.z"})).unwrap();
        let mut data = source.export();
        data.insert("somebody_else".to_string(), json!(1));

        let target = store();
        target.set(StorageKey::SurveyDraft, &json!({"pricing": "5"})).unwrap();
        assert_eq!(target.import(&data).unwrap(), StorageKey::ALL.len());
        assert_eq!(target.export(), source.export());
    }

    #[test]
    fn rejected_writes_surface_as_backend_errors() {
        let store = LocalStore::with_backend(RejectingBackend::new(StorageKey::WaitlistEmail));
        let err = store.set(StorageKey::WaitlistEmail, "x@y.z").unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
        assert_eq!(store.get::<String>(StorageKey::WaitlistEmail), None);

        store.set(StorageKey::SurveyDraft, &json!({"pricing": "5"})).unwrap();
        assert!(store.get::<Value>(StorageKey::SurveyDraft).is_some());
    }

    #[test]
    fn clear_all_keeps_going_past_a_failure() {
        let store = LocalStore::with_backend(RejectingBackend::new(StorageKey::Waitlist));
        store.set(StorageKey::WaitlistEmail, "x@y.z").unwrap();
        store.set(StorageKey::SurveyDraft, &json!({"pricing": "9"})).unwrap();
        store.set(StorageKey::Preferences, &Preferences::default()).unwrap();

        let err = store.clear_all().unwrap_err();
        assert!(err.to_string().contains("senda_waitlist"));
        assert_eq!(store.get::<String>(StorageKey::WaitlistEmail), None);
        assert_eq!(store.get::<Value>(StorageKey::SurveyDraft), None);
        assert_eq!(store.get::<Value>(StorageKey::Preferences), None);
    }

    #[test]
    fn import_stops_at_the_failing_key() {
        // Inserted in sorted order, so iteration order is the same with or without preserve_order.
        let mut data = Map::new();
        data.insert("senda_preferences".to_string(), json!({"theme": "dark"}));
        data.insert("senda_survey_draft".to_string(), json!({"pricing": "9"}));
        data.insert("senda_waitlist".to_string(), json!([{"email": "x@y.z"}]));
        data.insert("senda_waitlist_email".to_string(), json!("x@y.z"));

        let store = LocalStore::with_backend(RejectingBackend::new(StorageKey::Waitlist));
        assert!(matches!(store.import(&data), Err(StorageError::Backend(_))));
        assert_eq!(store.preferences().theme, "dark");
        assert!(store.get::<Value>(StorageKey::SurveyDraft).is_some());
        assert_eq!(store.get::<Value>(StorageKey::Waitlist), None);
        assert_eq!(store.get::<String>(StorageKey::WaitlistEmail), None);
    }
}
