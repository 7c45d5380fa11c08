//! Persisting mappable objects in a key/value preference store.
//!
//! Objects are stored as their JSON text under a caller-chosen key.
//!
//! # Examples
//!
//! ```
//! use qj_map::{derive::Mappable, prefs};
//!
//! #[derive(Mappable, Default, Debug, PartialEq)]
//! struct Session {
//!     user: String,
//!     token: String,
//! }
//!
//! let mut store = prefs::MemoryPreferences::new();
//! let session = Session { user: "ana".into(), token: "t-1".into() };
//!
//! prefs::write_to_preferences(&session, &mut store, "session").unwrap();
//! let restored: Option<Session> = prefs::read_from_preferences(&store, "session").unwrap();
//!
//! assert_eq!(restored, Some(session));
//! ```

use alloc::borrow::ToOwned;
use alloc::string::String;
use std::io;
use std::path::{Path, PathBuf};

use qj_utils::hash::HashMap;
use thiserror::Error;

use crate::json::{self, JsonError};
use crate::value::{Dictionary, Value};
use crate::{Mappable, MappingError};

// -----------------------------------------------------------------------------
// PreferenceError

/// Errors raised by preference stores.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreferenceError {
    #[error("preference storage failed: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] JsonError),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

// -----------------------------------------------------------------------------
// PreferenceStore

/// A key/value store of text entries.
pub trait PreferenceStore {
    fn save(&mut self, key: &str, text: String) -> Result<(), PreferenceError>;

    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Removes `key`, returning `true` if it was present.
    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError>;
}

/// Stores `object` as JSON text under `key`.
pub fn write_to_preferences<T, S>(object: &T, store: &mut S, key: &str) -> Result<(), PreferenceError>
where
    T: Mappable + ?Sized,
    S: PreferenceStore + ?Sized,
{
    store.save(key, json::to_json_string(object)?)
}

/// Reads the object stored under `key`; `None` if nothing is stored.
pub fn read_from_preferences<T, S>(store: &S, key: &str) -> Result<Option<T>, PreferenceError>
where
    T: Mappable + Default,
    S: PreferenceStore + ?Sized,
{
    match store.load(key)? {
        Some(text) => Ok(Some(json::object_from_json(&text)?)),
        None => Ok(None),
    }
}

// -----------------------------------------------------------------------------
// MemoryPreferences

/// An in-memory [`PreferenceStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferences {
    entries: HashMap<String, String>,
}

impl MemoryPreferences {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn save(&mut self, key: &str, text: String) -> Result<(), PreferenceError> {
        self.entries.insert(key.to_owned(), text);
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError> {
        Ok(self.entries.remove(key).is_some())
    }
}

// -----------------------------------------------------------------------------
// FilePreferences

/// A [`PreferenceStore`] kept in one JSON document on disk.
///
/// The document is a dictionary from preference key to stored text. It is
/// read on every access and rewritten on every change; a missing file is an
/// empty store.
#[derive(Clone, Debug)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    #[inline]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Dictionary, PreferenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(json::decode_dictionary(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Dictionary::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_document(&self, document: &Dictionary) -> Result<(), PreferenceError> {
        let text = json::encode_pretty(&Value::Object(document.clone()))?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn save(&mut self, key: &str, text: String) -> Result<(), PreferenceError> {
        let mut document = self.read_document()?;
        document.insert(key.to_owned(), Value::String(text));
        self.write_document(&document)
    }

    fn load(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let mut document = self.read_document()?;
        Ok(match document.remove(key) {
            Some(Value::String(text)) => Some(text),
            Some(other) => {
                log::warn!("preference `{key}` in {} is not text", self.path.display());
                Some(other.to_string())
            }
            None => None,
        })
    }

    fn remove(&mut self, key: &str) -> Result<bool, PreferenceError> {
        let mut document = self.read_document()?;
        if document.remove(key).is_none() {
            return Ok(false);
        }
        self.write_document(&document)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Mappable;

    #[derive(Mappable, Default, Debug, PartialEq)]
    struct Settings {
        theme: String,
        volume: u8,
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("qj_map_prefs_{}_{name}.json", std::process::id()))
    }

    #[test]
    fn memory_round_trip() {
        let mut store = MemoryPreferences::new();
        let settings = Settings { theme: "dark".into(), volume: 7 };

        write_to_preferences(&settings, &mut store, "settings").unwrap();
        assert_eq!(store.load("settings").unwrap().unwrap(), r#"{"theme":"dark","volume":7}"#);

        let restored: Settings = read_from_preferences(&store, "settings").unwrap().unwrap();
        assert_eq!(restored, settings);

        assert!(store.remove("settings").unwrap());
        assert!(!store.remove("settings").unwrap());
        assert!(read_from_preferences::<Settings, _>(&store, "settings").unwrap().is_none());
    }

    #[test]
    fn file_round_trip() {
        let path = temp_path("round_trip");
        let _ = std::fs::remove_file(&path);
        let mut store = FilePreferences::new(&path);

        assert!(store.load("settings").unwrap().is_none());

        let settings = Settings { theme: "light".into(), volume: 3 };
        write_to_preferences(&settings, &mut store, "settings").unwrap();
        store.save("other", "kept".into()).unwrap();

        let reopened = FilePreferences::new(&path);
        let restored: Option<Settings> = read_from_preferences(&reopened, "settings").unwrap();
        assert_eq!(restored, Some(settings));
        assert_eq!(reopened.load("other").unwrap().as_deref(), Some("kept"));

        assert!(store.remove("settings").unwrap());
        assert!(store.load("settings").unwrap().is_none());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn corrupt_entry_is_json_error() {
        let mut store = MemoryPreferences::new();
        store.save("settings", "{ broken".into()).unwrap();

        let err = read_from_preferences::<Settings, _>(&store, "settings").unwrap_err();
        assert!(matches!(err, PreferenceError::Json(JsonError::MalformedJsonText(_))));
    }
}
