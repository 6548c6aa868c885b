use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spdlog::{debug, info};

const THEME_KEY: &str = "theme";
const FAVOURITES_KEY: &str = "favourites";
const SUBSCRIBERS_KEY: &str = "newsletterSubscribers";

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Key-value persistence for visitor preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> io::Result<()>;
    fn clear(&mut self, key: &str) -> io::Result<()>;
}

#[derive(Default, Debug)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> io::Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn clear(&mut self, key: &str) -> io::Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Opens the file at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> io::Result<Self> {
        let values = match fs::read_to_string(path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                io::Error::new(ErrorKind::InvalidData, format!("{} - file={}", e, path.display()))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No preferences yet - file={}", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(io::Error::new(e.kind(), format!("{} - file={}", e, path.display()))),
        };

        Ok(JsonFileStore { path: path.to_path_buf(), values })
    }

    fn persist(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
            .map_err(|e| io::Error::new(e.kind(), format!("{} - file={}", e, self.path.display())))
    }
}

impl PreferenceStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> io::Result<()> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }

    fn clear(&mut self, key: &str) -> io::Result<()> {
        if self.values.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

/// Theme, favourite posts and newsletter sign-ups on top of a preference store.
pub struct SiteState<S: PreferenceStore> {
    store: S,
}

impl<S: PreferenceStore> SiteState<S> {
    pub fn new(store: S) -> Self {
        SiteState { store }
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Unknown or unreadable values fall back to `Theme::System`.
    pub fn theme(&self) -> Theme {
        self.store.get(THEME_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&mut self, theme: Theme) -> io::Result<()> {
        match theme {
            Theme::System => self.store.clear(THEME_KEY),
            _ => self.store.set(THEME_KEY, to_value(&theme)?),
        }
    }

    pub fn favourites(&self) -> Vec<String> {
        self.string_list(FAVOURITES_KEY)
    }

    pub fn is_favourite(&self, slug: &str) -> bool {
        self.favourites().iter().any(|fav| fav == slug)
    }

    /// Adds or removes `slug`; returns whether it is a favourite afterwards.
    pub fn toggle_favourite(&mut self, slug: &str) -> io::Result<bool> {
        let mut favourites = self.favourites();
        let added = match favourites.iter().position(|fav| fav == slug) {
            Some(pos) => {
                favourites.remove(pos);
                false
            }
            None => {
                favourites.push(slug.to_string());
                true
            }
        };
        self.store.set(FAVOURITES_KEY, to_value(&favourites)?)?;
        Ok(added)
    }

    pub fn subscribers(&self) -> Vec<String> {
        self.string_list(SUBSCRIBERS_KEY)
    }

    /// Records a newsletter sign-up. Addresses are compared case-insensitively;
    /// returns false when the address was already subscribed.
    pub fn subscribe(&mut self, email: &str) -> io::Result<bool> {
        let email = email.trim().to_lowercase();
        if !EMAIL_REGEX.is_match(&email) {
            return Err(io::Error::new(ErrorKind::InvalidInput, format!("Invalid email address: {}", email)));
        }

        let mut subscribers = self.subscribers();
        if subscribers.iter().any(|s| s.eq_ignore_ascii_case(&email)) {
            return Ok(false);
        }
        subscribers.push(email);
        self.store.set(SUBSCRIBERS_KEY, to_value(&subscribers)?)?;
        info!("New newsletter subscriber, total={}", subscribers.len());
        Ok(true)
    }

    fn string_list(&self, key: &str) -> Vec<String> {
        self.store.get(key)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

fn to_value<T: Serialize>(value: &T) -> io::Result<Value> {
    serde_json::to_value(value).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_theme() {
        let mut state = SiteState::new(MemoryStore::default());
        assert_eq!(state.theme(), Theme::System);

        state.set_theme(Theme::Dark).unwrap();
        assert_eq!(state.theme(), Theme::Dark);

        state.set_theme(Theme::System).unwrap();
        assert_eq!(state.theme(), Theme::System);
        assert!(state.into_store().get(THEME_KEY).is_none());
    }

    #[test]
    fn test_garbage_theme_is_system() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, json!("sepia")).unwrap();
        assert_eq!(SiteState::new(store).theme(), Theme::System);
    }

    #[test]
    fn test_toggle_favourite() {
        let mut state = SiteState::new(MemoryStore::default());
        assert!(state.toggle_favourite("gaussian-splatting").unwrap());
        assert!(state.toggle_favourite("nerf-basics").unwrap());
        assert!(state.is_favourite("gaussian-splatting"));
        assert_eq!(state.favourites(), vec!["gaussian-splatting", "nerf-basics"]);

        assert!(!state.toggle_favourite("gaussian-splatting").unwrap());
        assert!(!state.is_favourite("gaussian-splatting"));
        assert_eq!(state.favourites(), vec!["nerf-basics"]);
    }

    #[test]
    fn test_subscribe() {
        let mut state = SiteState::new(MemoryStore::default());
        assert!(state.subscribe(" Dana@Example.com ").unwrap());
        assert!(!state.subscribe("dana@example.COM").unwrap());
        assert!(state.subscribe("lee@example.org").unwrap());
        assert_eq!(state.subscribers(), vec!["dana@example.com", "lee@example.org"]);

        let err = state.subscribe("not-an-email").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(state.subscribers().len(), 2);
    }

    #[test]
    fn test_json_file_store() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("preferences.json");

        let mut state = SiteState::new(JsonFileStore::open(&path)?);
        state.set_theme(Theme::Light)?;
        state.toggle_favourite("nerf-basics")?;
        state.subscribe("dana@example.com")?;

        let reopened = SiteState::new(JsonFileStore::open(&path)?);
        assert_eq!(reopened.theme(), Theme::Light);
        assert_eq!(reopened.favourites(), vec!["nerf-basics"]);
        assert_eq!(reopened.subscribers(), vec!["dana@example.com"]);

        let mut store = reopened.into_store();
        store.clear(FAVOURITES_KEY)?;
        assert!(JsonFileStore::open(&path)?.get(FAVOURITES_KEY).is_none());
        Ok(())
    }

    #[test]
    fn test_corrupt_file() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json")?;
        let err = JsonFileStore::open(&path).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("preferences.json"));
        Ok(())
    }
}
