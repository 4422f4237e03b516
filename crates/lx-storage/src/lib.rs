use anyhow::{Result, anyhow};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// Per-origin string key/value storage.
///
/// Writes are whole-value overwrites; there is no transactional contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// Storage that refuses every operation, as in private browsing modes with
/// storage disabled. Counts attempted writes.
#[derive(Debug, Default)]
pub struct UnavailableStore {
    write_attempts: Cell<usize>,
}

impl UnavailableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.get()
    }
}

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("storage unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        Err(anyhow!("storage unavailable"))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

/// Read and decode a JSON value; `Ok(None)` when the key is absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_roundtrip() -> anyhow::Result<()> {
        let store = InMemoryStore::new();
        save_json(&store, "ids", &["a", "b"])?;
        let loaded: Option<Vec<String>> = load_json(&store, "ids")?;
        assert_eq!(loaded, Some(vec!["a".to_owned(), "b".to_owned()]));

        store.remove("ids")?;
        let missing: Option<Vec<String>> = load_json(&store, "ids")?;
        assert!(missing.is_none());
        Ok(())
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let store = InMemoryStore::with_entry("cart", "{not json");
        let loaded: Result<Option<Vec<String>>> = load_json(&store, "cart");
        assert!(loaded.is_err());
    }

    #[test]
    fn unavailable_store_counts_writes() {
        let store = UnavailableStore::new();
        assert!(store.set("cart", "[]").is_err());
        assert!(store.get("cart").is_err());
        assert_eq!(store.write_attempts(), 1);
    }
}
