//! Session user persistence in on-device key-value storage.

use crate::error::{AppError, Result};

pub const USER_KEY: &str = "user";

/// Minimal string key-value store; `localStorage` in the browser.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub struct LocalStore(web_sys::Storage);

impl LocalStore {
    pub fn open() -> Option<Self> {
        let win = web_sys::window()?;
        match win.local_storage() {
            Ok(Some(store)) => Some(LocalStore(store)),
            _ => None,
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.0.set_item(key, value).map_err(|_| AppError::Storage)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.0.remove_item(key).map_err(|_| AppError::Storage)
    }
}

pub fn load_user(store: &impl KeyValueStore) -> Option<String> {
    store.get(USER_KEY).filter(|u| !u.trim().is_empty())
}

pub fn save_user(store: &impl KeyValueStore, username: &str) -> Result<()> {
    store.set(USER_KEY, username)
}

pub fn clear_user(store: &impl KeyValueStore) -> Result<()> {
    store.remove(USER_KEY)
}

/// Reads the persisted user from browser storage, if any.
pub fn restore() -> Option<String> {
    LocalStore::open().and_then(|s| load_user(&s))
}

pub fn persist(username: &str) -> Result<()> {
    let store = LocalStore::open().ok_or(AppError::Storage)?;
    save_user(&store, username)
}

pub fn forget() -> Result<()> {
    let store = LocalStore::open().ok_or(AppError::Storage)?;
    clear_user(&store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore(RefCell<HashMap<String, String>>);

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }
        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().insert(key.into(), value.into());
            Ok(())
        }
        fn remove(&self, key: &str) -> Result<()> {
            self.0.borrow_mut().remove(key);
            Ok(())
        }
    }

    #[test]
    fn user_round_trips_under_user_key() {
        let store = MemoryStore::default();
        assert_eq!(load_user(&store), None);
        save_user(&store, "alice").unwrap();
        assert_eq!(store.get("user").as_deref(), Some("alice"));
        assert_eq!(load_user(&store).as_deref(), Some("alice"));
    }

    #[test]
    fn logout_clears_storage() {
        let store = MemoryStore::default();
        save_user(&store, "alice").unwrap();
        clear_user(&store).unwrap();
        assert_eq!(store.get(USER_KEY), None);
        assert_eq!(load_user(&store), None);
    }

    #[test]
    fn blank_value_means_logged_out() {
        let store = MemoryStore::default();
        store.set(USER_KEY, "  ").unwrap();
        assert_eq!(load_user(&store), None);
    }
}
