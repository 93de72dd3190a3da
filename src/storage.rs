//! Browser-backed key-value storage for the roster and the settings blob.
//!
//! Values are written to `window.localStorage`. When that is unavailable
//! (private browsing, sandboxed iframes, storage quota errors) they land in
//! a thread-local map instead, so the page keeps working until it is closed.

use log::warn;
use spin_picker::settings::KeyValueStore;
use spin_picker::PickerError;
use std::cell::RefCell;
use std::collections::HashMap;
use web_sys::Storage;

thread_local! {
    /// Page-lifetime fallback when localStorage cannot be used.
    static FALLBACK_STORE: RefCell<HashMap<String, String>> = RefCell::new(HashMap::new());
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    #[cfg(target_arch = "wasm32")]
    fn local_storage() -> Option<Storage> {
        gloo_utils::window().local_storage().ok().flatten()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn local_storage() -> Option<Storage> {
        None
    }
}

fn js_error(err: wasm_bindgen::JsValue) -> PickerError {
    PickerError::Storage(format!("{:?}", err))
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PickerError> {
        match Self::local_storage() {
            Some(storage) => storage.get_item(key).map_err(js_error),
            None => Ok(FALLBACK_STORE.with(|s| s.borrow().get(key).cloned())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), PickerError> {
        if let Some(storage) = Self::local_storage() {
            match storage.set_item(key, value) {
                Ok(()) => return Ok(()),
                Err(e) => warn!("localStorage write of {} failed, keeping it in memory: {:?}", key, e),
            }
        }
        FALLBACK_STORE.with(|s| {
            s.borrow_mut().insert(key.to_string(), value.to_string());
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), PickerError> {
        FALLBACK_STORE.with(|s| {
            s.borrow_mut().remove(key);
        });
        match Self::local_storage() {
            Some(storage) => storage.remove_item(key).map_err(js_error),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Native builds have no localStorage, so every call exercises the fallback.
    #[test]
    fn falls_back_to_memory_without_a_window() {
        let store = BrowserStore;
        assert_eq!(store.get_item("k").unwrap(), None);
        store.set_item("k", "v1").unwrap();
        store.set_item("k", "v2").unwrap();
        assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);
    }
}
