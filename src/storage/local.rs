use super::Store;
use crate::error::StoreError;
use gloo_storage::errors::StorageError;
use gloo_utils::errors::JsError;
use wasm_bindgen::JsValue;

/// [`Store`] backed by the window's `localStorage`.
///
/// The storage object is looked up on every call; getting it can itself throw
/// (disabled storage, opaque origins), which is reported as a store error instead of panicking.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
	fn storage(&self) -> Result<web_sys::Storage, StoreError> {
		let window = web_sys::window().ok_or(StoreError::Unavailable)?;
		window.local_storage().map_err(js_error)?.ok_or(StoreError::Unavailable)
	}
}

impl Store for LocalStore {
	fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
		self.storage()?.get_item(key).map_err(js_error)
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.storage()?.set_item(key, value).map_err(js_error)
	}

	fn remove_item(&self, key: &str) -> Result<(), StoreError> {
		self.storage()?.remove_item(key).map_err(js_error)
	}
}

fn js_error(value: JsValue) -> StoreError {
	match JsError::try_from(value) {
		Ok(err) => StoreError::Js(StorageError::JsError(err).to_string()),
		Err(err) => StoreError::Js(err.to_string()),
	}
}
