use super::Store;
use crate::error::StoreError;
use std::{
	cell::{Cell, RefCell},
	collections::BTreeMap,
};

/// In-process [`Store`], for hosts without a browser and for tests.
///
/// Counts `get_item` and `set_item` calls so callers can check what a session touched.
#[derive(Debug, Default)]
pub struct MemoryStore {
	items: RefCell<BTreeMap<String, String>>,
	disabled: Cell<bool>,
	reads: Cell<usize>,
	writes: Cell<usize>,
}

impl MemoryStore {
	/// A store which rejects every call, like storage in a sandboxed frame.
	pub fn disabled() -> Self {
		Self {
			disabled: Cell::new(true),
			..Default::default()
		}
	}

	/// Starts or stops rejecting calls, e.g. to fail after a successful probe.
	pub fn set_disabled(&self, disabled: bool) {
		self.disabled.set(disabled);
	}

	pub fn with_item(self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.items.borrow_mut().insert(key.into(), value.into());
		self
	}

	/// Reads a value without counting it as an access.
	pub fn peek(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	pub fn is_empty(&self) -> bool {
		self.items.borrow().is_empty()
	}

	pub fn reads(&self) -> usize {
		self.reads.get()
	}

	pub fn writes(&self) -> usize {
		self.writes.get()
	}

	fn check(&self) -> Result<(), StoreError> {
		match self.disabled.get() {
			true => Err(StoreError::Disabled),
			false => Ok(()),
		}
	}
}

impl Store for MemoryStore {
	fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
		self.reads.set(self.reads.get() + 1);
		self.check()?;
		Ok(self.items.borrow().get(key).cloned())
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.writes.set(self.writes.get() + 1);
		self.check()?;
		self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StoreError> {
		self.check()?;
		self.items.borrow_mut().remove(key);
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn disabled_later() {
		let store = MemoryStore::default();
		assert_eq!(store.set_item("key", "1"), Ok(()));
		store.set_disabled(true);
		assert_eq!(store.get_item("key"), Err(StoreError::Disabled));
		assert_eq!(store.set_item("key", "2"), Err(StoreError::Disabled));
		store.set_disabled(false);
		assert_eq!(store.get_item("key"), Ok(Some("1".to_owned())));
		assert_eq!(store.reads(), 2);
		assert_eq!(store.writes(), 2);
	}
}
