use crate::error::StoreError;
use rand::Rng;

#[cfg(target_family = "wasm")]
pub mod local;
mod memory;
pub use memory::*;

static PROBE_PREFIX: &str = "videojs-persist-test-";

/// A flat string key-value store which outlives a playback session,
/// such as the browser's `localStorage`. Any call may fail.
pub trait Store {
	fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
	fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
	fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Checks the store is usable by writing and then removing a throwaway value.
pub fn probe(store: &dyn Store) -> Result<(), StoreError> {
	let key = format!("{PROBE_PREFIX}{}", rand::thread_rng().gen_range(0..10));
	store.set_item(&key, ".")?;
	store.remove_item(&key)?;
	Ok(())
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn probe_leaves_nothing_behind() {
		let store = MemoryStore::default();
		assert_eq!(probe(&store), Ok(()));
		assert!(store.is_empty());
		assert_eq!(store.writes(), 1);
		assert_eq!(store.reads(), 0);
	}

	#[test]
	fn probe_disabled() {
		let store = MemoryStore::disabled();
		assert_eq!(probe(&store), Err(StoreError::Disabled));
	}
}
