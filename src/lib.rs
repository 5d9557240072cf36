//! Remembers a media player's volume, mute state, playback rate and captions language
//! between sessions, and restores them once the player is ready.

pub mod error;
pub mod logging;
pub mod options;
pub mod player;
pub mod record;
pub mod storage;
pub mod sync;

pub use error::{Error, StoreError};
pub use options::{Options, Preference};
pub use record::PreferenceRecord;
pub use sync::PreferenceSync;

use std::rc::Rc;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

/// Activates preference syncing for `player`, reading and writing preferences in `store`.
///
/// Fails with [`Error::StoreUnavailable`] if the store cannot be written,
/// in which case the player is left alone.
pub fn persist(
	player: Rc<dyn player::Player>,
	store: Rc<dyn storage::Store>,
	options: Options,
) -> Result<PreferenceSync, Error> {
	PreferenceSync::activate(player, store, options)
}

#[cfg(target_family = "wasm")]
mod bindings {
	use crate::{logging, player::videojs::VideoJsPlayer, storage::local::LocalStore, Options};
	use std::rc::Rc;
	use wasm_bindgen::prelude::*;

	#[wasm_bindgen(start)]
	pub fn start() {
		let config = logging::wasm::Config::default().with_level(log::Level::Info);
		logging::wasm::init(config.prefer_target());
	}

	/// video.js plugin entry point: `persist(player, options)`.
	/// Never throws; failures are logged to the console.
	#[wasm_bindgen(js_name = persist)]
	pub fn register(player: VideoJsPlayer, options: JsValue) {
		let options = if options.is_undefined() || options.is_null() {
			Options::default()
		} else {
			match serde_wasm_bindgen::from_value::<Options>(options) {
				Ok(options) => options,
				Err(err) => {
					log::error!("videojs-persist: invalid options: {err}");
					return;
				}
			}
		};
		if let Err(err) = crate::persist(Rc::new(player), Rc::new(LocalStore), options) {
			log::debug!("videojs-persist not activated: {err}");
		}
	}

	#[wasm_bindgen]
	pub fn version() -> String {
		crate::VERSION.to_owned()
	}
}
