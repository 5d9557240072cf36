use super::{Player, PlayerEvent, Subscription, TextTrack, TrackKind, TrackMode};
use js_sys::{Array, Function, Reflect};
use std::str::FromStr;
use wasm_bindgen::{prelude::*, JsCast};

#[wasm_bindgen]
extern "C" {
	/// A video.js `Player` instance.
	#[derive(Debug, Clone)]
	pub type VideoJsPlayer;

	#[wasm_bindgen(method, js_name = ready)]
	fn vjs_ready(this: &VideoJsPlayer, callback: &Function);

	#[wasm_bindgen(method, js_name = playbackRate)]
	fn vjs_playback_rate(this: &VideoJsPlayer) -> f64;
	#[wasm_bindgen(method, js_name = playbackRate)]
	fn vjs_set_playback_rate(this: &VideoJsPlayer, rate: f64);
	#[wasm_bindgen(method, js_name = defaultPlaybackRate)]
	fn vjs_set_default_playback_rate(this: &VideoJsPlayer, rate: f64);

	#[wasm_bindgen(method, js_name = volume)]
	fn vjs_volume(this: &VideoJsPlayer) -> f64;
	#[wasm_bindgen(method, js_name = volume)]
	fn vjs_set_volume(this: &VideoJsPlayer, volume: f64);

	#[wasm_bindgen(method, js_name = muted)]
	fn vjs_muted(this: &VideoJsPlayer) -> bool;
	#[wasm_bindgen(method, js_name = muted)]
	fn vjs_set_muted(this: &VideoJsPlayer, muted: bool);
	#[wasm_bindgen(method, js_name = defaultMuted)]
	fn vjs_set_default_muted(this: &VideoJsPlayer, muted: bool);

	#[wasm_bindgen(method, js_name = textTracks)]
	fn vjs_text_tracks(this: &VideoJsPlayer) -> JsValue;

	#[wasm_bindgen(method, js_name = on)]
	fn vjs_on(this: &VideoJsPlayer, event: &str, listener: &Function);
	#[wasm_bindgen(method, js_name = off)]
	fn vjs_off(this: &VideoJsPlayer, event: &str, listener: &Function);

	#[wasm_bindgen(method, js_name = addClass)]
	fn vjs_add_class(this: &VideoJsPlayer, class: &str);
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
	Reflect::get(target, &JsValue::from_str(name))
		.ok()
		.filter(|value| !value.is_undefined() && !value.is_null())
}

fn numbers(value: JsValue) -> Vec<f64> {
	if !Array::is_array(&value) {
		return Vec::new();
	}
	value.unchecked_into::<Array>().iter().filter_map(|item| item.as_f64()).collect()
}

impl VideoJsPlayer {
	/// Text tracks are read through the player's own list object, which is indexable
	/// and has a `length`, but is not a native `TextTrackList` in every video.js version.
	fn track_list(&self) -> Vec<JsValue> {
		let list = self.vjs_text_tracks();
		let length = property(&list, "length")
			.and_then(|length| length.as_f64())
			.unwrap_or_default();
		(0..length as u32).filter_map(|index| Reflect::get_u32(&list, index).ok()).collect()
	}
}

impl Player for VideoJsPlayer {
	fn ready(&self, callback: Box<dyn FnOnce()>) {
		let callback = Closure::once_into_js(move || callback());
		self.vjs_ready(callback.unchecked_ref());
	}

	fn playback_rate(&self) -> f64 {
		self.vjs_playback_rate()
	}

	fn set_playback_rate(&self, rate: f64) {
		self.vjs_set_playback_rate(rate);
	}

	fn set_default_playback_rate(&self, rate: f64) {
		self.vjs_set_default_playback_rate(rate);
	}

	fn supported_rates(&self) -> Vec<f64> {
		// Older players have no `playbackRates` method and only expose the configured option.
		let method = property(self, "playbackRates")
			.and_then(|value| value.dyn_into::<Function>().ok());
		if let Some(method) = method {
			return method.call0(self).map(numbers).unwrap_or_default();
		}
		property(self, "options_")
			.and_then(|options| property(&options, "playbackRates"))
			.map(numbers)
			.unwrap_or_default()
	}

	fn volume(&self) -> f64 {
		self.vjs_volume()
	}

	fn set_volume(&self, volume: f64) {
		self.vjs_set_volume(volume);
	}

	fn muted(&self) -> bool {
		self.vjs_muted()
	}

	fn set_muted(&self, muted: bool) {
		self.vjs_set_muted(muted);
	}

	fn set_default_muted(&self, muted: bool) {
		self.vjs_set_default_muted(muted);
	}

	fn text_tracks(&self) -> Vec<TextTrack> {
		let string = |track: &JsValue, name: &str| {
			property(track, name).and_then(|value| value.as_string())
		};
		self.track_list()
			.iter()
			.map(|track| {
				let kind = string(track, "kind").unwrap_or_default();
				TextTrack {
					kind: TrackKind::from_str(&kind).unwrap_or(TrackKind::Other(kind)),
					language: string(track, "language").unwrap_or_default(),
					mode: string(track, "mode")
						.and_then(|mode| TrackMode::from_str(&mode).ok())
						.unwrap_or_default(),
				}
			})
			.collect()
	}

	fn set_track_mode(&self, index: usize, mode: TrackMode) {
		let Some(track) = self.track_list().into_iter().nth(index) else {
			return;
		};
		let mode = JsValue::from_str(mode.as_str());
		if let Err(err) = Reflect::set(&track, &JsValue::from_str("mode"), &mode) {
			log::warn!("Failed to set text track mode: {err:?}");
		}
	}

	fn on(&self, event: PlayerEvent, handler: Box<dyn Fn()>) -> Subscription {
		let listener = Closure::wrap(handler);
		self.vjs_on(event.as_str(), listener.as_ref().unchecked_ref());
		let player = self.clone();
		Subscription::new(move || {
			player.vjs_off(event.as_str(), listener.as_ref().unchecked_ref());
		})
	}

	fn add_class(&self, class: &str) {
		self.vjs_add_class(class);
	}
}
