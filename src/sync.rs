use crate::{
	error::Error,
	options::{Options, Preference},
	player::{Player, PlayerEvent, Subscription, TextTrack, TrackKind, TrackMode},
	record::PreferenceRecord,
	storage::{self, Store},
};
use std::{
	cell::RefCell,
	rc::Rc,
};

pub static PLAYER_CLASS: &str = "vjs-persist";

/// Keeps a player's settings and the stored [`PreferenceRecord`] in step.
///
/// Created by [`PreferenceSync::activate`]. Once the player is ready, stored preferences are
/// applied to it, and from then on every relevant player change is written straight back
/// to the store.
///
/// Registered listeners keep the session and the player alive until [`dispose`](Self::dispose).
#[derive(Clone)]
pub struct PreferenceSync {
	inner: Rc<Inner>,
}

struct Inner {
	player: Rc<dyn Player>,
	store: Rc<dyn Store>,
	options: Options,
	record: RefCell<PreferenceRecord>,
	subscriptions: RefCell<Vec<Subscription>>,
}

impl PreferenceSync {
	/// Checks the store is usable and schedules the restore for when the player is ready.
	///
	/// If the store probe fails, one warning is logged and nothing else touches the store
	/// or the player.
	pub fn activate(
		player: Rc<dyn Player>,
		store: Rc<dyn Store>,
		options: Options,
	) -> Result<Self, Error> {
		if let Err(err) = storage::probe(store.as_ref()) {
			log::warn!("videojs-persist aborted. localStorage not available. ({err})");
			return Err(Error::StoreUnavailable(err));
		}

		let inner = Rc::new(Inner {
			player: player.clone(),
			store,
			options,
			record: RefCell::new(PreferenceRecord::default()),
			subscriptions: RefCell::new(Vec::new()),
		});
		player.ready({
			let inner = inner.clone();
			Box::new(move || Inner::on_ready(&inner))
		});
		Ok(Self { inner })
	}

	pub fn options(&self) -> &Options {
		&self.inner.options
	}

	/// Returns a copy of the in-memory record, as last read or written.
	pub fn record(&self) -> PreferenceRecord {
		self.inner.record.borrow().clone()
	}

	/// Removes every player listener this session registered. No further writes happen.
	pub fn dispose(&self) {
		let subscriptions = self.inner.subscriptions.take();
		log::debug!("Removing {} persist listeners", subscriptions.len());
		for subscription in subscriptions {
			subscription.cancel();
		}
	}
}

impl std::fmt::Debug for PreferenceSync {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PreferenceSync")
			.field("options", &self.inner.options)
			.field("record", &self.inner.record)
			.field("listeners", &self.inner.subscriptions.borrow().len())
			.finish()
	}
}

impl Inner {
	fn on_ready(self: &Rc<Self>) {
		let player = self.player.clone();
		player.add_class(PLAYER_CLASS);

		let record = self.load();
		restore(player.as_ref(), &self.options, &record);
		*self.record.borrow_mut() = record;

		self.listen(player.as_ref());
	}

	fn load(&self) -> PreferenceRecord {
		let stored = match self.store.get_item(&self.options.key) {
			Ok(stored) => stored,
			Err(err) => {
				log::warn!("Failed to read preferences from {:?}: {err}", self.options.key);
				return PreferenceRecord::default();
			}
		};
		match PreferenceRecord::parse(stored.as_deref()) {
			Ok(record) => record,
			Err(err) => {
				log::debug!("Ignoring stored preferences: {err}");
				PreferenceRecord::default()
			}
		}
	}

	fn listen(self: &Rc<Self>, player: &dyn Player) {
		let enabled = self.options.enabled();
		let mut subscriptions = Vec::with_capacity(3);

		if enabled.contains(Preference::Captions) {
			subscriptions.push(self.on(player, PlayerEvent::TextTrackChange, |inner, player| {
				let tracks = player.text_tracks();
				inner.update(|record| captions_changed(record, &tracks));
			}));
		}

		if enabled.contains(Preference::PlaybackRate) {
			subscriptions.push(self.on(player, PlayerEvent::RateChange, |inner, player| {
				let rate = player.playback_rate();
				player.set_default_playback_rate(rate);
				inner.update(|record| rate_changed(record, rate));
			}));
		}

		if enabled.contains(Preference::Muted) || enabled.contains(Preference::Volume) {
			subscriptions.push(self.on(player, PlayerEvent::VolumeChange, |inner, player| {
				let muted = player.muted();
				if inner.options.muted {
					player.set_default_muted(muted);
				}
				let volume = player.volume();
				inner.update(|record| volume_changed(record, &inner.options, volume, muted));
			}));
		}

		self.subscriptions.borrow_mut().extend(subscriptions);
	}

	fn on(
		self: &Rc<Self>,
		player: &dyn Player,
		event: PlayerEvent,
		handler: impl Fn(&Inner, &dyn Player) + 'static,
	) -> Subscription {
		let inner = self.clone();
		player.on(
			event,
			Box::new(move || handler(inner.as_ref(), inner.player.as_ref())),
		)
	}

	/// Applies `change` to the in-memory record and writes the whole record to the store.
	fn update(&self, change: impl FnOnce(PreferenceRecord) -> PreferenceRecord) {
		let record = {
			let mut record = self.record.borrow_mut();
			*record = change(std::mem::take(&mut *record));
			record.clone()
		};
		if let Err(err) = self.save(&record) {
			log::warn!("Failed to save preferences to {:?}: {err}", self.options.key);
		}
	}

	fn save(&self, record: &PreferenceRecord) -> Result<(), Error> {
		let json = record.to_json()?;
		self.store.set_item(&self.options.key, &json)?;
		Ok(())
	}
}

/// Applies every enabled preference found in `record` to the player.
///
/// Absent or falsy values are skipped. A saved rate outside the player's supported rates is
/// skipped unless `restore_unsupported_rate` is set; an empty supported list allows any rate.
pub fn restore(player: &dyn Player, options: &Options, record: &PreferenceRecord) {
	for preference in options.enabled() {
		match preference {
			Preference::PlaybackRate => {
				let Some(rate) = record.preferred_rate() else {
					continue;
				};
				let supported = player.supported_rates();
				if !options.restore_unsupported_rate && !is_supported_rate(&supported, rate) {
					log::debug!("Not restoring playback rate {rate}, it is not supported");
					continue;
				}
				player.set_playback_rate(rate);
			}
			Preference::Volume => {
				if let Some(volume) = record.preferred_volume() {
					player.set_volume(volume);
				}
			}
			Preference::Muted => {
				if let Some(muted) = record.preferred_muted() {
					player.set_muted(muted);
				}
			}
			Preference::Captions => {
				if let Some(language) = record.preferred_captions() {
					show_captions(player, language);
				}
			}
		}
	}
}

pub fn is_supported_rate(supported: &[f64], rate: f64) -> bool {
	supported.is_empty() || supported.contains(&rate)
}

/// Shows every captions track in `language`. Other tracks keep their mode.
fn show_captions(player: &dyn Player, language: &str) {
	let tracks = player.text_tracks();
	for (index, track) in tracks.iter().enumerate() {
		if track.kind == TrackKind::Captions && track.language == language {
			player.set_track_mode(index, TrackMode::Showing);
		}
	}
}

/// Records the language of the showing captions track, or an empty string if none is showing.
pub fn captions_changed(mut record: PreferenceRecord, tracks: &[TextTrack]) -> PreferenceRecord {
	let language = tracks
		.iter()
		.filter(|track| track.is_showing_captions())
		.last()
		.map(|track| track.language.clone())
		.unwrap_or_default();
	record.captions = Some(language);
	record
}

pub fn rate_changed(mut record: PreferenceRecord, rate: f64) -> PreferenceRecord {
	record.playback_rate = Some(rate);
	record
}

/// Records mute state and volume, each only if that preference is enabled.
pub fn volume_changed(
	mut record: PreferenceRecord,
	options: &Options,
	volume: f64,
	muted: bool,
) -> PreferenceRecord {
	if options.muted {
		record.muted = Some(muted);
	}
	if options.volume {
		record.volume = Some(volume);
	}
	record
}
