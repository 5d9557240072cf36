use super::{Player, PlayerEvent, Subscription, TextTrack, TrackMode};
use std::{
	cell::{Cell, RefCell},
	collections::BTreeMap,
	rc::Rc,
};

type Listeners = BTreeMap<PlayerEvent, Vec<(u64, Rc<dyn Fn()>)>>;

#[derive(Debug, Clone)]
struct State {
	playback_rate: f64,
	default_playback_rate: f64,
	supported_rates: Vec<f64>,
	volume: f64,
	muted: bool,
	default_muted: bool,
	tracks: Vec<TextTrack>,
	classes: Vec<String>,
}

impl Default for State {
	fn default() -> Self {
		Self {
			playback_rate: 1.0,
			default_playback_rate: 1.0,
			supported_rates: Vec::new(),
			volume: 1.0,
			muted: false,
			default_muted: false,
			tracks: Vec::new(),
			classes: Vec::new(),
		}
	}
}

/// Headless [`Player`] which keeps its state in memory.
///
/// Setters behave like a media element: changing the rate emits
/// [`PlayerEvent::RateChange`], changing volume or mute emits [`PlayerEvent::VolumeChange`],
/// and changing a track's mode emits [`PlayerEvent::TextTrackChange`].
/// Events are dispatched synchronously.
#[derive(Default)]
pub struct MemoryPlayer {
	state: RefCell<State>,
	listeners: Rc<RefCell<Listeners>>,
	next_listener: Cell<u64>,
	pending: RefCell<Option<Vec<Box<dyn FnOnce()>>>>,
}

impl MemoryPlayer {
	/// A player which is already ready.
	pub fn new() -> Self {
		Self::default()
	}

	/// A player which holds `ready` callbacks until [`mark_ready`](Self::mark_ready) is called.
	pub fn pending() -> Self {
		Self {
			pending: RefCell::new(Some(Vec::new())),
			..Default::default()
		}
	}

	pub fn with_supported_rates(self, rates: Vec<f64>) -> Self {
		self.state.borrow_mut().supported_rates = rates;
		self
	}

	pub fn with_tracks(self, tracks: Vec<TextTrack>) -> Self {
		self.state.borrow_mut().tracks = tracks;
		self
	}

	pub fn is_ready(&self) -> bool {
		self.pending.borrow().is_none()
	}

	/// Runs every callback queued by [`Player::ready`]. Later callbacks run immediately.
	pub fn mark_ready(&self) {
		let Some(pending) = self.pending.take() else {
			return;
		};
		for callback in pending {
			callback();
		}
	}

	pub fn default_playback_rate(&self) -> f64 {
		self.state.borrow().default_playback_rate
	}

	pub fn default_muted(&self) -> bool {
		self.state.borrow().default_muted
	}

	pub fn classes(&self) -> Vec<String> {
		self.state.borrow().classes.clone()
	}

	pub fn listener_count(&self, event: PlayerEvent) -> usize {
		self.listeners.borrow().get(&event).map(Vec::len).unwrap_or_default()
	}

	/// Runs every listener registered for `event`, in registration order.
	pub fn emit(&self, event: PlayerEvent) {
		// Listeners may call back into the player, so nothing stays borrowed while they run.
		let handlers = match self.listeners.borrow().get(&event) {
			Some(handlers) => {
				handlers.iter().map(|(_, handler)| handler.clone()).collect::<Vec<_>>()
			}
			None => return,
		};
		for handler in handlers {
			handler();
		}
	}

	fn update<T: PartialEq>(
		&self,
		event: PlayerEvent,
		value: T,
		field: impl FnOnce(&mut State) -> &mut T,
	) {
		let changed = {
			let mut state = self.state.borrow_mut();
			let slot = field(&mut state);
			let changed = *slot != value;
			*slot = value;
			changed
		};
		if changed {
			self.emit(event);
		}
	}
}

impl std::fmt::Debug for MemoryPlayer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryPlayer")
			.field("state", &self.state)
			.field("ready", &self.is_ready())
			.finish()
	}
}

impl Player for MemoryPlayer {
	fn ready(&self, callback: Box<dyn FnOnce()>) {
		if let Some(pending) = self.pending.borrow_mut().as_mut() {
			pending.push(callback);
			return;
		}
		callback();
	}

	fn playback_rate(&self) -> f64 {
		self.state.borrow().playback_rate
	}

	fn set_playback_rate(&self, rate: f64) {
		self.update(PlayerEvent::RateChange, rate, |state| &mut state.playback_rate);
	}

	fn set_default_playback_rate(&self, rate: f64) {
		self.state.borrow_mut().default_playback_rate = rate;
	}

	fn supported_rates(&self) -> Vec<f64> {
		self.state.borrow().supported_rates.clone()
	}

	fn volume(&self) -> f64 {
		self.state.borrow().volume
	}

	fn set_volume(&self, volume: f64) {
		self.update(PlayerEvent::VolumeChange, volume.clamp(0.0, 1.0), |state| {
			&mut state.volume
		});
	}

	fn muted(&self) -> bool {
		self.state.borrow().muted
	}

	fn set_muted(&self, muted: bool) {
		self.update(PlayerEvent::VolumeChange, muted, |state| &mut state.muted);
	}

	fn set_default_muted(&self, muted: bool) {
		self.state.borrow_mut().default_muted = muted;
	}

	fn text_tracks(&self) -> Vec<TextTrack> {
		self.state.borrow().tracks.clone()
	}

	fn set_track_mode(&self, index: usize, mode: TrackMode) {
		if index >= self.state.borrow().tracks.len() {
			return;
		}
		self.update(PlayerEvent::TextTrackChange, mode, |state| &mut state.tracks[index].mode);
	}

	fn on(&self, event: PlayerEvent, handler: Box<dyn Fn()>) -> Subscription {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		self.listeners.borrow_mut().entry(event).or_default().push((id, Rc::from(handler)));

		let listeners = Rc::downgrade(&self.listeners);
		Subscription::new(move || {
			let Some(listeners) = listeners.upgrade() else {
				return;
			};
			let mut listeners = listeners.borrow_mut();
			if let Some(handlers) = listeners.get_mut(&event) {
				handlers.retain(|(other, _)| *other != id);
			}
		})
	}

	fn add_class(&self, class: &str) {
		let mut state = self.state.borrow_mut();
		if !state.classes.iter().any(|existing| existing == class) {
			state.classes.push(class.to_owned());
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn counter(player: &MemoryPlayer, event: PlayerEvent) -> (Rc<Cell<usize>>, Subscription) {
		let count = Rc::new(Cell::new(0));
		let subscription = player.on(event, {
			let count = count.clone();
			Box::new(move || count.set(count.get() + 1))
		});
		(count, subscription)
	}

	#[test]
	fn setters_emit_on_change() {
		let player = MemoryPlayer::new();
		let (rate, _rate_sub) = counter(&player, PlayerEvent::RateChange);
		let (volume, _volume_sub) = counter(&player, PlayerEvent::VolumeChange);
		player.set_playback_rate(1.5);
		player.set_playback_rate(1.5);
		player.set_volume(0.2);
		player.set_muted(true);
		player.set_default_muted(false);
		assert_eq!(rate.get(), 1);
		assert_eq!(volume.get(), 2);
	}

	#[test]
	fn cancelled_listener_is_removed() {
		let player = MemoryPlayer::new();
		let (count, subscription) = counter(&player, PlayerEvent::RateChange);
		assert_eq!(player.listener_count(PlayerEvent::RateChange), 1);
		subscription.cancel();
		assert_eq!(player.listener_count(PlayerEvent::RateChange), 0);
		player.emit(PlayerEvent::RateChange);
		assert_eq!(count.get(), 0);
	}

	#[test]
	fn listener_reads_player() {
		let player = Rc::new(MemoryPlayer::new());
		let seen = Rc::new(Cell::new(0.0));
		let _subscription = player.on(PlayerEvent::RateChange, {
			let player = Rc::downgrade(&player);
			let seen = seen.clone();
			Box::new(move || {
				if let Some(player) = player.upgrade() {
					seen.set(player.playback_rate());
				}
			})
		});
		player.set_playback_rate(0.75);
		assert_eq!(seen.get(), 0.75);
	}

	#[test]
	fn pending_ready() {
		let player = MemoryPlayer::pending();
		let calls = Rc::new(Cell::new(0));
		player.ready({
			let calls = calls.clone();
			Box::new(move || calls.set(calls.get() + 1))
		});
		assert_eq!(calls.get(), 0);
		player.mark_ready();
		assert_eq!(calls.get(), 1);
		player.ready({
			let calls = calls.clone();
			Box::new(move || calls.set(calls.get() + 1))
		});
		assert_eq!(calls.get(), 2);
	}

	#[test]
	fn track_mode_out_of_range() {
		let player = MemoryPlayer::new().with_tracks(vec![TextTrack::captions("en")]);
		player.set_track_mode(3, TrackMode::Showing);
		assert_eq!(player.text_tracks()[0].mode, TrackMode::Disabled);
	}
}
