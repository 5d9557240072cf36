use std::str::FromStr;

pub mod memory;
#[cfg(target_family = "wasm")]
pub mod videojs;

/// Events a player emits which affect remembered preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerEvent {
	TextTrackChange,
	RateChange,
	VolumeChange,
}

impl PlayerEvent {
	/// Returns the dom event name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::TextTrackChange => "texttrackchange",
			Self::RateChange => "ratechange",
			Self::VolumeChange => "volumechange",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackKind {
	Captions,
	Subtitles,
	Descriptions,
	Chapters,
	Metadata,
	Other(String),
}

impl TrackKind {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Captions => "captions",
			Self::Subtitles => "subtitles",
			Self::Descriptions => "descriptions",
			Self::Chapters => "chapters",
			Self::Metadata => "metadata",
			Self::Other(kind) => kind.as_str(),
		}
	}
}

impl FromStr for TrackKind {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"captions" => Self::Captions,
			"subtitles" => Self::Subtitles,
			"descriptions" => Self::Descriptions,
			"chapters" => Self::Chapters,
			"metadata" => Self::Metadata,
			other => Self::Other(other.to_owned()),
		})
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackMode {
	#[default]
	Disabled,
	Hidden,
	Showing,
}

impl TrackMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Disabled => "disabled",
			Self::Hidden => "hidden",
			Self::Showing => "showing",
		}
	}
}

impl FromStr for TrackMode {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"disabled" => Ok(Self::Disabled),
			"hidden" => Ok(Self::Hidden),
			"showing" => Ok(Self::Showing),
			_ => Err(()),
		}
	}
}

/// Snapshot of one entry in a player's text track list.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTrack {
	pub kind: TrackKind,
	pub language: String,
	pub mode: TrackMode,
}

impl TextTrack {
	pub fn new(kind: TrackKind, language: impl Into<String>) -> Self {
		Self {
			kind,
			language: language.into(),
			mode: TrackMode::default(),
		}
	}

	pub fn captions(language: impl Into<String>) -> Self {
		Self::new(TrackKind::Captions, language)
	}

	pub fn with_mode(mut self, mode: TrackMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn is_showing_captions(&self) -> bool {
		self.kind == TrackKind::Captions && self.mode == TrackMode::Showing
	}
}

/// Handle to an event listener registered with [`Player::on`].
///
/// Dropping the handle leaves the listener registered; call [`cancel`](Self::cancel) to remove it.
#[must_use]
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn new(cancel: impl FnOnce() + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// A handle for a listener which cannot be removed.
	pub fn detached() -> Self {
		Self { cancel: None }
	}

	pub fn cancel(mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("cancellable", &self.cancel.is_some())
			.finish()
	}
}

/// The capabilities of a media player which preference syncing relies on.
///
/// Calls are made from a single thread; listeners are run one at a time to completion.
pub trait Player {
	/// Runs `callback` once the player is ready for interaction,
	/// immediately if it already is.
	fn ready(&self, callback: Box<dyn FnOnce()>);

	fn playback_rate(&self) -> f64;
	fn set_playback_rate(&self, rate: f64);
	fn set_default_playback_rate(&self, rate: f64);
	/// The rates the player offers. Empty means the player does not restrict rates.
	fn supported_rates(&self) -> Vec<f64>;

	fn volume(&self) -> f64;
	fn set_volume(&self, volume: f64);

	fn muted(&self) -> bool;
	fn set_muted(&self, muted: bool);
	fn set_default_muted(&self, muted: bool);

	fn text_tracks(&self) -> Vec<TextTrack>;
	/// Sets the mode of the track at `index` in the [`text_tracks`](Self::text_tracks) list.
	fn set_track_mode(&self, index: usize, mode: TrackMode);

	fn on(&self, event: PlayerEvent, handler: Box<dyn Fn()>) -> Subscription;

	/// Tags the player's root element with a css class.
	fn add_class(&self, class: &str);
}
