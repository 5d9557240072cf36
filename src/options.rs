use crate::error::Error;
use enumset::{EnumSet, EnumSetType};
use serde::{Deserialize, Serialize};

pub static DEFAULT_KEY: &str = "videojs-persist";

/// The kinds of player settings which can be remembered between sessions.
///
/// Declaration order is the order preferences are restored in.
#[derive(Debug, EnumSetType, Serialize, Deserialize)]
pub enum Preference {
	#[serde(rename = "playbackRate")]
	PlaybackRate,
	#[serde(rename = "volume")]
	Volume,
	#[serde(rename = "muted")]
	Muted,
	#[serde(rename = "captions")]
	Captions,
}

impl Preference {
	/// Returns the name used for this preference in options and in the stored record.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::PlaybackRate => "playbackRate",
			Self::Volume => "volume",
			Self::Muted => "muted",
			Self::Captions => "captions",
		}
	}
}

/// Plugin configuration. Any option left out of a deserialized object keeps its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
	pub muted: bool,
	pub volume: bool,
	pub playback_rate: bool,
	pub captions: bool,
	/// When false, a saved rate the player does not list as supported is not restored.
	pub restore_unsupported_rate: bool,
	/// Storage key the serialized record lives under.
	pub key: String,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			muted: true,
			volume: true,
			playback_rate: true,
			captions: true,
			restore_unsupported_rate: false,
			key: DEFAULT_KEY.to_owned(),
		}
	}
}

impl Options {
	pub fn from_json(json: &str) -> Result<Self, Error> {
		serde_json::from_str(json).map_err(|err| Error::InvalidOptions(err.to_string()))
	}

	pub fn is_enabled(&self, preference: Preference) -> bool {
		match preference {
			Preference::PlaybackRate => self.playback_rate,
			Preference::Volume => self.volume,
			Preference::Muted => self.muted,
			Preference::Captions => self.captions,
		}
	}

	pub fn enabled(&self) -> EnumSet<Preference> {
		EnumSet::<Preference>::all()
			.into_iter()
			.filter(|preference| self.is_enabled(*preference))
			.collect()
	}

	pub fn with(mut self, preference: Preference, enabled: bool) -> Self {
		match preference {
			Preference::PlaybackRate => self.playback_rate = enabled,
			Preference::Volume => self.volume = enabled,
			Preference::Muted => self.muted = enabled,
			Preference::Captions => self.captions = enabled,
		}
		self
	}
}
