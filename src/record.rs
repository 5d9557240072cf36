use crate::{error::Error, options::Preference};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The last-known playback settings, stored as one json object.
///
/// Fields are optional; an absent or falsy value means "no preference".
/// Keys this crate does not know about, and known keys holding a value of the wrong type,
/// are kept in `extra` and written back untouched unless the field is set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct PreferenceRecord {
	pub playback_rate: Option<f64>,
	pub volume: Option<f64>,
	pub muted: Option<bool>,
	pub captions: Option<String>,
	pub extra: Map<String, Value>,
}

/// Removes `key` from `object` only if its value converts.
fn take<T>(
	object: &mut Map<String, Value>,
	key: Preference,
	convert: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
	let value = convert(object.get(key.as_str())?)?;
	object.remove(key.as_str());
	Some(value)
}

impl From<Map<String, Value>> for PreferenceRecord {
	fn from(mut extra: Map<String, Value>) -> Self {
		Self {
			playback_rate: take(&mut extra, Preference::PlaybackRate, Value::as_f64),
			volume: take(&mut extra, Preference::Volume, Value::as_f64),
			muted: take(&mut extra, Preference::Muted, Value::as_bool),
			captions: take(&mut extra, Preference::Captions, |value| {
				value.as_str().map(str::to_owned)
			}),
			extra,
		}
	}
}

impl From<PreferenceRecord> for Map<String, Value> {
	fn from(record: PreferenceRecord) -> Self {
		let mut object = record.extra;
		let fields = [
			(Preference::PlaybackRate, record.playback_rate.map(Value::from)),
			(Preference::Volume, record.volume.map(Value::from)),
			(Preference::Muted, record.muted.map(Value::from)),
			(Preference::Captions, record.captions.map(Value::from)),
		];
		for (key, value) in fields {
			if let Some(value) = value {
				object.insert(key.as_str().to_owned(), value);
			}
		}
		object
	}
}

impl PreferenceRecord {
	/// Parses the stored value. A missing value or a json `null` is the empty record.
	pub fn parse(stored: Option<&str>) -> Result<Self, Error> {
		let Some(json) = stored else {
			return Ok(Self::default());
		};
		let record = serde_json::from_str::<Option<Self>>(json).map_err(Error::MalformedRecord)?;
		Ok(record.unwrap_or_default())
	}

	pub fn to_json(&self) -> Result<String, Error> {
		Ok(serde_json::to_string(self)?)
	}

	pub fn preferred_rate(&self) -> Option<f64> {
		self.playback_rate.filter(|rate| is_truthy(*rate))
	}

	pub fn preferred_volume(&self) -> Option<f64> {
		self.volume.filter(|volume| is_truthy(*volume))
	}

	/// Only a saved `true` counts, a saved `false` is never applied.
	pub fn preferred_muted(&self) -> Option<bool> {
		self.muted.filter(|muted| *muted)
	}

	pub fn preferred_captions(&self) -> Option<&str> {
		self.captions.as_deref().filter(|language| !language.is_empty())
	}
}

fn is_truthy(value: f64) -> bool {
	value != 0.0 && !value.is_nan()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn missing() {
		assert_eq!(PreferenceRecord::parse(None).unwrap(), PreferenceRecord::default());
	}

	#[test]
	fn null() {
		assert_eq!(PreferenceRecord::parse(Some("null")).unwrap(), PreferenceRecord::default());
	}

	#[test]
	fn malformed() {
		assert!(matches!(
			PreferenceRecord::parse(Some("{not json")),
			Err(Error::MalformedRecord(_))
		));
		assert!(matches!(PreferenceRecord::parse(Some("[0.5]")), Err(Error::MalformedRecord(_))));
	}

	#[test]
	fn wrongly_typed_field_kept_raw() {
		let record = PreferenceRecord::parse(Some(r#"{"volume": "loud", "muted": true}"#)).unwrap();
		assert_eq!(record.volume, None);
		assert_eq!(record.muted, Some(true));
		assert_eq!(record.extra.get("volume"), Some(&Value::from("loud")));
		let written: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
		assert_eq!(written, serde_json::json!({ "muted": true, "volume": "loud" }));
	}

	#[test]
	fn set_field_replaces_raw_value() {
		let mut record = PreferenceRecord::parse(Some(r#"{"muted": 1}"#)).unwrap();
		assert_eq!(record.muted, None);
		record.muted = Some(false);
		assert_eq!(record.to_json().unwrap(), r#"{"muted":false}"#);
	}

	#[test]
	fn integer_rate() {
		let record = PreferenceRecord::parse(Some(r#"{"playbackRate": 2}"#)).unwrap();
		assert_eq!(record.preferred_rate(), Some(2.0));
	}

	#[test]
	fn falsy_values_are_not_preferences() {
		let json = r#"{"playbackRate": 0, "volume": 0, "muted": false, "captions": ""}"#;
		let record = PreferenceRecord::parse(Some(json)).unwrap();
		assert_eq!(record.playback_rate, Some(0.0));
		assert_eq!(record.preferred_rate(), None);
		assert_eq!(record.preferred_volume(), None);
		assert_eq!(record.preferred_muted(), None);
		assert_eq!(record.preferred_captions(), None);
	}

	#[test]
	fn keeps_unknown_keys() {
		let json = r#"{"volume": 0.5, "quality": "720p"}"#;
		let record = PreferenceRecord::parse(Some(json)).unwrap();
		assert_eq!(record.extra.get("quality"), Some(&Value::from("720p")));
		let written: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
		assert_eq!(written, serde_json::json!({ "volume": 0.5, "quality": "720p" }));
	}

	#[test]
	fn omits_absent_fields() {
		let record = PreferenceRecord {
			captions: Some("fr".into()),
			..Default::default()
		};
		assert_eq!(record.to_json().unwrap(), r#"{"captions":"fr"}"#);
	}
}
