use log::{Level, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Settings for the browser console logger.
#[derive(Debug, Clone)]
pub struct Config {
	level: Level,
	prefer_target: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			level: Level::Debug,
			prefer_target: false,
		}
	}
}

impl Config {
	pub fn with_level(mut self, level: Level) -> Self {
		self.level = level;
		self
	}

	/// Prefix lines with the record target instead of the module path.
	pub fn prefer_target(mut self) -> Self {
		self.prefer_target = true;
		self
	}
}

struct ConsoleLogger(Config);

impl Log for ConsoleLogger {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= self.0.level
	}

	fn log(&self, record: &Record) {
		if !self.enabled(record.metadata()) {
			return;
		}
		let origin = match (self.0.prefer_target, record.module_path()) {
			(false, Some(module)) => module,
			_ => record.target(),
		};
		let line = format!("[{:>5}] {origin}: {}", record.level(), record.args());
		let line = JsValue::from_str(&line);
		match record.level() {
			Level::Error => console::error_1(&line),
			Level::Warn => console::warn_1(&line),
			Level::Info => console::info_1(&line),
			Level::Debug | Level::Trace => console::debug_1(&line),
		}
	}

	fn flush(&self) {}
}

/// Routes `log` records to the browser console. Only the first call installs the logger.
pub fn init(config: Config) {
	let level = config.level;
	if log::set_boxed_logger(Box::new(ConsoleLogger(config))).is_ok() {
		log::set_max_level(level.to_level_filter());
	}
}
