#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

mod ringbuffer;

use core::fmt;

use spin::Once;

pub use self::ringbuffer::{RingBuffer, RingSink};

/// The severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
	/// Something failed; the caller is about to return an error.
	Error,
	/// Something looks wrong but execution continues.
	Warn,
	/// General information.
	Info,
	/// Per-core chatter; only emitted with the `verbose` feature.
	Verbose,
}

impl Level {
	/// Returns the single-character tag written into each line.
	#[must_use]
	pub const fn tag(self) -> char {
		match self {
			Self::Error => 'E',
			Self::Warn => 'W',
			Self::Info => 'I',
			Self::Verbose => 'V',
		}
	}
}

/// A destination for log lines.
pub trait Sink: Sync {
	/// Writes a single, already-prefixed line logged at `level`.
	///
	/// The line does not carry a terminator; the sink appends one
	/// if its medium needs it.
	fn write_line(&self, level: Level, line: fmt::Arguments<'_>);
}

/// The globally installed sink. Lines logged before installation
/// are dropped.
static SINK: Once<&'static dyn Sink> = Once::new();

/// Installs the global log sink.
///
/// Only the first call has any effect; returns `false` (and ignores
/// `sink`) if a sink was already installed.
pub fn init(sink: &'static dyn Sink) -> bool {
	let mut installed = false;
	SINK.call_once(|| {
		installed = true;
		sink
	});
	installed
}

/// Logs a message to the installed sink.
///
/// Shouldn't be used directly; use the `dbg!` macros instead.
pub fn log(level: Level, file: &str, line: u32, message: fmt::Arguments<'_>) {
	#[cfg(feature = "debug-log")]
	if let Some(sink) = SINK.get() {
		log_to(*sink, level, file, line, message);
	}

	#[cfg(not(feature = "debug-log"))]
	{
		let _ = (level, file, line, message);
	}
}

/// Formats a log line and writes it to the given sink, bypassing the
/// global sink.
pub fn log_to(sink: &dyn Sink, level: Level, file: &str, line: u32, message: fmt::Arguments<'_>) {
	sink.write_line(
		level,
		format_args!("{file}:{line}:{}:{message}", level.tag()),
	);
}

/// Whether `dbg_verbose!` lines are emitted.
#[must_use]
pub const fn verbose_enabled() -> bool {
	cfg!(feature = "verbose")
}

/// Sends a general debug message to the installed sink.
#[macro_export]
macro_rules! dbg {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Info, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}

/// Sends an error debug message to the installed sink.
#[macro_export]
macro_rules! dbg_err {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Error, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}

/// Sends a warning debug message to the installed sink.
#[macro_export]
macro_rules! dbg_warn {
	($($arg:tt)*) => {{
		$crate::log($crate::Level::Warn, ::core::file!(), ::core::line!(), format_args!($($arg)*));
	}};
}

/// Sends a verbose debug message to the installed sink, if the
/// `verbose` feature is enabled.
#[macro_export]
macro_rules! dbg_verbose {
	($($arg:tt)*) => {{
		if $crate::verbose_enabled() {
			$crate::log($crate::Level::Verbose, ::core::file!(), ::core::line!(), format_args!($($arg)*));
		}
	}};
}

#[cfg(test)]
mod tests {
	use std::{string::String, sync::Mutex, vec::Vec};

	use super::*;

	struct Lines(Mutex<Vec<String>>);

	impl Sink for Lines {
		fn write_line(&self, _level: Level, line: fmt::Arguments<'_>) {
			self.0.lock().unwrap().push(line.to_string());
		}
	}

	#[test]
	fn test_log_to_prefixes_location_and_level() {
		let sink = Lines(Mutex::new(Vec::new()));
		log_to(&sink, Level::Error, "src/boot.rs", 42, format_args!("bad {}", 7));
		log_to(&sink, Level::Verbose, "src/warm.rs", 3, format_args!("CPU[1]"));

		let lines = sink.0.lock().unwrap();
		assert_eq!(lines[0], "src/boot.rs:42:E:bad 7");
		assert_eq!(lines[1], "src/warm.rs:3:V:CPU[1]");
	}

	#[test]
	fn test_level_tags() {
		assert_eq!(Level::Error.tag(), 'E');
		assert_eq!(Level::Warn.tag(), 'W');
		assert_eq!(Level::Info.tag(), 'I');
		assert_eq!(Level::Verbose.tag(), 'V');
		assert!(Level::Error < Level::Verbose);
	}
}
