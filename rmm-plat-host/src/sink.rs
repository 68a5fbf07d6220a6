//! The host log sink.
//!
//! Lines are kept in a ring buffer and forwarded to the [`log`] facade,
//! which the `rmm-host` binary backs with `colog`.

use core::fmt;

use rmm_debug::{Level, RingSink, Sink};

/// The size of the in-memory log.
pub const LOG_RING_SIZE: usize = 16 * 1024;

/// The host's log sink.
pub struct HostSink {
	/// The most recent lines.
	ring: RingSink<LOG_RING_SIZE>,
}

impl HostSink {
	/// Creates an empty sink.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			ring: RingSink::new(),
		}
	}

	/// Returns the retained lines, oldest first, without draining them.
	#[must_use]
	pub fn contents(&self) -> String {
		let mut buf = vec![0; LOG_RING_SIZE];
		let len = self.ring.copy_to(&mut buf);
		buf.truncate(len);
		String::from_utf8_lossy(&buf).into_owned()
	}
}

impl Default for HostSink {
	fn default() -> Self {
		Self::new()
	}
}

impl Sink for HostSink {
	fn write_line(&self, level: Level, line: fmt::Arguments<'_>) {
		self.ring.write_line(level, line);

		let level = match level {
			Level::Error => log::Level::Error,
			Level::Warn => log::Level::Warn,
			Level::Info => log::Level::Info,
			Level::Verbose => log::Level::Debug,
		};
		log::log!(target: "rmm", level, "{line}");
	}
}

/// The process-wide sink.
static SINK: HostSink = HostSink::new();

/// Installs the host sink as the global log sink (once) and returns it.
pub fn install() -> &'static HostSink {
	rmm_debug::init(&SINK);
	&SINK
}
