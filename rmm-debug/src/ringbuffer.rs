//! Implements a simple ring buffer and a log sink on top of it.

use core::fmt::{self, Write};

use spin::Mutex;

use crate::{Level, Sink};

/// Simple byte ring buffer.
///
/// Once full, new bytes overwrite the oldest ones.
pub struct RingBuffer<const SZ: usize> {
	/// The ring buffer contents
	bytes:        [u8; SZ],
	/// The current write offset of the ring buffer.
	write_offset: usize,
	/// The number of valid bytes held.
	len:          usize,
}

impl<const SZ: usize> Default for RingBuffer<SZ> {
	#[inline]
	fn default() -> Self {
		Self::new()
	}
}

impl<const SZ: usize> RingBuffer<SZ> {
	/// Creates a new ring buffer.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			bytes:        [0; SZ],
			write_offset: 0,
			len:          0,
		}
	}

	/// The number of bytes currently held.
	#[must_use]
	pub const fn len(&self) -> usize {
		self.len
	}

	/// Whether the buffer holds no bytes.
	#[must_use]
	pub const fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Offset of the oldest held byte.
	const fn read_offset(&self) -> usize {
		(self.write_offset + SZ - self.len) % SZ
	}

	/// Brings a bag of bytes into the buffer, dropping the oldest
	/// bytes if there isn't room.
	pub fn write(&mut self, bytes: &[u8]) {
		if SZ == 0 {
			return;
		}

		for b in bytes {
			self.bytes[self.write_offset] = *b;
			self.write_offset = (self.write_offset + 1) % SZ;
			self.len = (self.len + 1).min(SZ);
		}
	}

	/// Copies the held bytes, oldest first, into `out` without consuming
	/// them. Returns the number of bytes copied.
	pub fn copy_to(&self, out: &mut [u8]) -> usize {
		let count = self.len.min(out.len());
		if count == 0 {
			return 0;
		}

		let start = self.read_offset();
		for (i, slot) in out[..count].iter_mut().enumerate() {
			*slot = self.bytes[(start + i) % SZ];
		}
		count
	}

	/// Moves the held bytes, oldest first, into `out`. Returns the number
	/// of bytes moved; those bytes are no longer held.
	pub fn read(&mut self, out: &mut [u8]) -> usize {
		let count = self.copy_to(out);
		self.len -= count;
		count
	}
}

impl<const SZ: usize> Write for RingBuffer<SZ> {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.write(s.as_bytes());
		Ok(())
	}
}

/// A [`Sink`] that keeps the newest `SZ` bytes of log output in memory.
///
/// Can be placed in a `static`.
pub struct RingSink<const SZ: usize> {
	/// The guarded ring.
	ring: Mutex<RingBuffer<SZ>>,
}

impl<const SZ: usize> RingSink<SZ> {
	/// Creates an empty ring sink.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			ring: Mutex::new(RingBuffer::new()),
		}
	}

	/// See [`RingBuffer::copy_to`].
	pub fn copy_to(&self, out: &mut [u8]) -> usize {
		self.ring.lock().copy_to(out)
	}

	/// See [`RingBuffer::read`].
	pub fn read(&self, out: &mut [u8]) -> usize {
		self.ring.lock().read(out)
	}

	/// The number of bytes currently held.
	#[must_use]
	pub fn len(&self) -> usize {
		self.ring.lock().len()
	}

	/// Whether the sink holds no output.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.ring.lock().is_empty()
	}
}

impl<const SZ: usize> Default for RingSink<SZ> {
	fn default() -> Self {
		Self::new()
	}
}

impl<const SZ: usize> Sink for RingSink<SZ> {
	fn write_line(&self, _level: Level, line: fmt::Arguments<'_>) {
		// Writing into the ring cannot fail.
		let _ = writeln!(self.ring.lock(), "{line}");
	}
}
