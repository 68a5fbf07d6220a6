//! Statically allocated translation table storage.

use core::{
	cell::UnsafeCell,
	fmt,
	sync::atomic::{AtomicBool, Ordering},
};

use crate::{XLAT_TABLE_ENTRIES, XLAT_TABLES_ALIGNMENT};

// The alignment attribute below must agree with the constant.
const _: () = assert!(XLAT_TABLES_ALIGNMENT == 4096);

/// A single, page-aligned translation table.
#[derive(Clone)]
#[repr(C, align(4096))]
pub struct XlatTable(pub [u64; XLAT_TABLE_ENTRIES]);

impl XlatTable {
	/// Returns a table with every descriptor invalid.
	#[must_use]
	pub const fn zeroed() -> Self {
		Self([0; XLAT_TABLE_ENTRIES])
	}

	/// Returns the address of the table.
	#[must_use]
	pub fn addr(&self) -> usize {
		core::ptr::from_ref(self).addr()
	}
}

impl fmt::Debug for XlatTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("XlatTable")
			.field("addr", &format_args!("{:#x}", self.addr()))
			.finish_non_exhaustive()
	}
}

/// A fixed number of translation tables, allocated statically and handed
/// out at most once.
///
/// Intended to be placed in a `static`; [`StaticTables::take`] yields the
/// unique mutable reference to the storage.
pub struct StaticTables<const N: usize> {
	/// Whether the storage has been handed out.
	taken:  AtomicBool,
	/// The tables themselves.
	tables: UnsafeCell<[XlatTable; N]>,
}

// SAFETY: The inner tables are only reachable through `take()`, which hands
// SAFETY: out a single mutable reference for the lifetime of the program.
unsafe impl<const N: usize> Sync for StaticTables<N> {}

impl<const N: usize> StaticTables<N> {
	/// Creates zeroed storage.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			taken:  AtomicBool::new(false),
			tables: UnsafeCell::new([const { XlatTable::zeroed() }; N]),
		}
	}

	/// The number of tables held.
	#[must_use]
	pub const fn capacity(&self) -> usize {
		N
	}

	/// Whether the storage has already been handed out.
	#[must_use]
	pub fn is_taken(&self) -> bool {
		self.taken.load(Ordering::Acquire)
	}

	/// Hands out the storage. Returns `None` on every call after the first.
	#[must_use]
	pub fn take(&'static self) -> Option<&'static mut [XlatTable]> {
		if self.taken.swap(true, Ordering::AcqRel) {
			return None;
		}

		// SAFETY: The swap above guarantees this is the only reference
		// SAFETY: ever created to the tables.
		Some(unsafe { &mut *self.tables.get() })
	}
}

impl<const N: usize> Default for StaticTables<N> {
	fn default() -> Self {
		Self::new()
	}
}
