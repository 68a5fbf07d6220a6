//! Memory map region descriptors.

use crate::Attributes;

/// A single entry of a memory map: a contiguous virtual range backed by a
/// contiguous physical range with fixed attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmapRegion {
	/// The first virtual address of the mapping.
	pub base_va: usize,
	/// The first physical address of the mapping.
	pub base_pa: u64,
	/// The size of the mapping, in bytes.
	pub size:    usize,
	/// The mapping attributes.
	pub attr:    Attributes,
}

impl MmapRegion {
	/// Creates a mapping of `size` bytes from `base_va` to `base_pa`.
	#[must_use]
	pub const fn new(base_pa: u64, base_va: usize, size: usize, attr: Attributes) -> Self {
		Self {
			base_va,
			base_pa,
			size,
			attr,
		}
	}

	/// Creates an identity mapping of `size` bytes at `base`.
	#[must_use]
	pub const fn flat(base: usize, size: usize, attr: Attributes) -> Self {
		Self::new(base as u64, base, size, attr)
	}

	/// Returns the last virtual address of the mapping, or `None` if the
	/// mapping is empty or wraps the address space.
	#[must_use]
	pub const fn last_va(&self) -> Option<usize> {
		match self.size.checked_sub(1) {
			Some(extent) => self.base_va.checked_add(extent),
			None => None,
		}
	}
}

/// Whether `regions` are in ascending order of base virtual address.
#[must_use]
pub fn is_sorted_by_va(regions: &[MmapRegion]) -> bool {
	regions.is_sorted_by_key(|r| r.base_va)
}
