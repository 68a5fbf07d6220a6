//! Mapping attributes.

use bitflags::bitflags;

/// The memory type of a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemType {
	/// Device-nGnRnE memory; never executable.
	Device,
	/// Normal memory, read-only and executable.
	Code,
	/// Normal memory, read-only and execute-never.
	RoData,
	/// Normal memory, read-write and execute-never.
	RwData,
}

bitflags! {
	/// Additional mapping flags.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct MapFlags: u8 {
		/// The mapping targets the non-secure physical address space.
		/// When absent, the mapping targets the realm physical address space.
		const NS = 1 << 0;
	}
}

/// The complete set of attributes for a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes {
	/// The memory type.
	pub ty:    MemType,
	/// Additional flags, including the security domain.
	pub flags: MapFlags,
}

impl Attributes {
	/// Attributes for a mapping of realm memory.
	#[must_use]
	pub const fn realm(ty: MemType) -> Self {
		Self {
			ty,
			flags: MapFlags::empty(),
		}
	}

	/// Attributes for a mapping of non-secure memory.
	#[must_use]
	pub const fn non_secure(ty: MemType) -> Self {
		Self {
			ty,
			flags: MapFlags::NS,
		}
	}

	/// Whether the mapping targets the realm physical address space.
	#[must_use]
	pub const fn is_realm(self) -> bool {
		!self.flags.contains(MapFlags::NS)
	}
}
