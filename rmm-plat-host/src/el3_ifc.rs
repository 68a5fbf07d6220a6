//! Emulation of the boot interface negotiated with EL3 firmware.

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use rmm_plat_common::El3Interface;
use rmm_xlat::PAGE_SIZE;
use spin::Once;

/// The major version of the EL3 interface implemented.
pub const RMM_EL3_IFC_VERSION_MAJOR: u32 = 0;
/// The minor version of the EL3 interface implemented.
pub const RMM_EL3_IFC_VERSION_MINOR: u32 = 1;
/// The encoded interface version, `major << 16 | minor`.
pub const RMM_EL3_IFC_VERSION: u64 =
	((RMM_EL3_IFC_VERSION_MAJOR as u64) << 16) | RMM_EL3_IFC_VERSION_MINOR as u64;

/// The size of the buffer shared with EL3: one page.
pub const SHARED_BUF_SIZE: usize = PAGE_SIZE;

/// A failed handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum El3IfcError {
	/// EL3 speaks an incompatible major version.
	#[error(
		"EL3 interface version {major}.{minor} is incompatible with {}.{}",
		RMM_EL3_IFC_VERSION_MAJOR,
		RMM_EL3_IFC_VERSION_MINOR
	)]
	VersionMismatch {
		/// The major version EL3 reported.
		major: u32,
		/// The minor version EL3 reported.
		minor: u32,
	},
	/// The shared buffer address is null or not page-aligned.
	#[error("invalid EL3 shared buffer address {0:#x}")]
	BadSharedBuffer(u64),
	/// The booting core's ID is not below the number of cores.
	#[error("CPU[{cpu}] is out of range ({max_cpus} CPUs)")]
	CpuOutOfRange {
		/// The booting core.
		cpu:      u64,
		/// The number of cores.
		max_cpus: u64,
	},
	/// The handshake already happened.
	#[error("EL3 handshake already performed")]
	AlreadyInitialized,
}

/// The EL3 interface state.
///
/// Holds nothing useful until [`El3Ifc::init`] has succeeded; until then
/// the getters return zero.
pub struct El3Ifc {
	/// Set once the handshake completed.
	done:          Once<()>,
	/// The negotiated interface version.
	version:       AtomicU64,
	/// The number of cores.
	max_cpus:      AtomicU32,
	/// The physical address of the shared buffer.
	shared_buf_pa: AtomicU64,
}

impl El3Ifc {
	/// Creates an interface on which the handshake has not happened.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			done:          Once::new(),
			version:       AtomicU64::new(0),
			max_cpus:      AtomicU32::new(0),
			shared_buf_pa: AtomicU64::new(0),
		}
	}

	/// Performs the handshake with the values EL3 leaves in the boot
	/// registers: `x0` the booting core's ID, `x1` the interface version,
	/// `x2` the number of cores and `x3` the shared buffer's physical
	/// address.
	pub fn init(&self, x0: u64, x1: u64, x2: u64, x3: u64) -> Result<(), El3IfcError> {
		if self.done.is_completed() {
			return Err(El3IfcError::AlreadyInitialized);
		}

		let major = ((x1 >> 16) & 0x7FFF) as u32;
		let minor = (x1 & 0xFFFF) as u32;
		if major != RMM_EL3_IFC_VERSION_MAJOR {
			return Err(El3IfcError::VersionMismatch { major, minor });
		}

		if x3 == 0 || x3 % PAGE_SIZE as u64 != 0 {
			return Err(El3IfcError::BadSharedBuffer(x3));
		}

		let max_cpus = u32::try_from(x2).map_err(|_| {
			El3IfcError::CpuOutOfRange {
				cpu:      x0,
				max_cpus: x2,
			}
		})?;
		if x0 >= x2 {
			return Err(El3IfcError::CpuOutOfRange {
				cpu:      x0,
				max_cpus: x2,
			});
		}

		let mut first = false;
		self.done.call_once(|| {
			self.version.store(x1, Ordering::Relaxed);
			self.max_cpus.store(max_cpus, Ordering::Relaxed);
			self.shared_buf_pa.store(x3, Ordering::Relaxed);
			first = true;
		});

		if first {
			Ok(())
		} else {
			Err(El3IfcError::AlreadyInitialized)
		}
	}

	/// Whether the handshake completed.
	#[must_use]
	pub fn is_initialized(&self) -> bool {
		self.done.is_completed()
	}

	/// The negotiated interface version.
	#[must_use]
	pub fn version(&self) -> u64 {
		if self.is_initialized() {
			self.version.load(Ordering::Relaxed)
		} else {
			0
		}
	}

	/// The number of cores.
	#[must_use]
	pub fn max_cpus(&self) -> u32 {
		if self.is_initialized() {
			self.max_cpus.load(Ordering::Relaxed)
		} else {
			0
		}
	}
}

impl Default for El3Ifc {
	fn default() -> Self {
		Self::new()
	}
}

impl El3Interface for El3Ifc {
	fn shared_buf_pa(&self) -> u64 {
		if self.is_initialized() {
			self.shared_buf_pa.load(Ordering::Relaxed)
		} else {
			0
		}
	}

	fn shared_buf_size(&self) -> usize {
		if self.is_initialized() { SHARED_BUF_SIZE } else { 0 }
	}
}
