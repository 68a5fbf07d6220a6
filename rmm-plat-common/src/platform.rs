//! The platform seam.
//!
//! Everything the boot sequence needs that differs between platforms is
//! reached through [`Platform`].

use rmm_xlat::{XlatError, XlatLib};

/// The addresses of the runtime image sections, as laid out by the linker.
///
/// All ranges are half-open and page-aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
	/// The start of the executable code.
	pub code_start:    usize,
	/// The end of the executable code.
	pub code_end:      usize,
	/// The start of the read-only data.
	pub ro_start:      usize,
	/// The end of the read-only data.
	pub ro_end:        usize,
	/// The start of the read-write data.
	pub rw_start:      usize,
	/// The end of the read-write data.
	pub rw_end:        usize,
	/// The virtual address at which the EL3 shared buffer is mapped.
	pub shared_buf_va: usize,
}

impl ImageLayout {
	/// The size of the code section.
	#[must_use]
	pub const fn code_size(&self) -> usize {
		self.code_end.saturating_sub(self.code_start)
	}

	/// The size of the read-only data section.
	#[must_use]
	pub const fn ro_size(&self) -> usize {
		self.ro_end.saturating_sub(self.ro_start)
	}

	/// The size of the read-write data section.
	#[must_use]
	pub const fn rw_size(&self) -> usize {
		self.rw_end.saturating_sub(self.rw_start)
	}
}

/// The interface negotiated with EL3 firmware at boot.
pub trait El3Interface: Sync {
	/// The physical address of the buffer shared with EL3.
	fn shared_buf_pa(&self) -> u64;
	/// The size of the buffer shared with EL3.
	fn shared_buf_size(&self) -> usize;
}

/// Interrupt controller virtualization support.
pub trait GicVirt: Sync {
	/// Discovers and records the virtualization features of the
	/// interrupt controller.
	fn get_virt_features(&self);
}

/// The per-core slot buffer: a high-half scratch mapping each core uses
/// to access granules temporarily.
pub trait SlotBuffer: Sync {
	/// One-time initialization, run during cold boot.
	fn coldboot_init(&self) -> Result<(), XlatError>;
	/// Activates the slot buffer context on the executing core.
	fn setup_xlat(&self);
}

/// A platform the runtime can boot on.
pub trait Platform: Sync + 'static {
	/// The stage 1 translation library.
	type Xlat: XlatLib;
	/// The EL3 interface.
	type El3: El3Interface;
	/// The interrupt controller.
	type Gic: GicVirt;
	/// The slot buffer.
	type SlotBuf: SlotBuffer;

	/// Returns the runtime image layout.
	fn layout(&self) -> ImageLayout;
	/// Returns the translation library.
	fn xlat(&self) -> &Self::Xlat;
	/// Returns the EL3 interface.
	fn el3(&self) -> &Self::El3;
	/// Returns the interrupt controller.
	fn gic(&self) -> &Self::Gic;
	/// Returns the slot buffer.
	fn slot_buf(&self) -> &Self::SlotBuf;
	/// Returns the linear ID of the executing core.
	fn cpu_id(&self) -> u32;
}
