//! The host platform.

use rmm_plat_common::{ImageLayout, Platform};
use rmm_xlat::{Attributes, MemType, MmapRegion};

use crate::{El3Ifc, El3IfcError, HOST_ICH_VTR_EL2, HostGic, HostSlotBuf, HostXlat, cpu};

/// Where the host pretends the runtime image is loaded.
pub const HOST_LAYOUT: ImageLayout = ImageLayout {
	code_start:    0x8000_0000,
	code_end:      0x8004_0000,
	ro_start:      0x8004_0000,
	ro_end:        0x8005_0000,
	rw_start:      0x8005_0000,
	rw_end:        0x8008_0000,
	shared_buf_va: 0x8008_0000,
};

/// The host's own device mappings: two non-secure device pages below the
/// image.
pub const HOST_PLAT_REGIONS: [MmapRegion; 2] = [
	MmapRegion::flat(
		0x1c09_0000,
		0x1000,
		Attributes::non_secure(MemType::Device),
	),
	MmapRegion::flat(
		0x1c0a_0000,
		0x1000,
		Attributes::non_secure(MemType::Device),
	),
];

/// A platform made of emulated parts.
pub struct HostPlatform {
	/// The image layout.
	layout:   ImageLayout,
	/// The EL3 interface.
	el3:      El3Ifc,
	/// The translation library.
	xlat:     HostXlat,
	/// The interrupt controller.
	gic:      HostGic,
	/// The slot buffer.
	slot_buf: HostSlotBuf,
}

impl HostPlatform {
	/// Creates a platform whose image is laid out as `layout`.
	#[must_use]
	pub const fn new(layout: ImageLayout) -> Self {
		Self {
			layout,
			el3: El3Ifc::new(),
			xlat: HostXlat::new(),
			gic: HostGic::new(HOST_ICH_VTR_EL2),
			slot_buf: HostSlotBuf::new(),
		}
	}

	/// Performs the EL3 handshake (see [`El3Ifc::init`]) and sizes the
	/// per-core state accordingly.
	pub fn handshake(&self, x0: u64, x1: u64, x2: u64, x3: u64) -> Result<(), El3IfcError> {
		self.el3.init(x0, x1, x2, x3)?;

		let max_cpus = self.el3.max_cpus();
		self.xlat.set_max_cpus(max_cpus);
		self.slot_buf.set_max_cpus(max_cpus);

		Ok(())
	}
}

impl Platform for HostPlatform {
	type El3 = El3Ifc;
	type Gic = HostGic;
	type SlotBuf = HostSlotBuf;
	type Xlat = HostXlat;

	fn layout(&self) -> ImageLayout {
		self.layout
	}

	fn xlat(&self) -> &HostXlat {
		&self.xlat
	}

	fn el3(&self) -> &El3Ifc {
		&self.el3
	}

	fn gic(&self) -> &HostGic {
		&self.gic
	}

	fn slot_buf(&self) -> &HostSlotBuf {
		&self.slot_buf
	}

	fn cpu_id(&self) -> u32 {
		cpu::current()
	}
}
