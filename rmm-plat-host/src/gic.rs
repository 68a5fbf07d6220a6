//! Emulated interrupt controller virtualization features.

use rmm_plat_common::GicVirt;
use spin::Once;

/// The emulated `ICH_VTR_EL2`: 4 list registers, 5 priority bits and 5
/// preemption bits.
pub const HOST_ICH_VTR_EL2: u64 = (4 << 29) | (4 << 26) | 3;

/// `ICH_VTR_EL2.ListRegs`
const LIST_REGS_MASK: u64 = 0x1F;
/// `ICH_VTR_EL2.PREbits`
const PRE_BITS_SHIFT: u64 = 26;
/// `ICH_VTR_EL2.PRIbits`
const PRI_BITS_SHIFT: u64 = 29;
/// Width of the `PREbits` and `PRIbits` fields.
const BITS_MASK: u64 = 0x7;

/// The virtual interface features of the interrupt controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GicFeatures {
	/// The number of list registers.
	pub nr_lrs:   u32,
	/// The number of virtual preemption bits.
	pub pre_bits: u32,
	/// The number of virtual priority bits.
	pub pri_bits: u32,
}

impl GicFeatures {
	/// Decodes an `ICH_VTR_EL2` value.
	#[must_use]
	pub const fn from_ich_vtr(vtr: u64) -> Self {
		Self {
			nr_lrs:   (vtr & LIST_REGS_MASK) as u32 + 1,
			pre_bits: ((vtr >> PRE_BITS_SHIFT) & BITS_MASK) as u32 + 1,
			pri_bits: ((vtr >> PRI_BITS_SHIFT) & BITS_MASK) as u32 + 1,
		}
	}
}

/// The host's interrupt controller.
pub struct HostGic {
	/// The register value reported by the "hardware".
	ich_vtr:  u64,
	/// The decoded features, once queried.
	features: Once<GicFeatures>,
}

impl HostGic {
	/// Creates a controller reporting `ich_vtr` as its `ICH_VTR_EL2`.
	#[must_use]
	pub const fn new(ich_vtr: u64) -> Self {
		Self {
			ich_vtr,
			features: Once::new(),
		}
	}

	/// The discovered features, if [`GicVirt::get_virt_features`] ran.
	#[must_use]
	pub fn features(&self) -> Option<GicFeatures> {
		self.features.get().copied()
	}
}

impl GicVirt for HostGic {
	fn get_virt_features(&self) {
		self.features
			.call_once(|| GicFeatures::from_ich_vtr(self.ich_vtr));
	}
}
