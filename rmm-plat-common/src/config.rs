//! Build-time configuration.
//!
//! The platform-tunable values are read from the environment by the build
//! script:
//!
//! | Variable | Default | Constant |
//! |---|---|---|
//! | `RMM_PLAT_EXTRA_MMAP_REGIONS` | 5 | [`PLAT_CMN_EXTRA_MMAP_REGIONS`] |
//! | `RMM_PLAT_MAX_XLAT_TABLES` | 10 | [`PLAT_CMN_CTX_MAX_XLAT_TABLES`] |
//! | `RMM_VIRT_ADDR_SPACE_WIDTH` | 38 | [`VIRT_ADDR_SPACE_WIDTH`] |

use rmm_xlat::StaticTables;

include!(concat!(env!("OUT_DIR"), "/config.rs"));

/// The number of built-in regions: code, read-only data, read-write data
/// and the EL3 shared buffer.
pub const COMMON_REGIONS: usize = 4;

/// The capacity of the runtime memory map.
pub const TOTAL_MMAP_REGIONS: usize = COMMON_REGIONS + PLAT_CMN_EXTRA_MMAP_REGIONS;

/// The size, in bytes, of the runtime's low virtual address space.
pub const VIRT_ADDR_SPACE_SIZE: usize = 1 << VIRT_ADDR_SPACE_WIDTH;

/// Static storage for the runtime translation context's tables.
pub type TableStorage = StaticTables<PLAT_CMN_CTX_MAX_XLAT_TABLES>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_derived_values() {
		assert_eq!(TOTAL_MMAP_REGIONS, PLAT_CMN_EXTRA_MMAP_REGIONS + 4);
		assert!((25..=48).contains(&VIRT_ADDR_SPACE_WIDTH));
		assert!(VIRT_ADDR_SPACE_SIZE.is_power_of_two());
		assert_eq!(TableStorage::new().capacity(), PLAT_CMN_CTX_MAX_XLAT_TABLES);
	}
}
