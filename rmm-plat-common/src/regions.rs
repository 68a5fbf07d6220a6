//! Construction of the runtime memory map.

use rmm_debug::{dbg_err, dbg_warn};
use rmm_xlat::{Attributes, MemType, MmapRegion, is_sorted_by_va};

use crate::{
	BootError, El3Interface, ImageLayout,
	config::{COMMON_REGIONS, PLAT_CMN_EXTRA_MMAP_REGIONS, TOTAL_MMAP_REGIONS},
};

/// The runtime memory map: the built-in regions merged with the
/// platform's regions.
pub type RegionTable = heapless::Vec<MmapRegion, TOTAL_MMAP_REGIONS>;

/// Returns the built-in regions, in their fixed order: code, read-only
/// data, read-write data, and the EL3 shared buffer.
///
/// The image sections are identity mapped. The shared buffer's physical
/// address and size are only known once EL3 has been queried.
#[must_use]
pub fn common_regions<E: El3Interface + ?Sized>(
	layout: &ImageLayout,
	el3: &E,
) -> [MmapRegion; COMMON_REGIONS] {
	[
		MmapRegion::flat(
			layout.code_start,
			layout.code_size(),
			Attributes::realm(MemType::Code),
		),
		MmapRegion::flat(
			layout.ro_start,
			layout.ro_size(),
			Attributes::realm(MemType::RoData),
		),
		MmapRegion::flat(
			layout.rw_start,
			layout.rw_size(),
			Attributes::realm(MemType::RwData),
		),
		MmapRegion::new(
			el3.shared_buf_pa(),
			layout.shared_buf_va,
			el3.shared_buf_size(),
			Attributes::realm(MemType::RwData),
		),
	]
}

/// Builds the runtime memory map from the built-in regions and the first
/// `nregions` entries of `plat_regions`.
///
/// `nregions` is checked against [`PLAT_CMN_EXTRA_MMAP_REGIONS`] before the
/// list is looked at. A missing list is only accepted when `nregions` is
/// zero; a list shorter than `nregions` is rejected the same way.
///
/// The platform regions are placed as a group either before or after the
/// built-in regions, depending on whether the first one lies below the
/// code section. Each group is expected to be sorted already; the two
/// groups are never interleaved.
pub fn build_region_table<E: El3Interface + ?Sized>(
	layout: &ImageLayout,
	el3: &E,
	plat_regions: Option<&[MmapRegion]>,
	nregions: usize,
) -> Result<RegionTable, BootError> {
	if nregions > PLAT_CMN_EXTRA_MMAP_REGIONS {
		dbg_err!(
			"platform memory map has {nregions} regions, at most \
			 {PLAT_CMN_EXTRA_MMAP_REGIONS} are supported"
		);
		return Err(BootError::RangeExceeded {
			count: nregions,
			max:   PLAT_CMN_EXTRA_MMAP_REGIONS,
		});
	}

	let plat: &[MmapRegion] = match plat_regions {
		_ if nregions == 0 => &[],
		Some(list) => {
			list.get(..nregions).ok_or_else(|| {
				dbg_err!(
					"platform memory map announces {nregions} regions but holds {}",
					list.len()
				);
				BootError::InvalidArgument { count: nregions }
			})?
		}
		None => {
			dbg_err!("platform memory map announces {nregions} regions but is missing");
			return Err(BootError::InvalidArgument { count: nregions });
		}
	};

	let common = common_regions(layout, el3);

	let (first, second) = match plat.first() {
		Some(region) if region.base_va < layout.code_start => (plat, &common[..]),
		_ => (&common[..], plat),
	};

	let mut table = RegionTable::new();
	table
		.extend_from_slice(first)
		.and_then(|()| table.extend_from_slice(second))
		.map_err(|()| {
			BootError::RangeExceeded {
				count: nregions,
				max:   PLAT_CMN_EXTRA_MMAP_REGIONS,
			}
		})?;

	if !is_sorted_by_va(&table) {
		dbg_warn!(
			"runtime memory map is not in ascending VA order; the platform regions \
			 straddle the image"
		);
	}

	Ok(table)
}

#[cfg(test)]
mod tests {
	use std::vec::Vec;

	use super::*;
	use crate::mock::{TEST_LAYOUT, TestEl3};

	const EL3: TestEl3 = TestEl3 {
		pa:   0x8800_0000,
		size: 0x1000,
	};

	fn device(va: usize) -> MmapRegion {
		MmapRegion::flat(va, 0x1000, Attributes::non_secure(MemType::Device))
	}

	/// `n` sorted device regions starting at `base`.
	fn plat_list(base: usize, n: usize) -> Vec<MmapRegion> {
		(0..n).map(|i| device(base + i * 0x1_0000)).collect()
	}

	#[test]
	fn test_common_regions_order_and_shared_buffer() {
		let common = common_regions(&TEST_LAYOUT, &EL3);
		assert_eq!(common[0].base_va, TEST_LAYOUT.code_start);
		assert_eq!(common[0].size, TEST_LAYOUT.code_size());
		assert_eq!(common[0].attr.ty, MemType::Code);
		assert_eq!(common[1].base_va, TEST_LAYOUT.ro_start);
		assert_eq!(common[1].attr.ty, MemType::RoData);
		assert_eq!(common[2].base_va, TEST_LAYOUT.rw_start);
		assert_eq!(common[2].attr.ty, MemType::RwData);
		assert_eq!(common[3].base_va, TEST_LAYOUT.shared_buf_va);
		assert_eq!(common[3].base_pa, EL3.pa);
		assert_eq!(common[3].size, EL3.size);
		assert!(common.iter().all(|r| r.attr.is_realm()));
	}

	#[test]
	fn test_every_count_up_to_max_builds_a_sorted_table() {
		for n in 0..=PLAT_CMN_EXTRA_MMAP_REGIONS {
			for base in [0x1c00_0000, 0x9000_0000] {
				let plat = plat_list(base, n);
				let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), n).unwrap();
				assert_eq!(table.len(), n + COMMON_REGIONS);
				assert!(is_sorted_by_va(&table), "n={n} base={base:#x}");

				let common = common_regions(&TEST_LAYOUT, &EL3);
				assert!(common.iter().all(|c| table.contains(c)));
			}
		}
	}

	#[test]
	fn test_too_many_regions_is_range_exceeded() {
		let n = PLAT_CMN_EXTRA_MMAP_REGIONS + 1;
		let plat = plat_list(0x1c00_0000, n);

		for list in [Some(&plat[..]), None] {
			assert_eq!(
				build_region_table(&TEST_LAYOUT, &EL3, list, n),
				Err(BootError::RangeExceeded {
					count: n,
					max:   PLAT_CMN_EXTRA_MMAP_REGIONS,
				})
			);
		}

		assert!(matches!(
			build_region_table(&TEST_LAYOUT, &EL3, None, usize::MAX),
			Err(BootError::RangeExceeded { .. })
		));
	}

	#[test]
	fn test_missing_list_is_invalid_argument() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS == 0 {
			return;
		}

		assert_eq!(
			build_region_table(&TEST_LAYOUT, &EL3, None, 1),
			Err(BootError::InvalidArgument { count: 1 })
		);
	}

	#[test]
	fn test_short_list_is_invalid_argument() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS < 2 {
			return;
		}

		let plat = plat_list(0x1c00_0000, 1);
		assert_eq!(
			build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 2),
			Err(BootError::InvalidArgument { count: 2 })
		);
	}

	#[test]
	fn test_zero_regions_ignores_the_list() {
		let expected = common_regions(&TEST_LAYOUT, &EL3);

		let table = build_region_table(&TEST_LAYOUT, &EL3, None, 0).unwrap();
		assert_eq!(&table[..], &expected[..]);

		let plat = plat_list(0x1c00_0000, 3);
		let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 0).unwrap();
		assert_eq!(&table[..], &expected[..]);
	}

	#[test]
	fn test_low_platform_regions_come_first() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS < 2 {
			return;
		}

		let plat = [device(0x1c09_0000), device(0x1c0a_0000)];
		let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 2).unwrap();

		assert_eq!(&table[..2], &plat[..]);
		assert_eq!(&table[2..], &common_regions(&TEST_LAYOUT, &EL3)[..]);
	}

	#[test]
	fn test_high_platform_regions_come_last() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS < 2 {
			return;
		}

		let plat = [device(0x9000_0000), device(0x9001_0000)];
		let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 2).unwrap();

		assert_eq!(&table[..COMMON_REGIONS], &common_regions(&TEST_LAYOUT, &EL3)[..]);
		assert_eq!(&table[COMMON_REGIONS..], &plat[..]);
	}

	#[test]
	fn test_straddling_platform_regions_keep_their_order() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS < 2 {
			return;
		}

		// Only the first entry decides the placement; the table is
		// built anyway.
		let plat = [device(0x1c09_0000), device(0x9000_0000)];
		let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 2).unwrap();

		assert_eq!(&table[..2], &plat[..]);
		assert!(!is_sorted_by_va(&table));
	}

	#[test]
	fn test_only_the_first_n_entries_are_used() {
		if PLAT_CMN_EXTRA_MMAP_REGIONS < 1 {
			return;
		}

		let plat = plat_list(0x9000_0000, PLAT_CMN_EXTRA_MMAP_REGIONS);
		let table = build_region_table(&TEST_LAYOUT, &EL3, Some(&plat), 1).unwrap();
		assert_eq!(table.len(), COMMON_REGIONS + 1);
		assert_eq!(table[COMMON_REGIONS], plat[0]);
	}
}
