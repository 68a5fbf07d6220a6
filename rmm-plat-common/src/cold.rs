//! Cold boot: one-time construction of the memory map and translation
//! context.

use rmm_debug::{dbg, dbg_err};
use rmm_xlat::{MmapRegion, VaRegion, XlatError, XlatLib};

use crate::{
	BootError, BootManager, ContextStage, GicVirt, Platform, SlotBuffer,
	config::{PLAT_CMN_EXTRA_MMAP_REGIONS, VIRT_ADDR_SPACE_SIZE},
	regions::build_region_table,
};

impl<P: Platform> BootManager<P> {
	/// Builds the runtime memory map and translation context, then
	/// initializes the interrupt controller and the slot buffer.
	///
	/// `plat_regions` holds the platform's own mappings; only the first
	/// `nregions` entries are used. Must run exactly once, on the primary
	/// core, before any core warm boots. Any failure is fatal for the
	/// whole system and leaves the manager in [`crate::BootState::Failed`].
	pub fn cold_boot(
		&'static self,
		plat_regions: Option<&[MmapRegion]>,
		nregions: usize,
	) -> Result<(), BootError> {
		if !self.begin_cold_boot() {
			dbg_err!("cold boot attempted more than once");
			return Err(BootError::AlreadyInitialized);
		}

		let result = self.cold_boot_inner(plat_regions, nregions);
		self.finish_cold_boot(result.is_ok());
		result
	}

	/// Like [`BootManager::cold_boot`], but takes the platform's memory map
	/// as a raw pointer, as handed over by the platform's entry code.
	///
	/// The region count is range-checked before the pointer is looked at,
	/// and a null pointer is treated as an absent list.
	///
	/// # Safety
	/// If `plat_regions` is non-null and `nregions` does not exceed
	/// [`PLAT_CMN_EXTRA_MMAP_REGIONS`], `plat_regions` must point to
	/// `nregions` initialized, properly aligned regions that stay valid
	/// for the duration of the call.
	pub unsafe fn cold_boot_raw(
		&'static self,
		plat_regions: *const MmapRegion,
		nregions: usize,
	) -> Result<(), BootError> {
		let list = if plat_regions.is_null() || nregions > PLAT_CMN_EXTRA_MMAP_REGIONS {
			None
		} else {
			// SAFETY: Guaranteed by the caller.
			Some(unsafe { core::slice::from_raw_parts(plat_regions, nregions) })
		};

		self.cold_boot(list, nregions)
	}

	/// Runs the cold boot steps in order, stopping at the first failure.
	fn cold_boot_inner(
		&'static self,
		plat_regions: Option<&[MmapRegion]>,
		nregions: usize,
	) -> Result<(), BootError> {
		let platform = self.platform();
		let xlat = platform.xlat();

		let table = build_region_table(&platform.layout(), platform.el3(), plat_regions, nregions)?;
		let regions = self.set_regions(table);

		let cfg = xlat
			.cfg_init(VaRegion::Low, regions, VIRT_ADDR_SPACE_SIZE)
			.map_err(|err| {
				dbg_err!(
					"cold boot: failed to initialize the xlat config ({})",
					err.code()
				);
				BootError::ContextInit {
					stage:  ContextStage::Config,
					source: err,
				}
			})?;

		let Some(tables) = self.tables().take() else {
			dbg_err!("cold boot: xlat table storage is already in use");
			return Err(BootError::ContextInit {
				stage:  ContextStage::Context,
				source: XlatError::AlreadyInitialized,
			});
		};

		let ctx = xlat.ctx_init(cfg, tables).map_err(|err| {
			dbg_err!(
				"cold boot: failed to initialize the xlat ctx ({})",
				err.code()
			);
			BootError::ContextInit {
				stage:  ContextStage::Context,
				source: err,
			}
		})?;
		self.set_ctx(ctx);

		platform.gic().get_virt_features();

		platform.slot_buf().coldboot_init().map_err(|err| {
			dbg_err!(
				"cold boot: failed to initialize the slot buffer ({})",
				err.code()
			);
			BootError::SlotBuffer(err)
		})?;

		dbg!("cold boot complete; {} memory map regions", regions.len());

		Ok(())
	}
}
