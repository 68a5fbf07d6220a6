//! Warm boot: per-core activation of the translation context.

use rmm_debug::{dbg_err, dbg_verbose};
use rmm_xlat::XlatLib;

use crate::{BootError, BootManager, Platform, SlotBuffer};

impl<P: Platform> BootManager<P> {
	/// Programs the executing core's MMU from the runtime translation
	/// context, then activates the core's slot buffer.
	///
	/// Runs on every core each time it enters the runtime, including the
	/// primary core after [`BootManager::cold_boot`]. A failure is fatal
	/// for the executing core only.
	pub fn warm_boot(&self) -> Result<(), BootError> {
		let platform = self.platform();
		let cpu = platform.cpu_id();

		let Some(ctx) = self.ready_ctx() else {
			dbg_err!("warm boot: CPU[{cpu}] entered before cold boot completed");
			return Err(BootError::NotInitialized);
		};

		platform.xlat().setup_mmu_cfg(ctx).map_err(|err| {
			dbg_err!(
				"warm boot: failed to setup xlat tables for CPU[{cpu}] ({})",
				err.code()
			);
			BootError::MmuActivation { cpu, source: err }
		})?;

		platform.slot_buf().setup_xlat();

		dbg_verbose!("xlat tables configured for CPU[{cpu}]");

		Ok(())
	}
}
