//! The SMC dispatcher seam and the host-side call wrappers.

use crate::{RmiCommand, SMC_ARGS};

/// The result registers of an SMC (`x0`..`x4`). `x0` holds the status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct SmcResult {
	/// The returned registers.
	pub x: [u64; 5],
}

impl SmcResult {
	/// Creates a result carrying only a status.
	#[must_use]
	pub const fn status_only(status: u64) -> Self {
		Self {
			x: [status, 0, 0, 0, 0],
		}
	}

	/// Returns the status word (`x0`).
	#[must_use]
	pub const fn status(&self) -> u64 {
		self.x[0]
	}
}

/// Handles SMCs trapped from the normal world.
pub trait SmcHandler {
	/// Handles the call identified by `fid` with the given positional
	/// arguments (`x1`..`x6`).
	fn handle_ns_smc(&self, fid: u32, args: [u64; SMC_ARGS]) -> SmcResult;
}

/// Issues `cmd` to `handler`.
pub fn invoke<H: SmcHandler + ?Sized>(handler: &H, cmd: RmiCommand) -> SmcResult {
	handler.handle_ns_smc(cmd.fid(), cmd.to_args())
}

/// Generates a host-side wrapper per call.
macro_rules! wrappers {
	($($(#[$meta:meta])* $name:ident => $variant:ident { $($arg:ident : $ty:ty),* $(,)? };)*) => {
		$(
			$(#[$meta])*
			pub fn $name<H: SmcHandler + ?Sized>(handler: &H, $($arg: $ty),*) -> SmcResult {
				invoke(handler, RmiCommand::$variant { $($arg),* })
			}
		)*
	};
}

wrappers! {
	/// Issues `RMI_GRANULE_DELEGATE`.
	granule_delegate => GranuleDelegate { addr: u64 };
	/// Issues `RMI_GRANULE_UNDELEGATE`.
	granule_undelegate => GranuleUndelegate { addr: u64 };
	/// Issues `RMI_REALM_CREATE`.
	realm_create => RealmCreate { rd: u64, params: u64 };
	/// Issues `RMI_REALM_DESTROY`.
	realm_destroy => RealmDestroy { rd: u64 };
	/// Issues `RMI_REALM_ACTIVATE`.
	realm_activate => RealmActivate { rd: u64 };
	/// Issues `RMI_RTT_CREATE`.
	rtt_create => RttCreate { rtt: u64, rd: u64, ipa: u64, level: u32 };
	/// Issues `RMI_RTT_DESTROY`.
	rtt_destroy => RttDestroy { rtt: u64, rd: u64, ipa: u64, level: u32 };
	/// Issues `RMI_REC_AUX_COUNT`.
	rec_aux_count => RecAuxCount { rd: u64 };
	/// Issues `RMI_REC_CREATE`.
	rec_create => RecCreate { rec: u64, rd: u64, params: u64 };
	/// Issues `RMI_REC_DESTROY`.
	rec_destroy => RecDestroy { rec: u64 };
	/// Issues `RMI_REC_ENTER`.
	rec_enter => RecEnter { rec: u64, run: u64 };
}
