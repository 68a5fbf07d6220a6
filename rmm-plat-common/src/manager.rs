//! The process-wide boot manager.

use core::sync::atomic::{AtomicU8, Ordering};

use rmm_xlat::XlatLib;
use spin::Once;

use crate::{Platform, RegionTable, config::TableStorage};

/// The translation context type of a platform.
pub type CtxOf<P> = <<P as Platform>::Xlat as XlatLib>::Ctx;

/// The lifecycle of a [`BootManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BootState {
	/// Cold boot has not started.
	Uninit      = 0,
	/// Cold boot is running.
	ColdBooting = 1,
	/// Cold boot completed; cores may warm boot.
	Ready       = 2,
	/// Cold boot failed. Terminal.
	Failed      = 3,
}

impl BootState {
	/// Decodes a state stored by [`BootManager`].
	const fn from_u8(value: u8) -> Self {
		match value {
			0 => Self::Uninit,
			1 => Self::ColdBooting,
			2 => Self::Ready,
			_ => Self::Failed,
		}
	}
}

/// Owns the runtime memory map and translation context.
///
/// Exactly one manager is meant to exist, in a `static` (or otherwise
/// leaked), as the boot sequence hands `'static` references to the
/// translation library. Cold boot writes the memory map and context
/// once; afterwards both are only read.
pub struct BootManager<P: Platform> {
	/// The platform.
	platform: P,
	/// The storage the translation context's tables live in.
	tables:   &'static TableStorage,
	/// The current [`BootState`].
	state:    AtomicU8,
	/// The runtime memory map, written once during cold boot.
	regions:  Once<RegionTable>,
	/// The runtime translation context, written once during cold boot.
	ctx:      Once<CtxOf<P>>,
}

impl<P: Platform> BootManager<P> {
	/// Creates a manager that has not cold booted yet.
	pub const fn new(platform: P, tables: &'static TableStorage) -> Self {
		Self {
			platform,
			tables,
			state: AtomicU8::new(BootState::Uninit as u8),
			regions: Once::new(),
			ctx: Once::new(),
		}
	}

	/// Returns the platform.
	pub const fn platform(&self) -> &P {
		&self.platform
	}

	/// Returns the current state.
	pub fn state(&self) -> BootState {
		BootState::from_u8(self.state.load(Ordering::Acquire))
	}

	/// Returns the runtime memory map, once cold boot has built it.
	pub fn regions(&self) -> Option<&RegionTable> {
		self.regions.get()
	}

	/// Returns the runtime translation context, once cold boot has
	/// built it.
	pub fn ctx(&self) -> Option<&CtxOf<P>> {
		self.ctx.get()
	}

	/// Returns the translation context if cold boot completed.
	pub(crate) fn ready_ctx(&self) -> Option<&CtxOf<P>> {
		if self.state() == BootState::Ready {
			self.ctx.get()
		} else {
			None
		}
	}

	/// Returns the table storage.
	pub(crate) const fn tables(&self) -> &'static TableStorage {
		self.tables
	}

	/// Moves out of [`BootState::Uninit`]. Returns `false` if some other
	/// cold boot got there first.
	pub(crate) fn begin_cold_boot(&self) -> bool {
		self.state
			.compare_exchange(
				BootState::Uninit as u8,
				BootState::ColdBooting as u8,
				Ordering::AcqRel,
				Ordering::Acquire,
			)
			.is_ok()
	}

	/// Records the outcome of the cold boot.
	pub(crate) fn finish_cold_boot(&self, ok: bool) {
		let state = if ok {
			BootState::Ready
		} else {
			BootState::Failed
		};
		self.state.store(state as u8, Ordering::Release);
	}

	/// Stores the memory map.
	pub(crate) fn set_regions(&'static self, table: RegionTable) -> &'static RegionTable {
		self.regions.call_once(|| table)
	}

	/// Stores the translation context.
	pub(crate) fn set_ctx(&self, ctx: CtxOf<P>) {
		self.ctx.call_once(|| ctx);
	}
}
