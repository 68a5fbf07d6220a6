//! Emulated slot buffer.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::collections::BTreeSet;

use rmm_plat_common::SlotBuffer;
use rmm_xlat::XlatError;
use spin::Mutex;

use crate::cpu;

/// The host's slot buffer.
///
/// Cold boot checks that the per-core contexts can be sized; warm boot
/// marks the executing core's context as active.
pub struct HostSlotBuf {
	/// The number of cores, as negotiated with EL3.
	max_cpus:    AtomicU32,
	/// Whether cold boot initialization completed.
	initialized: AtomicBool,
	/// A pending one-shot cold boot failure.
	inject:      Mutex<Option<XlatError>>,
	/// The cores whose slot buffer context is active.
	active:      Mutex<BTreeSet<u32>>,
}

impl HostSlotBuf {
	/// Creates an uninitialized slot buffer.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			max_cpus:    AtomicU32::new(0),
			initialized: AtomicBool::new(false),
			inject:      Mutex::new(None),
			active:      Mutex::new(BTreeSet::new()),
		}
	}

	/// Sets the number of cores to provide contexts for.
	pub fn set_max_cpus(&self, max_cpus: u32) {
		self.max_cpus.store(max_cpus, Ordering::Release);
	}

	/// Makes the next cold boot initialization fail with `err`.
	pub fn inject(&self, err: XlatError) {
		*self.inject.lock() = Some(err);
	}

	/// Whether cold boot initialization completed.
	#[must_use]
	pub fn is_initialized(&self) -> bool {
		self.initialized.load(Ordering::Acquire)
	}

	/// Whether core `cpu` activated its context.
	#[must_use]
	pub fn is_active(&self, cpu: u32) -> bool {
		self.active.lock().contains(&cpu)
	}
}

impl Default for HostSlotBuf {
	fn default() -> Self {
		Self::new()
	}
}

impl SlotBuffer for HostSlotBuf {
	fn coldboot_init(&self) -> Result<(), XlatError> {
		if let Some(err) = self.inject.lock().take() {
			return Err(err);
		}

		if self.max_cpus.load(Ordering::Acquire) == 0 {
			return Err(XlatError::InvalidArgument);
		}

		self.initialized.store(true, Ordering::Release);
		Ok(())
	}

	fn setup_xlat(&self) {
		self.active.lock().insert(cpu::current());
	}
}
