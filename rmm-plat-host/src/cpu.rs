//! The executing core.
//!
//! On the host, a core is a thread: each thread carries the ID of the core
//! it pretends to be. Threads that never set one run as core 0.

use std::cell::Cell;

std::thread_local! {
	static CURRENT: Cell<u32> = const { Cell::new(0) };
}

/// Returns the linear ID of the executing core.
#[must_use]
pub fn current() -> u32 {
	CURRENT.get()
}

/// Runs `f` as core `cpu` on the calling thread, then restores the
/// previous core ID.
pub fn run_on<R>(cpu: u32, f: impl FnOnce() -> R) -> R {
	/// Restores the previous ID, even if `f` unwinds.
	struct Restore(u32);

	impl Drop for Restore {
		fn drop(&mut self) {
			CURRENT.set(self.0);
		}
	}

	let _restore = Restore(CURRENT.replace(cpu));
	f()
}
