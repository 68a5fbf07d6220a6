//! Boot errors.

use rmm_xlat::{XlatError, errno};

/// The translation context initialization stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextStage {
	/// Building the configuration from the memory map.
	Config,
	/// Binding the configuration to the table storage.
	Context,
}

/// An error produced while cold or warm booting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BootError {
	/// The platform supplied more regions than the memory map reserves.
	#[error("platform supplied {count} memory map regions, at most {max} are supported")]
	RangeExceeded {
		/// The number of regions supplied.
		count: usize,
		/// The configured maximum.
		max:   usize,
	},
	/// The platform announced more regions than it supplied.
	#[error("platform announced {count} memory map regions but the list is missing or shorter")]
	InvalidArgument {
		/// The number of regions announced.
		count: usize,
	},
	/// The translation library rejected the memory map or the storage.
	#[error("translation context {stage:?} initialization failed: {source}")]
	ContextInit {
		/// The failed stage.
		stage:  ContextStage,
		/// The library's error.
		source: XlatError,
	},
	/// The slot buffer could not be initialized.
	#[error("slot buffer initialization failed: {0}")]
	SlotBuffer(XlatError),
	/// A core could not program its MMU from the translation context.
	#[error("failed to set up the MMU on CPU[{cpu}]: {source}")]
	MmuActivation {
		/// The core that failed.
		cpu:    u32,
		/// The library's error.
		source: XlatError,
	},
	/// Cold boot was attempted more than once.
	#[error("cold boot already ran")]
	AlreadyInitialized,
	/// Warm boot was attempted before cold boot completed successfully.
	#[error("cold boot has not completed")]
	NotInitialized,
}

impl BootError {
	/// Returns the C-compatible (negative) status code.
	///
	/// Translation library failures report the library's code unchanged.
	#[must_use]
	pub const fn code(self) -> i32 {
		match self {
			Self::RangeExceeded { .. } => -errno::ERANGE,
			Self::InvalidArgument { .. } | Self::NotInitialized => -errno::EINVAL,
			Self::ContextInit { source, .. }
			| Self::SlotBuffer(source)
			| Self::MmuActivation { source, .. } => source.code(),
			Self::AlreadyInitialized => -errno::EALREADY,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_builder_codes() {
		assert_eq!(BootError::RangeExceeded { count: 9, max: 5 }.code(), -34);
		assert_eq!(BootError::InvalidArgument { count: 1 }.code(), -22);
	}

	#[test]
	fn test_library_codes_are_verbatim() {
		let err = BootError::ContextInit {
			stage:  ContextStage::Config,
			source: XlatError::Other(-77),
		};
		assert_eq!(err.code(), -77);

		let err = BootError::MmuActivation {
			cpu:    3,
			source: XlatError::Permission,
		};
		assert_eq!(err.code(), XlatError::Permission.code());
		assert_eq!(BootError::SlotBuffer(XlatError::OutOfMemory).code(), -12);
	}

	#[test]
	fn test_mmu_error_names_core() {
		let err = BootError::MmuActivation {
			cpu:    7,
			source: XlatError::InvalidArgument,
		};
		assert!(err.to_string().contains("CPU[7]"));
	}

	#[test]
	fn test_invalid_argument_covers_short_lists() {
		let msg = BootError::InvalidArgument { count: 3 }.to_string();
		assert_eq!(
			msg,
			"platform announced 3 memory map regions but the list is missing or shorter"
		);
	}
}
