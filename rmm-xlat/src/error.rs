//! Translation library status codes.

/// errno values used by the runtime's C-compatible status codes.
///
/// Statuses are returned negated (e.g. `-EINVAL`).
pub mod errno {
	/// Operation not permitted.
	pub const EPERM: i32 = 1;
	/// Out of memory.
	pub const ENOMEM: i32 = 12;
	/// Bad address.
	pub const EFAULT: i32 = 14;
	/// Invalid argument.
	pub const EINVAL: i32 = 22;
	/// Result out of range.
	pub const ERANGE: i32 = 34;
	/// Operation already in progress.
	pub const EALREADY: i32 = 114;
}

/// An error returned by the translation table library.
///
/// Every variant maps onto a fixed negative status code, which is how
/// failures are reported across the runtime's call boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum XlatError {
	/// A parameter was malformed.
	#[error("invalid argument (-EINVAL)")]
	InvalidArgument,
	/// An address or size fell outside the address space.
	#[error("address out of range (-ERANGE)")]
	OutOfRange,
	/// An address or size was not granule-aligned.
	#[error("misaligned address or size (-EFAULT)")]
	Fault,
	/// Regions overlap or are not in ascending order.
	#[error("overlapping or unsorted regions (-EPERM)")]
	Permission,
	/// The table storage cannot hold the required tables.
	#[error("translation table storage exhausted (-ENOMEM)")]
	OutOfMemory,
	/// The object was already initialized.
	#[error("already initialized (-EALREADY)")]
	AlreadyInitialized,
	/// Any other non-zero status.
	#[error("translation library status {0}")]
	Other(i32),
}

impl XlatError {
	/// Returns the (negative) status code.
	#[must_use]
	pub const fn code(self) -> i32 {
		match self {
			Self::InvalidArgument => -errno::EINVAL,
			Self::OutOfRange => -errno::ERANGE,
			Self::Fault => -errno::EFAULT,
			Self::Permission => -errno::EPERM,
			Self::OutOfMemory => -errno::ENOMEM,
			Self::AlreadyInitialized => -errno::EALREADY,
			Self::Other(code) => code,
		}
	}
}
