//! Encoding of RMI calls into positional arguments.

use crate::fid;

/// The number of positional arguments an SMC carries (`x1`..`x6`).
pub const SMC_ARGS: usize = 6;

/// An RMI call, with its arguments.
///
/// Addresses are physical addresses of granules in the normal world's
/// view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RmiCommand {
	/// Delegates a granule to the realm world.
	GranuleDelegate {
		/// The granule's address.
		addr: u64,
	},
	/// Returns a delegated granule to the normal world.
	GranuleUndelegate {
		/// The granule's address.
		addr: u64,
	},
	/// Creates a realm.
	RealmCreate {
		/// The realm descriptor granule.
		rd:     u64,
		/// The realm parameters.
		params: u64,
	},
	/// Destroys a realm.
	RealmDestroy {
		/// The realm descriptor granule.
		rd: u64,
	},
	/// Activates a realm.
	RealmActivate {
		/// The realm descriptor granule.
		rd: u64,
	},
	/// Creates a realm translation table.
	RttCreate {
		/// The granule the table is created in.
		rtt:   u64,
		/// The realm descriptor granule.
		rd:    u64,
		/// The IPA the table maps.
		ipa:   u64,
		/// The level of the table.
		level: u32,
	},
	/// Destroys a realm translation table.
	RttDestroy {
		/// The granule holding the table.
		rtt:   u64,
		/// The realm descriptor granule.
		rd:    u64,
		/// The IPA the table maps.
		ipa:   u64,
		/// The level of the table.
		level: u32,
	},
	/// Queries how many auxiliary granules a REC of the realm needs.
	RecAuxCount {
		/// The realm descriptor granule.
		rd: u64,
	},
	/// Creates a realm execution context.
	RecCreate {
		/// The REC granule.
		rec:    u64,
		/// The realm descriptor granule.
		rd:     u64,
		/// The REC parameters.
		params: u64,
	},
	/// Destroys a realm execution context.
	RecDestroy {
		/// The REC granule.
		rec: u64,
	},
	/// Enters a realm execution context.
	RecEnter {
		/// The REC granule.
		rec: u64,
		/// The run structure shared with the normal world.
		run: u64,
	},
}

/// An error decoding an incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
	/// The function identifier lies outside the RMI range.
	#[error("function identifier {0:#x} is not an RMI call")]
	NotRmi(u32),
	/// The function identifier is an RMI call without a decoder.
	#[error("unsupported RMI function identifier {0:#x}")]
	UnknownFunction(u32),
	/// An argument does not fit its field.
	#[error("argument x{position} of RMI call {fid:#x} is out of range")]
	ArgumentOutOfRange {
		/// The function identifier.
		fid:      u32,
		/// The 1-based register position.
		position: usize,
	},
}

impl RmiCommand {
	/// Returns the function identifier.
	#[must_use]
	pub const fn fid(&self) -> u32 {
		match self {
			Self::GranuleDelegate { .. } => fid::GRANULE_DELEGATE,
			Self::GranuleUndelegate { .. } => fid::GRANULE_UNDELEGATE,
			Self::RealmCreate { .. } => fid::REALM_CREATE,
			Self::RealmDestroy { .. } => fid::REALM_DESTROY,
			Self::RealmActivate { .. } => fid::REALM_ACTIVATE,
			Self::RttCreate { .. } => fid::RTT_CREATE,
			Self::RttDestroy { .. } => fid::RTT_DESTROY,
			Self::RecAuxCount { .. } => fid::REC_AUX_COUNT,
			Self::RecCreate { .. } => fid::REC_CREATE,
			Self::RecDestroy { .. } => fid::REC_DESTROY,
			Self::RecEnter { .. } => fid::REC_ENTER,
		}
	}

	/// Returns the number of positional arguments the call uses.
	#[must_use]
	pub const fn arity(&self) -> usize {
		match self {
			Self::GranuleDelegate { .. }
			| Self::GranuleUndelegate { .. }
			| Self::RealmDestroy { .. }
			| Self::RealmActivate { .. }
			| Self::RecAuxCount { .. }
			| Self::RecDestroy { .. } => 1,
			Self::RealmCreate { .. } | Self::RecEnter { .. } => 2,
			Self::RecCreate { .. } => 3,
			Self::RttCreate { .. } | Self::RttDestroy { .. } => 4,
		}
	}

	/// Packs the arguments into their register positions. Unused positions
	/// are zero.
	#[must_use]
	pub const fn to_args(&self) -> [u64; SMC_ARGS] {
		match *self {
			Self::GranuleDelegate { addr } | Self::GranuleUndelegate { addr } => {
				[addr, 0, 0, 0, 0, 0]
			}
			Self::RealmDestroy { rd } | Self::RealmActivate { rd } | Self::RecAuxCount { rd } => {
				[rd, 0, 0, 0, 0, 0]
			}
			Self::RecDestroy { rec } => [rec, 0, 0, 0, 0, 0],
			Self::RealmCreate { rd, params } => [rd, params, 0, 0, 0, 0],
			Self::RecEnter { rec, run } => [rec, run, 0, 0, 0, 0],
			Self::RecCreate { rec, rd, params } => [rec, rd, params, 0, 0, 0],
			Self::RttCreate {
				rtt,
				rd,
				ipa,
				level,
			}
			| Self::RttDestroy {
				rtt,
				rd,
				ipa,
				level,
			} => [rtt, rd, ipa, level as u64, 0, 0],
		}
	}

	/// Decodes an incoming call. Positions beyond the call's arity are
	/// ignored.
	pub fn decode(fid: u32, args: &[u64; SMC_ARGS]) -> Result<Self, DecodeError> {
		if !fid::is_rmi_fid(fid) {
			return Err(DecodeError::NotRmi(fid));
		}

		let [a0, a1, a2, a3, ..] = *args;

		let level = || {
			u32::try_from(a3).map_err(|_| {
				DecodeError::ArgumentOutOfRange {
					fid,
					position: 4,
				}
			})
		};

		Ok(match fid {
			fid::GRANULE_DELEGATE => Self::GranuleDelegate { addr: a0 },
			fid::GRANULE_UNDELEGATE => Self::GranuleUndelegate { addr: a0 },
			fid::REALM_CREATE => Self::RealmCreate { rd: a0, params: a1 },
			fid::REALM_DESTROY => Self::RealmDestroy { rd: a0 },
			fid::REALM_ACTIVATE => Self::RealmActivate { rd: a0 },
			fid::RTT_CREATE => {
				Self::RttCreate {
					rtt:   a0,
					rd:    a1,
					ipa:   a2,
					level: level()?,
				}
			}
			fid::RTT_DESTROY => {
				Self::RttDestroy {
					rtt:   a0,
					rd:    a1,
					ipa:   a2,
					level: level()?,
				}
			}
			fid::REC_AUX_COUNT => Self::RecAuxCount { rd: a0 },
			fid::REC_CREATE => {
				Self::RecCreate {
					rec:    a0,
					rd:     a1,
					params: a2,
				}
			}
			fid::REC_DESTROY => Self::RecDestroy { rec: a0 },
			fid::REC_ENTER => Self::RecEnter { rec: a0, run: a1 },
			_ => return Err(DecodeError::UnknownFunction(fid)),
		})
	}
}
