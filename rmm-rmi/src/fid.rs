//! RMI function identifiers.
//!
//! RMI calls are fast, SMC64, standard secure service calls, numbered
//! upwards from [`RMI_FID_BASE`].

/// The function identifier of the first RMI call.
pub const RMI_FID_BASE: u32 = 0xC400_0150;

/// The highest function number reserved for RMI.
pub const RMI_FID_LAST: u32 = RMI_FID_BASE + 0x1F;

/// Returns the function identifier of RMI call `num`.
#[must_use]
pub const fn rmi_fid(num: u32) -> u32 {
	RMI_FID_BASE + num
}

/// Whether `fid` falls within the range reserved for RMI.
#[must_use]
pub const fn is_rmi_fid(fid: u32) -> bool {
	fid >= RMI_FID_BASE && fid <= RMI_FID_LAST
}

/// `RMI_VERSION`
pub const VERSION: u32 = rmi_fid(0x0);
/// `RMI_GRANULE_DELEGATE`
pub const GRANULE_DELEGATE: u32 = rmi_fid(0x1);
/// `RMI_GRANULE_UNDELEGATE`
pub const GRANULE_UNDELEGATE: u32 = rmi_fid(0x2);
/// `RMI_DATA_CREATE`
pub const DATA_CREATE: u32 = rmi_fid(0x3);
/// `RMI_DATA_CREATE_UNKNOWN`
pub const DATA_CREATE_UNKNOWN: u32 = rmi_fid(0x4);
/// `RMI_DATA_DESTROY`
pub const DATA_DESTROY: u32 = rmi_fid(0x5);
/// `RMI_REALM_ACTIVATE`
pub const REALM_ACTIVATE: u32 = rmi_fid(0x7);
/// `RMI_REALM_CREATE`
pub const REALM_CREATE: u32 = rmi_fid(0x8);
/// `RMI_REALM_DESTROY`
pub const REALM_DESTROY: u32 = rmi_fid(0x9);
/// `RMI_REC_CREATE`
pub const REC_CREATE: u32 = rmi_fid(0xA);
/// `RMI_REC_DESTROY`
pub const REC_DESTROY: u32 = rmi_fid(0xB);
/// `RMI_REC_ENTER`
pub const REC_ENTER: u32 = rmi_fid(0xC);
/// `RMI_RTT_CREATE`
pub const RTT_CREATE: u32 = rmi_fid(0xD);
/// `RMI_RTT_DESTROY`
pub const RTT_DESTROY: u32 = rmi_fid(0xE);
/// `RMI_RTT_MAP_UNPROTECTED`
pub const RTT_MAP_UNPROTECTED: u32 = rmi_fid(0xF);
/// `RMI_RTT_READ_ENTRY`
pub const RTT_READ_ENTRY: u32 = rmi_fid(0x11);
/// `RMI_RTT_UNMAP_UNPROTECTED`
pub const RTT_UNMAP_UNPROTECTED: u32 = rmi_fid(0x12);
/// `RMI_PSCI_COMPLETE`
pub const PSCI_COMPLETE: u32 = rmi_fid(0x14);
/// `RMI_FEATURES`
pub const FEATURES: u32 = rmi_fid(0x15);
/// `RMI_RTT_FOLD`
pub const RTT_FOLD: u32 = rmi_fid(0x16);
/// `RMI_REC_AUX_COUNT`
pub const REC_AUX_COUNT: u32 = rmi_fid(0x17);
/// `RMI_RTT_INIT_RIPAS`
pub const RTT_INIT_RIPAS: u32 = rmi_fid(0x18);
/// `RMI_RTT_SET_RIPAS`
pub const RTT_SET_RIPAS: u32 = rmi_fid(0x19);
