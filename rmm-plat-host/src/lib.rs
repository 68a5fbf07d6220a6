#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(doc, feature(doc_cfg))]

pub mod cpu;
pub mod sink;

mod el3_ifc;
mod gic;
mod platform;
mod slot_buf;
mod xlat;

use rmm_plat_common::{BootManager, config::TableStorage};

pub use self::{
	el3_ifc::{
		El3Ifc, El3IfcError, RMM_EL3_IFC_VERSION, RMM_EL3_IFC_VERSION_MAJOR,
		RMM_EL3_IFC_VERSION_MINOR, SHARED_BUF_SIZE,
	},
	gic::{GicFeatures, HOST_ICH_VTR_EL2, HostGic},
	platform::{HOST_LAYOUT, HOST_PLAT_REGIONS, HostPlatform},
	slot_buf::HostSlotBuf,
	xlat::{HostXlat, HostXlatCfg, HostXlatCtx, InjectStage, MmuState, estimate_tables},
};

/// The translation table storage of the process-wide manager.
static TABLES: TableStorage = TableStorage::new();

/// The process-wide boot manager.
static MANAGER: BootManager<HostPlatform> = BootManager::new(HostPlatform::new(HOST_LAYOUT), &TABLES);

/// Returns the process-wide boot manager.
#[must_use]
pub fn manager() -> &'static BootManager<HostPlatform> {
	&MANAGER
}
