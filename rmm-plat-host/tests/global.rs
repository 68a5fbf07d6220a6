//! The process-wide boot manager.

use rmm_plat_common::{BootState, Platform};
use rmm_plat_host::{HOST_PLAT_REGIONS, RMM_EL3_IFC_VERSION, cpu, manager};

#[test]
fn test_global_manager_boots_once() {
	let mgr = manager();
	assert!(core::ptr::eq(mgr, manager()));
	assert_eq!(mgr.state(), BootState::Uninit);

	mgr.platform()
		.handshake(0, RMM_EL3_IFC_VERSION, 2, 0x8800_0000)
		.unwrap();
	cpu::run_on(0, || mgr.cold_boot(Some(&HOST_PLAT_REGIONS), HOST_PLAT_REGIONS.len()))
		.unwrap();

	for id in 0..2 {
		cpu::run_on(id, || mgr.warm_boot()).unwrap();
		assert!(mgr.platform().xlat().mmu_state(id).is_some());
	}

	assert!(mgr.cold_boot(None, 0).is_err());
	assert_eq!(mgr.state(), BootState::Ready);
}
