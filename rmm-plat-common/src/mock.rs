//! A recording platform for unit tests.

use std::{boxed::Box, cell::Cell, sync::Mutex, vec::Vec};

use rmm_xlat::{MmapRegion, VaRegion, XlatError, XlatLib, XlatTable};

use crate::{
	BootManager, El3Interface, GicVirt, ImageLayout, Platform, SlotBuffer, config::TableStorage,
};

pub(crate) const TEST_LAYOUT: ImageLayout = ImageLayout {
	code_start:    0x8000_0000,
	code_end:      0x8001_0000,
	ro_start:      0x8001_0000,
	ro_end:        0x8001_8000,
	rw_start:      0x8001_8000,
	rw_end:        0x8002_0000,
	shared_buf_va: 0x8002_0000,
};

/// A fixed EL3 shared buffer.
pub(crate) struct TestEl3 {
	pub pa:   u64,
	pub size: usize,
}

impl El3Interface for TestEl3 {
	fn shared_buf_pa(&self) -> u64 {
		self.pa
	}

	fn shared_buf_size(&self) -> usize {
		self.size
	}
}

std::thread_local! {
	static CPU: Cell<u32> = const { Cell::new(0) };
}

/// Runs `f` as if on core `cpu`.
pub(crate) fn on_cpu<R>(cpu: u32, f: impl FnOnce() -> R) -> R {
	let prev = CPU.replace(cpu);
	let r = f();
	CPU.set(prev);
	r
}

/// A platform interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
	SharedBufPa,
	SharedBufSize,
	CfgInit,
	CtxInit,
	GicVirtFeatures,
	SlotBufColdInit,
	SetupMmu(u32),
	SlotBufSetup(u32),
}

pub(crate) struct MockCfg {
	regions: &'static [MmapRegion],
	region:  VaRegion,
	va_size: usize,
}

pub(crate) struct MockCtx {
	pub regions: &'static [MmapRegion],
	pub region:  VaRegion,
	pub va_size: usize,
	pub tables:  usize,
}

/// Records every interaction and fails on demand.
#[derive(Default)]
pub(crate) struct MockPlatform {
	calls:         Mutex<Vec<Call>>,
	fail_cfg:      Option<XlatError>,
	fail_ctx:      Option<XlatError>,
	fail_mmu_on:   Option<u32>,
	fail_slot_buf: Option<XlatError>,
}

impl MockPlatform {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fail_cfg(mut self, err: XlatError) -> Self {
		self.fail_cfg = Some(err);
		self
	}

	pub fn fail_ctx(mut self, err: XlatError) -> Self {
		self.fail_ctx = Some(err);
		self
	}

	pub fn fail_mmu_on(mut self, cpu: u32) -> Self {
		self.fail_mmu_on = Some(cpu);
		self
	}

	pub fn fail_slot_buf(mut self, err: XlatError) -> Self {
		self.fail_slot_buf = Some(err);
		self
	}

	pub fn leak_manager(self) -> &'static BootManager<Self> {
		self.leak_manager_with(Box::leak(Box::new(TableStorage::new())))
	}

	pub fn leak_manager_with(self, tables: &'static TableStorage) -> &'static BootManager<Self> {
		Box::leak(Box::new(BootManager::new(self, tables)))
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().unwrap().clone()
	}

	fn record(&self, call: Call) {
		self.calls.lock().unwrap().push(call);
	}
}

impl El3Interface for MockPlatform {
	fn shared_buf_pa(&self) -> u64 {
		self.record(Call::SharedBufPa);
		0x8800_0000
	}

	fn shared_buf_size(&self) -> usize {
		self.record(Call::SharedBufSize);
		0x1000
	}
}

impl XlatLib for MockPlatform {
	type Cfg = MockCfg;
	type Ctx = MockCtx;

	fn cfg_init(
		&self,
		region: VaRegion,
		mmap: &'static [MmapRegion],
		va_size: usize,
	) -> Result<MockCfg, XlatError> {
		self.record(Call::CfgInit);
		match self.fail_cfg {
			Some(err) => Err(err),
			None => {
				Ok(MockCfg {
					regions: mmap,
					region,
					va_size,
				})
			}
		}
	}

	fn ctx_init(
		&self,
		cfg: MockCfg,
		tables: &'static mut [XlatTable],
	) -> Result<MockCtx, XlatError> {
		self.record(Call::CtxInit);
		match self.fail_ctx {
			Some(err) => Err(err),
			None => {
				Ok(MockCtx {
					regions: cfg.regions,
					region:  cfg.region,
					va_size: cfg.va_size,
					tables:  tables.len(),
				})
			}
		}
	}

	fn setup_mmu_cfg(&self, _ctx: &MockCtx) -> Result<(), XlatError> {
		let cpu = self.cpu_id();
		self.record(Call::SetupMmu(cpu));
		if self.fail_mmu_on == Some(cpu) {
			Err(XlatError::InvalidArgument)
		} else {
			Ok(())
		}
	}
}

impl GicVirt for MockPlatform {
	fn get_virt_features(&self) {
		self.record(Call::GicVirtFeatures);
	}
}

impl SlotBuffer for MockPlatform {
	fn coldboot_init(&self) -> Result<(), XlatError> {
		self.record(Call::SlotBufColdInit);
		self.fail_slot_buf.map_or(Ok(()), Err)
	}

	fn setup_xlat(&self) {
		self.record(Call::SlotBufSetup(self.cpu_id()));
	}
}

impl Platform for MockPlatform {
	type El3 = Self;
	type Gic = Self;
	type SlotBuf = Self;
	type Xlat = Self;

	fn layout(&self) -> ImageLayout {
		TEST_LAYOUT
	}

	fn xlat(&self) -> &Self {
		self
	}

	fn el3(&self) -> &Self {
		self
	}

	fn gic(&self) -> &Self {
		self
	}

	fn slot_buf(&self) -> &Self {
		self
	}

	fn cpu_id(&self) -> u32 {
		CPU.get()
	}
}
