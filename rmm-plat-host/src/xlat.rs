//! A host translation library.
//!
//! Validates memory maps the way the real library does and accounts for
//! the tables a mapping would need, but never builds descriptors. MMU
//! "programming" is recorded per core instead of touching registers.

use core::sync::atomic::{AtomicU32, Ordering};
use std::collections::BTreeMap;

use rmm_xlat::{MmapRegion, PAGE_SIZE, VaRegion, XLAT_TABLE_ENTRIES, XlatError, XlatLib, XlatTable};
use spin::Mutex;

use crate::cpu;

/// The smallest supported virtual address space, in bits.
const MIN_VA_BITS: u32 = 25;
/// The largest supported virtual address space, in bits.
const MAX_VA_BITS: u32 = 48;
/// log2 of [`PAGE_SIZE`].
const PAGE_SHIFT: u32 = PAGE_SIZE.trailing_zeros();
/// The number of address bits resolved by each table level.
const BITS_PER_LEVEL: u32 = XLAT_TABLE_ENTRIES.trailing_zeros();

/// A stage at which a failure can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectStage {
	/// [`XlatLib::cfg_init`]
	Cfg,
	/// [`XlatLib::ctx_init`]
	Ctx,
	/// [`XlatLib::setup_mmu_cfg`]
	Mmu,
}

/// A validated configuration.
#[derive(Debug)]
pub struct HostXlatCfg {
	/// The half of the address space described.
	region:  VaRegion,
	/// The memory map.
	mmap:    &'static [MmapRegion],
	/// The size of the address space.
	va_size: usize,
}

impl HostXlatCfg {
	/// The half of the address space described.
	#[must_use]
	pub const fn region(&self) -> VaRegion {
		self.region
	}

	/// The memory map.
	#[must_use]
	pub const fn mmap(&self) -> &'static [MmapRegion] {
		self.mmap
	}

	/// The size of the address space.
	#[must_use]
	pub const fn va_size(&self) -> usize {
		self.va_size
	}

	/// The width of the address space, in bits.
	#[must_use]
	pub const fn va_bits(&self) -> u32 {
		self.va_size.trailing_zeros()
	}
}

/// A configuration bound to its tables.
#[derive(Debug)]
pub struct HostXlatCtx {
	/// The configuration.
	cfg:    HostXlatCfg,
	/// The backing tables.
	tables: &'static mut [XlatTable],
	/// How many of the tables the mappings use.
	used:   usize,
}

impl HostXlatCtx {
	/// The configuration.
	#[must_use]
	pub const fn cfg(&self) -> &HostXlatCfg {
		&self.cfg
	}

	/// The number of tables the mappings use.
	#[must_use]
	pub const fn tables_used(&self) -> usize {
		self.used
	}

	/// The number of tables available.
	#[must_use]
	pub const fn table_capacity(&self) -> usize {
		self.tables.len()
	}

	/// The address of the base table.
	#[must_use]
	pub fn base_table_addr(&self) -> usize {
		self.tables.first().map_or(0, XlatTable::addr)
	}
}

/// The MMU configuration a core programmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmuState {
	/// The base table address (`TTBRx_EL2`).
	pub ttbr:    usize,
	/// The size offset (`TCR_EL2.T0SZ`).
	pub t0sz:    u32,
	/// The half of the address space translated.
	pub region:  VaRegion,
	/// Whether translation is enabled.
	pub enabled: bool,
}

/// The host translation library.
pub struct HostXlat {
	/// The number of cores, as negotiated with EL3.
	max_cpus: AtomicU32,
	/// The MMU configuration of each core that ran [`XlatLib::setup_mmu_cfg`].
	mmu:      Mutex<BTreeMap<u32, MmuState>>,
	/// Pending one-shot failures, indexed by [`InjectStage`].
	inject:   Mutex<[Option<XlatError>; 3]>,
}

impl HostXlat {
	/// Creates a library with no cores.
	#[must_use]
	pub const fn new() -> Self {
		Self {
			max_cpus: AtomicU32::new(0),
			mmu:      Mutex::new(BTreeMap::new()),
			inject:   Mutex::new([None; 3]),
		}
	}

	/// Sets the number of cores MMUs may be set up on.
	pub fn set_max_cpus(&self, max_cpus: u32) {
		self.max_cpus.store(max_cpus, Ordering::Release);
	}

	/// Makes the next call of `stage` fail with `err`.
	pub fn inject(&self, stage: InjectStage, err: XlatError) {
		self.inject.lock()[stage as usize] = Some(err);
	}

	/// Returns the MMU configuration core `cpu` last programmed.
	#[must_use]
	pub fn mmu_state(&self, cpu: u32) -> Option<MmuState> {
		self.mmu.lock().get(&cpu).copied()
	}

	/// The number of cores that programmed their MMU.
	#[must_use]
	pub fn mmu_count(&self) -> usize {
		self.mmu.lock().len()
	}

	/// Consumes an injected failure for `stage`, if any.
	fn injected(&self, stage: InjectStage) -> Result<(), XlatError> {
		self.inject.lock()[stage as usize].take().map_or(Ok(()), Err)
	}
}

impl Default for HostXlat {
	fn default() -> Self {
		Self::new()
	}
}

/// Returns the inclusive bounds of `region` in an address space of
/// `va_size` bytes.
fn va_window(region: VaRegion, va_size: usize) -> (usize, usize) {
	match region {
		VaRegion::Low => (0, va_size - 1),
		VaRegion::High => (usize::MAX - (va_size - 1), usize::MAX),
	}
}

/// Validates a memory map for `region` of an address space of `va_size`
/// bytes.
fn validate(region: VaRegion, mmap: &[MmapRegion], va_size: usize) -> Result<(), XlatError> {
	let min = 1_usize << MIN_VA_BITS;
	let max = 1_usize << MAX_VA_BITS;
	if !va_size.is_power_of_two() || va_size < min || va_size > max {
		return Err(XlatError::InvalidArgument);
	}

	if mmap.is_empty() {
		return Err(XlatError::InvalidArgument);
	}

	let (lo, hi) = va_window(region, va_size);

	for r in mmap {
		if r.size == 0 {
			return Err(XlatError::InvalidArgument);
		}

		if r.base_va % PAGE_SIZE != 0
			|| r.base_pa % PAGE_SIZE as u64 != 0
			|| r.size % PAGE_SIZE != 0
		{
			return Err(XlatError::Fault);
		}

		let last = r.last_va().ok_or(XlatError::OutOfRange)?;
		if r.base_va < lo || last > hi {
			return Err(XlatError::OutOfRange);
		}
	}

	for pair in mmap.windows(2) {
		let prev_last = pair[0].last_va().ok_or(XlatError::OutOfRange)?;
		if pair[1].base_va <= prev_last {
			return Err(XlatError::Permission);
		}
	}

	Ok(())
}

/// Estimates how many tables mapping `mmap` at page granularity takes in
/// an address space of `va_size` bytes. `mmap` must be sorted and
/// validated.
#[must_use]
pub fn estimate_tables(mmap: &[MmapRegion], va_size: usize) -> usize {
	let va_bits = va_size.trailing_zeros();
	let levels = va_bits.saturating_sub(PAGE_SHIFT).div_ceil(BITS_PER_LEVEL);

	// The base table.
	let mut total = 1;

	for depth in 1..levels {
		let span_shift = PAGE_SHIFT + BITS_PER_LEVEL * (levels - depth);
		let mut covered: Option<usize> = None;

		for r in mmap {
			let Some(last) = r.last_va() else {
				continue;
			};

			let first = r.base_va >> span_shift;
			let last = last >> span_shift;
			let start = match covered {
				Some(c) if c >= first => c + 1,
				_ => first,
			};

			if last >= start {
				total += last - start + 1;
			}

			covered = Some(covered.map_or(last, |c| c.max(last)));
		}
	}

	total
}

impl XlatLib for HostXlat {
	type Cfg = HostXlatCfg;
	type Ctx = HostXlatCtx;

	fn cfg_init(
		&self,
		region: VaRegion,
		mmap: &'static [MmapRegion],
		va_size: usize,
	) -> Result<HostXlatCfg, XlatError> {
		self.injected(InjectStage::Cfg)?;
		validate(region, mmap, va_size)?;

		Ok(HostXlatCfg {
			region,
			mmap,
			va_size,
		})
	}

	fn ctx_init(
		&self,
		cfg: HostXlatCfg,
		tables: &'static mut [XlatTable],
	) -> Result<HostXlatCtx, XlatError> {
		self.injected(InjectStage::Ctx)?;

		if tables.is_empty() {
			return Err(XlatError::InvalidArgument);
		}

		let used = estimate_tables(cfg.mmap, cfg.va_size);
		if used > tables.len() {
			return Err(XlatError::OutOfMemory);
		}

		for table in &mut tables[..used] {
			*table = XlatTable::zeroed();
		}

		Ok(HostXlatCtx { cfg, tables, used })
	}

	fn setup_mmu_cfg(&self, ctx: &HostXlatCtx) -> Result<(), XlatError> {
		let cpu = cpu::current();
		self.injected(InjectStage::Mmu)?;

		if cpu >= self.max_cpus.load(Ordering::Acquire) {
			return Err(XlatError::InvalidArgument);
		}

		let state = MmuState {
			ttbr:    ctx.base_table_addr(),
			t0sz:    64 - ctx.cfg.va_bits(),
			region:  ctx.cfg.region,
			enabled: true,
		};
		self.mmu.lock().insert(cpu, state);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use rmm_xlat::{Attributes, MemType, StaticTables};

	use super::*;

	const VA_SIZE: usize = 1 << 38;
	const RW: Attributes = Attributes::realm(MemType::RwData);

	fn leak(regions: Vec<MmapRegion>) -> &'static [MmapRegion] {
		Vec::leak(regions)
	}

	fn tables<const N: usize>() -> &'static mut [XlatTable] {
		let storage: &'static StaticTables<N> = Box::leak(Box::new(StaticTables::new()));
		storage.take().unwrap()
	}

	fn image() -> Vec<MmapRegion> {
		vec![
			MmapRegion::flat(0x8000_0000, 0x1_0000, Attributes::realm(MemType::Code)),
			MmapRegion::flat(0x8001_0000, 0x8000, Attributes::realm(MemType::RoData)),
			MmapRegion::flat(0x8001_8000, 0x8000, RW),
		]
	}

	#[test]
	fn test_cfg_accepts_image() {
		let xlat = HostXlat::new();
		let cfg = xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).unwrap();
		assert_eq!(cfg.va_bits(), 38);
		assert_eq!(cfg.mmap().len(), 3);
	}

	#[test]
	fn test_cfg_rejects_bad_va_size() {
		let xlat = HostXlat::new();
		for va_size in [0, 3 << 30, 1 << 24, 1 << 49] {
			assert_eq!(
				xlat.cfg_init(VaRegion::Low, leak(image()), va_size)
					.unwrap_err(),
				XlatError::InvalidArgument
			);
		}
	}

	#[test]
	fn test_cfg_rejects_empty_map_and_region() {
		let xlat = HostXlat::new();
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, &[], VA_SIZE).unwrap_err(),
			XlatError::InvalidArgument
		);

		let mut map = image();
		map[1].size = 0;
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::InvalidArgument
		);
	}

	#[test]
	fn test_cfg_rejects_misalignment() {
		let xlat = HostXlat::new();

		let mut map = image();
		map[0].base_pa += 0x10;
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::Fault
		);

		let mut map = image();
		map[2].size = 0x800;
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::Fault
		);
	}

	#[test]
	fn test_cfg_rejects_out_of_range() {
		let xlat = HostXlat::new();
		let map = vec![MmapRegion::flat(VA_SIZE - 0x1000, 0x2000, RW)];
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::OutOfRange
		);

		let map = vec![MmapRegion::flat(0x1000, 0x1000, RW)];
		assert_eq!(
			xlat.cfg_init(VaRegion::High, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::OutOfRange
		);

		let map = vec![MmapRegion::new(0x1000, usize::MAX - 0xFFF, 0x1000, RW)];
		assert!(xlat.cfg_init(VaRegion::High, leak(map), VA_SIZE).is_ok());
	}

	#[test]
	fn test_cfg_rejects_overlap_and_disorder() {
		let xlat = HostXlat::new();

		let mut map = image();
		map[1].base_va -= 0x1000;
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::Permission
		);

		let mut map = image();
		map.swap(0, 2);
		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(map), VA_SIZE)
				.unwrap_err(),
			XlatError::Permission
		);
	}

	#[test]
	fn test_estimate_tables() {
		// 38 bits: a base table and two levels below it.
		assert_eq!(estimate_tables(&image(), VA_SIZE), 3);

		// A device far below the image needs its own subtree.
		let mut map = vec![MmapRegion::flat(0x1c09_0000, 0x1000, RW)];
		map.extend(image());
		assert_eq!(estimate_tables(&map, VA_SIZE), 5);

		// Regions within the same 2MiB block share every table.
		let map = vec![
			MmapRegion::flat(0x1000, 0x1000, RW),
			MmapRegion::flat(0x3000, 0x1000, RW),
		];
		assert_eq!(estimate_tables(&map, VA_SIZE), 3);

		// A region straddling a 1GiB boundary needs two subtrees.
		let map = vec![MmapRegion::flat(0x3FFF_F000, 0x2000, RW)];
		assert_eq!(estimate_tables(&map, VA_SIZE), 5);
	}

	#[test]
	fn test_ctx_checks_storage() {
		let xlat = HostXlat::new();

		let cfg = xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).unwrap();
		assert_eq!(
			xlat.ctx_init(cfg, tables::<0>()).unwrap_err(),
			XlatError::InvalidArgument
		);

		let cfg = xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).unwrap();
		assert_eq!(
			xlat.ctx_init(cfg, tables::<2>()).unwrap_err(),
			XlatError::OutOfMemory
		);

		let cfg = xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).unwrap();
		let ctx = xlat.ctx_init(cfg, tables::<4>()).unwrap();
		assert_eq!(ctx.tables_used(), 3);
		assert_eq!(ctx.table_capacity(), 4);
	}

	#[test]
	fn test_mmu_state_per_core() {
		let xlat = HostXlat::new();
		xlat.set_max_cpus(2);

		let cfg = xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).unwrap();
		let ctx = xlat.ctx_init(cfg, tables::<4>()).unwrap();

		cpu::run_on(1, || xlat.setup_mmu_cfg(&ctx)).unwrap();
		assert_eq!(
			xlat.mmu_state(1),
			Some(MmuState {
				ttbr:    ctx.base_table_addr(),
				t0sz:    64 - 38,
				region:  VaRegion::Low,
				enabled: true,
			})
		);
		assert_eq!(xlat.mmu_state(0), None);

		assert_eq!(
			cpu::run_on(2, || xlat.setup_mmu_cfg(&ctx)),
			Err(XlatError::InvalidArgument)
		);
		assert_eq!(xlat.mmu_count(), 1);
	}

	#[test]
	fn test_injection_is_one_shot() {
		let xlat = HostXlat::new();
		xlat.inject(InjectStage::Cfg, XlatError::Other(-5));

		assert_eq!(
			xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE)
				.unwrap_err(),
			XlatError::Other(-5)
		);
		assert!(xlat.cfg_init(VaRegion::Low, leak(image()), VA_SIZE).is_ok());
	}
}
