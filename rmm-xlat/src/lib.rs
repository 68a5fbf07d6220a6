#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

mod attr;
mod error;
mod region;
mod table;

pub use self::{
	attr::{Attributes, MapFlags, MemType},
	error::{XlatError, errno},
	region::{MmapRegion, is_sorted_by_va},
	table::{StaticTables, XlatTable},
};

/// The translation granule size. Only 4KiB granules are supported.
pub const PAGE_SIZE: usize = 4096;

/// The number of descriptors in a single translation table.
pub const XLAT_TABLE_ENTRIES: usize = PAGE_SIZE / size_of::<u64>();

/// The required alignment of every translation table.
pub const XLAT_TABLES_ALIGNMENT: usize = PAGE_SIZE;

/// Selects which half of the virtual address space a translation
/// context describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaRegion {
	/// The low half, translated through `TTBR0_EL2`. Holds the runtime image
	/// and platform mappings.
	Low,
	/// The high half, translated through `TTBR1_EL2`. Holds the per-core
	/// slot buffer mappings.
	High,
}

/// A stage 1 translation table library.
///
/// Builds a configuration from a memory map, binds it to table storage to
/// form a context, and programs the executing core's MMU registers from
/// a context.
pub trait XlatLib: Sync {
	/// A validated translation configuration.
	type Cfg: Send + Sync;
	/// A translation context: a configuration bound to its tables.
	type Ctx: Send + Sync;

	/// Validates `mmap` and builds a configuration for the given half of
	/// an address space of `va_size` bytes.
	///
	/// `mmap` must remain valid for the lifetime of the runtime; the
	/// configuration keeps referring to it.
	fn cfg_init(
		&self,
		region: VaRegion,
		mmap: &'static [MmapRegion],
		va_size: usize,
	) -> Result<Self::Cfg, XlatError>;

	/// Binds `cfg` to `tables`, populating the tables.
	fn ctx_init(
		&self,
		cfg: Self::Cfg,
		tables: &'static mut [XlatTable],
	) -> Result<Self::Ctx, XlatError>;

	/// Programs the executing core's MMU configuration registers from `ctx`.
	///
	/// Only affects the calling core.
	fn setup_mmu_cfg(&self, ctx: &Self::Ctx) -> Result<(), XlatError>;
}
