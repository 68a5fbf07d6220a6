//! Boots the realm monitor's memory map on the host.
//!
//! Performs the EL3 handshake, cold boots on core 0, then warm boots every
//! core on its own thread and prints the resulting memory map.

use std::thread;

use clap::Parser;
use rmm_plat_common::{BootError, Platform};
use rmm_plat_host::{HOST_PLAT_REGIONS, RMM_EL3_IFC_VERSION, cpu, manager, sink};
use rmm_xlat::MmapRegion;

/// rmm-host: realm monitor boot on the host
#[derive(Parser, Debug)]
struct Args {
	/// The number of cores to boot.
	#[clap(long, short = 'c', default_value_t = 4)]
	cpus:       u32,
	/// The physical address of the buffer shared with EL3.
	#[clap(long, default_value = "0x88000000", value_parser = parse_addr)]
	shared_buf: u64,
	/// Boot without the host's device mappings.
	#[clap(long)]
	no_devices: bool,
	/// Log verbosely. Specify multiple times for more verbosity.
	#[clap(long, short = 'v', action = clap::ArgAction::Count)]
	verbose:    u8,
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
fn parse_addr(s: &str) -> Result<u64, std::num::ParseIntError> {
	match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
		Some(hex) => u64::from_str_radix(hex, 16),
		None => s.parse(),
	}
}

/// Prints the runtime memory map and table usage.
fn print_mmap() {
	let mgr = manager();

	if let Some(regions) = mgr.regions() {
		println!("{:<18} {:<18} {:<10} attributes", "va", "pa", "size");
		for r in regions {
			println!(
				"{:#018x} {:#018x} {:#010x} {:?}{}",
				r.base_va,
				r.base_pa,
				r.size,
				r.attr.ty,
				if r.attr.is_realm() { "" } else { " (NS)" }
			);
		}
	}

	if let Some(ctx) = mgr.ctx() {
		println!(
			"{} of {} translation tables used",
			ctx.tables_used(),
			ctx.table_capacity()
		);
	}
}

fn pmain() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	let verbosity = match args.verbose {
		0 => log::LevelFilter::Info,
		1 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};

	log::set_max_level(verbosity);
	colog::default_builder().filter_level(verbosity).init();
	sink::install();

	let mgr = manager();
	mgr.platform()
		.handshake(0, RMM_EL3_IFC_VERSION, u64::from(args.cpus), args.shared_buf)?;

	let el3 = mgr.platform().el3();
	log::info!(
		"EL3 interface v{}.{}, {} cores, shared buffer at {:#x}",
		el3.version() >> 16,
		el3.version() & 0xFFFF,
		el3.max_cpus(),
		args.shared_buf
	);

	let regions: &[MmapRegion] = if args.no_devices {
		&[]
	} else {
		&HOST_PLAT_REGIONS
	};
	cpu::run_on(0, || mgr.cold_boot(Some(regions), regions.len()))?;

	let results: Vec<(u32, Result<(), BootError>)> = thread::scope(|s| {
		let handles: Vec<_> = (0..args.cpus)
			.map(|id| (id, s.spawn(move || cpu::run_on(id, || mgr.warm_boot()))))
			.collect();

		handles
			.into_iter()
			.map(|(id, handle)| (id, handle.join().unwrap_or(Err(BootError::NotInitialized))))
			.collect()
	});

	let mut failed = 0_usize;
	for (id, result) in results {
		if let Err(err) = result {
			log::error!("CPU[{id}] failed to boot: {err}");
			failed += 1;
		}
	}

	print_mmap();

	if failed > 0 {
		return Err(format!("{failed} of {} cores failed to boot", args.cpus).into());
	}

	Ok(())
}

fn main() {
	if let Err(e) = pmain() {
		log::error!("fatal: {e}");
		std::process::exit(1);
	}
}
