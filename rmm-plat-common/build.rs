#![expect(missing_docs, reason = "build scripts don't need docs")]
#![expect(
	clippy::unwrap_used,
	clippy::panic,
	reason = "build scripts are allowed to panic on malformed configuration, as this is a \
	          build-time error that should be caught during development"
)]

use std::{env, fs, path::Path};

/// Reads a numeric configuration variable, falling back to `default`.
fn read_var(name: &str, default: usize, range: core::ops::RangeInclusive<usize>) -> usize {
	println!("cargo::rerun-if-env-changed={name}");

	let value = match env::var(name) {
		Ok(raw) => {
			raw.trim()
				.parse::<usize>()
				.unwrap_or_else(|err| panic!("{name}={raw:?} is not a number: {err}"))
		}
		Err(env::VarError::NotPresent) => default,
		Err(err) => panic!("{name} is not valid unicode: {err}"),
	};

	if !range.contains(&value) {
		panic!(
			"{name}={value} is out of range ({}..={})",
			range.start(),
			range.end()
		);
	}

	value
}

fn main() {
	let extra_regions = read_var("RMM_PLAT_EXTRA_MMAP_REGIONS", 5, 0..=64);
	let max_tables = read_var("RMM_PLAT_MAX_XLAT_TABLES", 10, 1..=512);
	let va_width = read_var("RMM_VIRT_ADDR_SPACE_WIDTH", 38, 25..=48);

	let generated = format!(
		"/// The number of platform-supplied memory map regions reserved in the\n\
		 /// runtime memory map (`RMM_PLAT_EXTRA_MMAP_REGIONS`).\n\
		 pub const PLAT_CMN_EXTRA_MMAP_REGIONS: usize = {extra_regions};\n\
		 /// The number of translation tables statically reserved for the\n\
		 /// runtime translation context (`RMM_PLAT_MAX_XLAT_TABLES`).\n\
		 pub const PLAT_CMN_CTX_MAX_XLAT_TABLES: usize = {max_tables};\n\
		 /// The width, in bits, of the runtime's low virtual address space\n\
		 /// (`RMM_VIRT_ADDR_SPACE_WIDTH`).\n\
		 pub const VIRT_ADDR_SPACE_WIDTH: u32 = {va_width};\n"
	);

	let out_dir = env::var("OUT_DIR").unwrap();
	fs::write(Path::new(&out_dir).join("config.rs"), generated).unwrap();
}
