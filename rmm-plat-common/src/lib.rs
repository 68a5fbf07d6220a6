#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

pub mod config;

mod cold;
mod error;
mod manager;
mod platform;
mod regions;
mod warm;

#[cfg(test)]
mod mock;

pub use self::{
	error::{BootError, ContextStage},
	manager::{BootManager, BootState, CtxOf},
	platform::{El3Interface, GicVirt, ImageLayout, Platform, SlotBuffer},
	regions::{RegionTable, build_region_table, common_regions},
};
