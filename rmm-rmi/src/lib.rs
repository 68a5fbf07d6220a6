#![cfg_attr(
	not(doc),
	expect(missing_docs, reason = "docs are enabled only under `doc` cfg")
)]
#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(test), no_std)]
#![cfg_attr(doc, feature(doc_cfg))]

pub mod fid;

mod command;
mod handler;

pub use self::{
	command::{DecodeError, RmiCommand, SMC_ARGS},
	handler::{
		SmcHandler, SmcResult, granule_delegate, granule_undelegate, invoke, realm_activate,
		realm_create, realm_destroy, rec_aux_count, rec_create, rec_destroy, rec_enter,
		rtt_create, rtt_destroy,
	},
};
