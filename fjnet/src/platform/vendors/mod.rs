//! Vendor platform implementations.

pub mod common;
pub mod fujitsu_ipcom;
pub mod fujitsu_sir;
pub mod fujitsu_srs;
