//! Local content generators
//!
//! Every generator draws from the caller's RNG so outcomes are reproducible
//! under a seeded source.

pub mod flavor;
pub mod missions;
pub mod network;

pub use missions::generate_mission;
pub use network::{scan_target, ScanOptions, ScanReport};
