//! Command implementations for each file format

pub mod bnd;
pub mod dcx;
pub mod flver;
pub mod sniff;
pub mod tpf;
