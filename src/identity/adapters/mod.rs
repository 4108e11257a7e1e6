//! Adapter implementations of identity ports.

pub mod memory;
pub mod postgres;
