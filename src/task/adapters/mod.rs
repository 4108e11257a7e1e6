//! Adapter implementations of task ports.

pub mod memory;
pub mod postgres;
