//! Step definitions for chat bot scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
