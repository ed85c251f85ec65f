//! CMake build integration.
//!
//! This module translates recipe options into cache definitions and drives
//! the configure, build, and install steps.

pub mod cmake;
pub mod definitions;

pub use cmake::CMakeDriver;
pub use definitions::{translate, DefinitionSet};
