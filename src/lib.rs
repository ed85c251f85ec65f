//! cppkg-recipe - build and packaging driver for the cppkg C++ libraries
//!
//! This crate provides the core library functionality for the recipe:
//! version resolution, the option model, configure translation, and the
//! package lifecycle state machine.

pub mod builder;
pub mod lifecycle;
pub mod recipe;
pub mod util;

/// Test utilities for cppkg-recipe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted process runner and settings
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use lifecycle::{LifecycleDriver, Stage};
pub use recipe::{ArtifactManifest, PackageIdentity, Recipe, Settings};
pub use util::context::RunContext;
pub use util::process::{ProcessRunner, SystemRunner};
