//! Lifecycle error taxonomy.
//!
//! Every stage failure is fatal; nothing here is retried. Each stage gets
//! its own error type naming what was being attempted, and
//! [`LifecycleError`] collects them for callers that drive whole runs.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::lifecycle::state::{Stage, StateError};
use crate::recipe::options::UnsupportedToolchainError;
use crate::util::process::CommandError;

/// A lifecycle hook ran against the wrong recorded stage.
#[derive(Debug, Error, Diagnostic)]
#[error("`{hook}` invoked out of order: package is {current}, expected {required}")]
#[diagnostic(
    code(cppkg_recipe::lifecycle::out_of_order),
    help("run the hooks in order: source, build, package, package-info")
)]
pub struct StageOrderError {
    pub hook: &'static str,
    pub current: Stage,
    pub required: Stage,
}

/// The source stage could not produce a checkout.
#[derive(Debug, Error)]
pub enum SourceFetchError {
    #[error("failed to create source directory `{}`", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to clone `{url}`")]
    Clone {
        url: String,
        #[source]
        source: CommandError,
    },

    #[error("failed to check out {reference}")]
    Checkout {
        reference: String,
        #[source]
        source: CommandError,
    },
}

/// The build stage failed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to create build directory `{}`", .path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configure step failed")]
    Configure(#[source] CommandError),

    #[error("compile step failed")]
    Compile(#[source] CommandError),
}

/// The package stage failed.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to collect license files into `{}`", .dest.display())]
    Licenses {
        dest: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("configure step failed")]
    Configure(#[source] CommandError),

    #[error("install step failed")]
    Install(#[source] CommandError),

    #[error("configure definitions changed since the build stage ({built} -> {current})")]
    DefinitionsChanged { built: String, current: String },
}

/// Any failure a lifecycle run can surface.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    Toolchain(#[from] UnsupportedToolchainError),

    #[error(transparent)]
    OutOfOrder(#[from] StageOrderError),

    #[error("source stage failed")]
    Source(#[from] SourceFetchError),

    #[error("build stage failed")]
    Build(#[from] BuildError),

    #[error("package stage failed")]
    Package(#[from] PackageError),

    #[error(transparent)]
    State(#[from] StateError),
}
