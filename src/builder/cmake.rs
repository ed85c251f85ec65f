//! CMake driver for the package's configure, build, and install steps.
//!
//! Both the build and package stages construct the driver the same way, so
//! the configure invocation they issue is identical argument for argument.

use std::path::PathBuf;

use crate::builder::definitions::DefinitionSet;
use crate::recipe::settings::Settings;
use crate::util::context::RunContext;
use crate::util::process::{CommandError, ProcessBuilder, ProcessRunner};

/// Drives `cmake` against one source checkout and build tree.
pub struct CMakeDriver<'a> {
    runner: &'a dyn ProcessRunner,
    source_dir: PathBuf,
    build_dir: PathBuf,
    build_type: String,
    install_prefix: Option<PathBuf>,
    definitions: DefinitionSet,
}

impl<'a> CMakeDriver<'a> {
    /// Create a driver wired to a run's directory layout.
    pub fn for_run(runner: &'a dyn ProcessRunner, ctx: &RunContext, settings: &Settings) -> Self {
        CMakeDriver {
            runner,
            source_dir: ctx.source_dir(),
            build_dir: ctx.build_dir(),
            build_type: settings.build_type.clone(),
            install_prefix: Some(ctx.package_dir()),
            definitions: DefinitionSet::new(),
        }
    }

    /// Set the cache definitions passed at configure time.
    pub fn definitions(mut self, definitions: DefinitionSet) -> Self {
        self.definitions = definitions;
        self
    }

    /// Generate the build system.
    pub fn configure(&self) -> Result<(), CommandError> {
        tracing::info!("Configuring CMake project");

        let mut cmd = ProcessBuilder::new("cmake")
            .arg("-S")
            .arg(&self.source_dir)
            .arg("-B")
            .arg(&self.build_dir)
            .arg(format!("-DCMAKE_BUILD_TYPE={}", self.build_type));

        if let Some(prefix) = &self.install_prefix {
            cmd = cmd.arg(format!("-DCMAKE_INSTALL_PREFIX={}", prefix.display()));
        }

        cmd = cmd.args(self.definitions.to_args());

        tracing::debug!("Running {}", cmd.display_command());
        self.runner.run_checked(&cmd)?;
        Ok(())
    }

    /// Compile the configured build tree.
    pub fn build(&self) -> Result<(), CommandError> {
        tracing::info!("Building CMake project");

        let cmd = ProcessBuilder::new("cmake")
            .arg("--build")
            .arg(&self.build_dir)
            .arg("--parallel")
            .arg("--config")
            .arg(&self.build_type);

        tracing::debug!("Running {}", cmd.display_command());
        self.runner.run_checked(&cmd)?;
        Ok(())
    }

    /// Install the built tree into the install prefix.
    pub fn install(&self) -> Result<(), CommandError> {
        tracing::info!("Installing CMake project");

        let cmd = ProcessBuilder::new("cmake")
            .arg("--install")
            .arg(&self.build_dir)
            .arg("--config")
            .arg(&self.build_type);

        tracing::debug!("Running {}", cmd.display_command());
        self.runner.run_checked(&cmd)?;
        Ok(())
    }
}
