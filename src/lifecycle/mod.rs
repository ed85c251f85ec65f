//! The package lifecycle state machine.
//!
//! A package moves through five stages in a fixed order: uninitialized,
//! sourced, built, packaged, published. Each hook requires the stage
//! before it and records the stage after it; hooks invoked out of order
//! fail before any subprocess is spawned. Stage progress is persisted so
//! hooks can run as separate process invocations.

mod build;
pub mod errors;
mod package;
mod source;
pub mod state;

pub use errors::{BuildError, LifecycleError, PackageError, SourceFetchError, StageOrderError};
pub use state::{Stage, StageState};

use crate::builder::definitions::{translate, DefinitionSet};
use crate::recipe::options::UnsupportedToolchainError;
use crate::recipe::{ArtifactManifest, Recipe, Settings};
use crate::util::context::RunContext;
use crate::util::process::ProcessRunner;

/// Drives one package through its lifecycle.
pub struct LifecycleDriver<'a> {
    recipe: Recipe,
    settings: Settings,
    ctx: RunContext,
    runner: &'a dyn ProcessRunner,
    state: StageState,
}

impl<'a> LifecycleDriver<'a> {
    /// Create a driver, resuming any recorded stage for this work
    /// directory. A version change discards the recorded lifecycle and
    /// starts over.
    pub fn new(
        recipe: Recipe,
        settings: Settings,
        ctx: RunContext,
        runner: &'a dyn ProcessRunner,
    ) -> Result<Self, LifecycleError> {
        let version = recipe.identity().version().to_string();
        let state = match StageState::load(&ctx.state_path())? {
            Some(state) if state.version == version => {
                tracing::debug!("Resuming lifecycle at stage {}", state.stage);
                state
            }
            Some(state) => {
                tracing::warn!(
                    "Package version changed ({} -> {}), restarting lifecycle",
                    state.version,
                    version
                );
                StageState::new(version)
            }
            None => StageState::new(version),
        };

        for requirement in recipe.requires() {
            tracing::debug!("Requires {}", requirement);
        }

        Ok(LifecycleDriver {
            recipe,
            settings,
            ctx,
            runner,
            state,
        })
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// The last stage this package completed.
    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    fn require(&self, hook: &'static str, required: Stage) -> Result<(), StageOrderError> {
        if self.state.stage != required {
            return Err(StageOrderError {
                hook,
                current: self.state.stage,
                required,
            });
        }
        Ok(())
    }

    fn advance(&mut self, stage: Stage) -> Result<(), LifecycleError> {
        self.state.stage = stage;
        self.state.save(&self.ctx.state_path())?;
        tracing::debug!("Recorded stage {}", stage);
        Ok(())
    }

    /// Effective configure definitions for the current settings.
    fn derive_definitions(&self) -> Result<DefinitionSet, UnsupportedToolchainError> {
        let effective = self.recipe.options().apply_platform_rules(&self.settings)?;
        Ok(translate(&effective))
    }

    /// Fetch the sources. Requires an uninitialized package.
    pub fn source(&mut self) -> Result<(), LifecycleError> {
        self.require("source", Stage::Uninitialized)?;
        source::fetch(self.runner, self.recipe.source(), &self.ctx.source_dir())?;
        self.advance(Stage::Sourced)
    }

    /// Configure and compile. Requires fetched sources.
    pub fn build(&mut self) -> Result<(), LifecycleError> {
        self.require("build", Stage::Sourced)?;
        let definitions = self.derive_definitions()?;
        build::run(self.runner, &self.ctx, &self.settings, definitions.clone())?;
        self.state.definitions = Some(definitions.fingerprint());
        self.advance(Stage::Built)
    }

    /// Collect licenses and install. Requires a completed build.
    ///
    /// The configure definitions are re-derived here and must match the
    /// ones the build stage used; drift means the install would not
    /// describe what was compiled.
    pub fn package(&mut self) -> Result<(), LifecycleError> {
        self.require("package", Stage::Built)?;
        let definitions = self.derive_definitions()?;
        if let Some(built) = &self.state.definitions {
            let current = definitions.fingerprint();
            if *built != current {
                return Err(PackageError::DefinitionsChanged {
                    built: built.clone(),
                    current,
                }
                .into());
            }
        }
        package::run(self.runner, &self.ctx, &self.settings, definitions)?;
        self.advance(Stage::Packaged)
    }

    /// Publish the artifact manifest.
    ///
    /// The manifest is derived entirely from the recipe, so this never
    /// fails and may be called at any stage. Calling it on a packaged
    /// package marks the lifecycle published.
    pub fn package_info(&mut self) -> ArtifactManifest {
        let manifest = self.recipe.manifest();
        if self.state.stage == Stage::Packaged {
            self.state.stage = Stage::Published;
            if let Err(e) = self.state.save(&self.ctx.state_path()) {
                tracing::warn!("Failed to record published stage: {}", e);
            }
        }
        manifest
    }
}
