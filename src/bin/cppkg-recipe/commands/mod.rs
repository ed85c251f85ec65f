//! Command implementations

pub mod build;
pub mod create;
pub mod info;
pub mod package;
pub mod source;

use anyhow::Result;

use cppkg_recipe::recipe::Recipe;
use cppkg_recipe::util::context::RunContext;
use cppkg_recipe::util::process::{require_tools, ProcessRunner};

/// Load the recipe, resolving the package version from the version script.
pub(crate) fn load_recipe(ctx: &RunContext, runner: &dyn ProcessRunner) -> Result<Recipe> {
    require_tools(&["bash"])?;
    let recipe = Recipe::load(ctx.recipe_dir(), runner)?;
    tracing::info!("Loaded recipe {}", recipe.identity());
    Ok(recipe)
}
