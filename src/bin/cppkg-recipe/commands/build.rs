//! `cppkg-recipe build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use cppkg_recipe::lifecycle::LifecycleDriver;
use cppkg_recipe::util::context::RunContext;
use cppkg_recipe::util::process::{require_tools, SystemRunner};

pub fn execute(ctx: RunContext, args: BuildArgs) -> Result<()> {
    require_tools(&["cmake"])?;

    let (settings, overrides) = args.settings.resolve()?;

    let runner = SystemRunner;
    let mut recipe = super::load_recipe(&ctx, &runner)?;
    for (key, value) in overrides {
        recipe.options_mut().set(&key, value)?;
    }

    let mut driver = LifecycleDriver::new(recipe, settings, ctx, &runner)?;
    driver.build()?;

    eprintln!("       Built {}", driver.recipe().identity());
    Ok(())
}
