//! `cppkg-recipe create` command

use anyhow::{Context, Result};

use crate::cli::CreateArgs;
use cppkg_recipe::lifecycle::LifecycleDriver;
use cppkg_recipe::util::context::RunContext;
use cppkg_recipe::util::process::{require_tools, SystemRunner};

pub fn execute(ctx: RunContext, args: CreateArgs) -> Result<()> {
    require_tools(&["git", "cmake"])?;

    let (settings, overrides) = args.settings.resolve()?;

    // A create run always starts from scratch.
    ctx.reset()?;

    let runner = SystemRunner;
    let mut recipe = super::load_recipe(&ctx, &runner)?;
    for (key, value) in overrides {
        recipe.options_mut().set(&key, value)?;
    }

    let mut driver = LifecycleDriver::new(recipe, settings, ctx, &runner)?;
    driver.source()?;
    driver.build()?;
    driver.package()?;
    let manifest = driver.package_info();

    let json = serde_json::to_string_pretty(&manifest).context("failed to encode manifest")?;
    println!("{}", json);

    eprintln!("     Created {}", driver.recipe().identity());
    Ok(())
}
