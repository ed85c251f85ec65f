//! `cppkg-recipe source` command

use anyhow::Result;

use crate::cli::SourceArgs;
use cppkg_recipe::lifecycle::LifecycleDriver;
use cppkg_recipe::recipe::Settings;
use cppkg_recipe::util::context::RunContext;
use cppkg_recipe::util::process::{require_tools, SystemRunner};

pub fn execute(ctx: RunContext, args: SourceArgs) -> Result<()> {
    require_tools(&["git"])?;

    if args.fresh {
        ctx.reset()?;
        tracing::info!("Cleared previous run state");
    }

    let runner = SystemRunner;
    let recipe = super::load_recipe(&ctx, &runner)?;

    let mut driver = LifecycleDriver::new(recipe, Settings::host_defaults(), ctx, &runner)?;
    driver.source()?;

    eprintln!("     Sourced {}", driver.recipe().identity());
    Ok(())
}
