//! `cppkg-recipe package-info` command

use anyhow::{Context, Result};

use crate::cli::PackageInfoArgs;
use cppkg_recipe::lifecycle::LifecycleDriver;
use cppkg_recipe::recipe::Settings;
use cppkg_recipe::util::context::RunContext;
use cppkg_recipe::util::fs::write_string;
use cppkg_recipe::util::process::SystemRunner;

pub fn execute(ctx: RunContext, args: PackageInfoArgs) -> Result<()> {
    let runner = SystemRunner;
    let recipe = super::load_recipe(&ctx, &runner)?;

    let mut driver = LifecycleDriver::new(recipe, Settings::host_defaults(), ctx, &runner)?;
    let manifest = driver.package_info();

    let json = serde_json::to_string_pretty(&manifest).context("failed to encode manifest")?;
    match &args.output {
        Some(path) => {
            write_string(path, &json)?;
            eprintln!("       Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
