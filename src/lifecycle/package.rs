//! Package stage: collect license files and install the built tree.

use crate::builder::cmake::CMakeDriver;
use crate::builder::definitions::DefinitionSet;
use crate::lifecycle::errors::PackageError;
use crate::recipe::Settings;
use crate::util::context::RunContext;
use crate::util::fs::copy_flatten;
use crate::util::process::ProcessRunner;

/// Glob matched against license files anywhere in the checkout.
const LICENSE_PATTERN: &str = "LICENSE.*";

pub(crate) fn run(
    runner: &dyn ProcessRunner,
    ctx: &RunContext,
    settings: &Settings,
    definitions: DefinitionSet,
) -> Result<(), PackageError> {
    let licenses_dir = ctx.licenses_dir();
    let copied = copy_flatten(&ctx.source_dir(), LICENSE_PATTERN, &licenses_dir).map_err(|e| {
        PackageError::Licenses {
            dest: licenses_dir.clone(),
            source: e,
        }
    })?;
    if copied.is_empty() {
        tracing::warn!("No license files matched `{}`", LICENSE_PATTERN);
    } else {
        tracing::info!("Collected {} license file(s)", copied.len());
    }

    let driver = CMakeDriver::for_run(runner, ctx, settings).definitions(definitions);
    driver.configure().map_err(PackageError::Configure)?;
    driver.install().map_err(PackageError::Install)?;

    tracing::info!("Packaged into {}", ctx.package_dir().display());
    Ok(())
}
