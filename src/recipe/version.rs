//! Package version resolution.
//!
//! The package version is owned by the sources, not the recipe: a shell
//! script next to the recipe prints it, and resolution runs that script
//! once at load time. The resolved string is carried by value afterwards
//! and never re-derived.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::util::process::{CommandError, ProcessBuilder, ProcessRunner};

/// Name of the version script expected next to the recipe.
pub const VERSION_SCRIPT: &str = "get_version.sh";

/// Run the version script and return its trimmed output.
pub fn resolve_version(
    recipe_dir: &Path,
    runner: &dyn ProcessRunner,
) -> Result<String, VersionResolutionError> {
    let script = recipe_dir.join(VERSION_SCRIPT);
    let cmd = ProcessBuilder::new("bash").arg(&script);

    let output = runner
        .run_checked(&cmd)
        .map_err(|source| VersionResolutionError::Script {
            script: script.clone(),
            source,
        })?;

    let version = output.stdout.trim().to_string();
    if version.is_empty() {
        return Err(VersionResolutionError::Empty { script });
    }

    tracing::debug!("Resolved package version {}", version);
    Ok(version)
}

/// The version script failed to produce a version.
#[derive(Debug, Error)]
pub enum VersionResolutionError {
    #[error("version script `{}` failed", .script.display())]
    Script {
        script: PathBuf,
        #[source]
        source: CommandError,
    },

    #[error("version script `{}` produced no output", .script.display())]
    Empty { script: PathBuf },
}
