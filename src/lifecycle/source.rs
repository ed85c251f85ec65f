//! Source stage: fetch the package sources into the checkout directory.

use std::path::Path;

use crate::lifecycle::errors::SourceFetchError;
use crate::recipe::SourceSpec;
use crate::util::process::{ProcessBuilder, ProcessRunner};

/// Clone the repository into `source_dir` and check out the pinned ref.
///
/// The clone lands in the directory itself rather than a subdirectory, so
/// the build stage can point CMake straight at it.
pub(crate) fn fetch(
    runner: &dyn ProcessRunner,
    source: &SourceSpec,
    source_dir: &Path,
) -> Result<(), SourceFetchError> {
    std::fs::create_dir_all(source_dir).map_err(|e| SourceFetchError::Workspace {
        path: source_dir.to_path_buf(),
        source: e,
    })?;

    let clone_url = source.clone_url();
    tracing::info!("Cloning {}", clone_url);

    let clone = ProcessBuilder::new("git")
        .arg("clone")
        .arg(&clone_url)
        .arg(".")
        .cwd(source_dir);
    runner
        .run_checked(&clone)
        .map_err(|e| SourceFetchError::Clone {
            url: clone_url,
            source: e,
        })?;

    tracing::info!("Checking out {}", source.reference());

    let checkout = ProcessBuilder::new("git")
        .arg("checkout")
        .arg(source.reference().refspec())
        .cwd(source_dir);
    runner
        .run_checked(&checkout)
        .map_err(|e| SourceFetchError::Checkout {
            reference: source.reference().to_string(),
            source: e,
        })?;

    Ok(())
}
