//! Working directory layout for a recipe run.
//!
//! A run owns one work directory with derived subdirectories for the source
//! checkout, the build tree, and the install output, plus a hidden state
//! directory tracking lifecycle progress. The recipe directory is where the
//! version script lives and is usually the same as the work directory.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::util::fs::remove_dir_all_if_exists;

/// Per-user directories for cppkg-recipe configuration.
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "cppkg", "cppkg-recipe"));

/// Resolve a profile name or path to a file path.
///
/// A value that exists on disk, contains a path separator, or ends in
/// `.toml` is taken literally; otherwise it names a profile under the
/// per-user config directory.
pub fn profile_path(name: &str) -> PathBuf {
    let literal = Path::new(name);
    if literal.exists() || name.contains(std::path::MAIN_SEPARATOR) || name.ends_with(".toml") {
        return literal.to_path_buf();
    }

    match PROJECT_DIRS.as_ref() {
        Some(dirs) => dirs.config_dir().join("profiles").join(format!("{}.toml", name)),
        None => literal.to_path_buf(),
    }
}

/// Paths for a single recipe run.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Directory containing the version script.
    recipe_dir: PathBuf,

    /// Directory owning the checkout, build tree, and install output.
    work_dir: PathBuf,
}

impl RunContext {
    /// Create a context, making relative paths absolute against the
    /// current directory.
    pub fn new(recipe_dir: impl AsRef<Path>, work_dir: impl AsRef<Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(RunContext {
            recipe_dir: absolutize(&cwd, recipe_dir.as_ref()),
            work_dir: absolutize(&cwd, work_dir.as_ref()),
        })
    }

    /// Get the recipe directory.
    pub fn recipe_dir(&self) -> &Path {
        &self.recipe_dir
    }

    /// Get the work directory.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Get the source checkout directory.
    pub fn source_dir(&self) -> PathBuf {
        self.work_dir.join("source")
    }

    /// Get the build tree directory.
    pub fn build_dir(&self) -> PathBuf {
        self.work_dir.join("build")
    }

    /// Get the install output directory.
    pub fn package_dir(&self) -> PathBuf {
        self.work_dir.join("package")
    }

    /// Get the license artifact directory inside the install output.
    pub fn licenses_dir(&self) -> PathBuf {
        self.package_dir().join("licenses")
    }

    /// Get the hidden per-run state directory.
    pub fn state_dir(&self) -> PathBuf {
        self.work_dir.join(".cppkg")
    }

    /// Get the lifecycle state file path.
    pub fn state_path(&self) -> PathBuf {
        self.state_dir().join("state.json")
    }

    /// Discard any previous checkout, build output, and lifecycle state so
    /// the next run starts from scratch.
    pub fn reset(&self) -> Result<()> {
        remove_dir_all_if_exists(&self.source_dir())?;
        remove_dir_all_if_exists(&self.build_dir())?;
        remove_dir_all_if_exists(&self.package_dir())?;
        remove_dir_all_if_exists(&self.state_dir())?;
        Ok(())
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
