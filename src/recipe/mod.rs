//! The recipe: everything declared about the package before any stage runs.
//!
//! Loading a recipe resolves the package version from the sources and
//! assembles the identity, option declarations, and requirement list. The
//! loaded value is immutable apart from option overrides applied before
//! the build stage.

pub mod identity;
pub mod manifest;
pub mod options;
pub mod requires;
pub mod settings;
pub mod version;

use std::fmt;
use std::path::Path;

use url::Url;

pub use identity::PackageIdentity;
pub use manifest::ArtifactManifest;
pub use options::{OptionSet, OptionValue};
pub use requires::PackageReference;
pub use settings::Settings;

use crate::util::process::ProcessRunner;
use version::VersionResolutionError;

/// Branch the sources are fetched from.
pub const SOURCE_BRANCH: &str = "developer-fmts";

/// Build system generators consumers of the package rely on.
pub const GENERATORS: [&str; 2] = ["cmake", "cmake_find_package_multi"];

/// A git ref the source stage checks out after cloning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitReference {
    Branch(String),
    Tag(String),
    Rev(String),
}

impl GitReference {
    /// The argument passed to `git checkout`.
    pub fn refspec(&self) -> &str {
        match self {
            GitReference::Branch(name) => name,
            GitReference::Tag(name) => name,
            GitReference::Rev(rev) => rev,
        }
    }
}

impl fmt::Display for GitReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitReference::Branch(name) => write!(f, "branch {}", name),
            GitReference::Tag(name) => write!(f, "tag {}", name),
            GitReference::Rev(rev) => write!(f, "revision {}", rev),
        }
    }
}

/// Where the source stage fetches the package sources from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    url: Url,
    reference: GitReference,
}

impl SourceSpec {
    pub fn new(url: Url, reference: GitReference) -> Self {
        SourceSpec { url, reference }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn reference(&self) -> &GitReference {
        &self.reference
    }

    /// The URL handed to `git clone`.
    pub fn clone_url(&self) -> String {
        format!("{}.git", self.url)
    }
}

/// A fully loaded recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    identity: PackageIdentity,
    options: OptionSet,
    requires: Vec<PackageReference>,
    source: SourceSpec,
}

impl Recipe {
    /// Load the recipe, resolving the package version from the version
    /// script in `recipe_dir`.
    pub fn load(recipe_dir: &Path, runner: &dyn ProcessRunner) -> Result<Self, VersionResolutionError> {
        let identity = PackageIdentity::resolve(recipe_dir, runner)?;
        Ok(Recipe::with_identity(identity))
    }

    /// Assemble the recipe around an already-built identity.
    pub fn with_identity(identity: PackageIdentity) -> Self {
        let source = SourceSpec::new(
            identity.url().clone(),
            GitReference::Branch(SOURCE_BRANCH.to_string()),
        );
        Recipe {
            identity,
            options: options::declare_options(),
            requires: requires::default_requires(),
            source,
        }
    }

    pub fn identity(&self) -> &PackageIdentity {
        &self.identity
    }

    pub fn options(&self) -> &OptionSet {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionSet {
        &mut self.options
    }

    pub fn requires(&self) -> &[PackageReference] {
        &self.requires
    }

    pub fn source(&self) -> &SourceSpec {
        &self.source
    }

    pub fn generators(&self) -> &'static [&'static str] {
        &GENERATORS
    }

    /// The manifest published once the package is installed.
    pub fn manifest(&self) -> ArtifactManifest {
        ArtifactManifest::for_package(self.identity.name())
    }
}
