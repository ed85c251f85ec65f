//! Package identity metadata.
//!
//! Everything here is fixed at authoring time except the version, which is
//! resolved from the sources by [`resolve_version`].

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use url::Url;

use crate::recipe::version::{resolve_version, VersionResolutionError};
use crate::util::process::ProcessRunner;

pub const PACKAGE_NAME: &str = "cppkg";
pub const LICENSE: &str = "MIT";
pub const AUTHOR: &str = "Ming Kai Chen <mingkaichen2009@gmail.com>";
pub const REPOSITORY_URL: &str = "https://github.com/mingkaic/cppkg";
pub const DESCRIPTION: &str = "C++ utility packages.";
pub const TOPICS: [&str; 2] = ["conan", "utility"];

static REPOSITORY: LazyLock<Url> =
    LazyLock::new(|| Url::parse(REPOSITORY_URL).expect("repository url is valid"));

/// The identity of the package a recipe run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    name: String,
    version: String,
    license: String,
    author: String,
    url: Url,
    description: String,
    topics: BTreeSet<String>,
}

impl PackageIdentity {
    /// Build the identity with an already-resolved version.
    pub fn with_version(version: impl Into<String>) -> Self {
        PackageIdentity {
            name: PACKAGE_NAME.to_string(),
            version: version.into(),
            license: LICENSE.to_string(),
            author: AUTHOR.to_string(),
            url: REPOSITORY.clone(),
            description: DESCRIPTION.to_string(),
            topics: TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Build the identity, resolving the version from the recipe's version
    /// script.
    pub fn resolve(
        recipe_dir: &Path,
        runner: &dyn ProcessRunner,
    ) -> Result<Self, VersionResolutionError> {
        let version = resolve_version(recipe_dir, runner)?;
        Ok(PackageIdentity::with_version(version))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn license(&self) -> &str {
        &self.license
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}
