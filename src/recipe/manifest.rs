//! The artifact manifest published at the end of the lifecycle.
//!
//! Consumers integrate through CMake find-package generators, so the
//! manifest maps each generator scheme to the name its registry should
//! expose and lists the produced libraries in link order.

use std::collections::BTreeMap;

use serde::Serialize;

/// Single-configuration CMake find-package generator scheme.
pub const CMAKE_FIND_PACKAGE: &str = "cmake_find_package";

/// Multi-configuration CMake find-package generator scheme.
pub const CMAKE_FIND_PACKAGE_MULTI: &str = "cmake_find_package_multi";

/// Libraries the package produces, in link order.
pub const LIBRARIES: [&str; 7] = ["diff", "egrpc", "error", "estd", "flag", "fmts", "logs"];

/// Metadata consumers need to link against the installed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactManifest {
    /// Generator scheme to registry name.
    names: BTreeMap<String, String>,

    /// Library names in link order.
    libs: Vec<String>,
}

impl ArtifactManifest {
    /// Build the manifest for a package name.
    pub fn for_package(name: &str) -> Self {
        let mut names = BTreeMap::new();
        names.insert(CMAKE_FIND_PACKAGE.to_string(), name.to_string());
        names.insert(CMAKE_FIND_PACKAGE_MULTI.to_string(), name.to_string());
        ArtifactManifest {
            names,
            libs: LIBRARIES.iter().map(|lib| lib.to_string()).collect(),
        }
    }

    /// Look up the registry name for a generator scheme.
    pub fn registry_name(&self, scheme: &str) -> Option<&str> {
        self.names.get(scheme).map(|name| name.as_str())
    }

    pub fn names(&self) -> &BTreeMap<String, String> {
        &self.names
    }

    pub fn libs(&self) -> &[String] {
        &self.libs
    }
}
