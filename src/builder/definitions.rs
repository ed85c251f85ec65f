//! Translation of recipe options into CMake cache definitions.
//!
//! The same translation runs in the build and package stages, and both must
//! see identical output for the install step to be trustworthy. Definitions
//! are kept sorted so argument order and fingerprints are reproducible.

use std::collections::BTreeMap;

use crate::recipe::options::{OptionSet, OptionValue, FPIC};
use crate::util::hash::Fingerprint;

/// CMake cache key controlling position-independent code generation.
pub const POSITION_INDEPENDENT_CODE: &str = "CMAKE_POSITION_INDEPENDENT_CODE";

/// An ordered set of CMake cache definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinitionSet {
    definitions: BTreeMap<String, String>,
}

impl DefinitionSet {
    pub fn new() -> Self {
        DefinitionSet::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.definitions.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.definitions.get(key).map(|v| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Render the definitions as `-DKEY=VALUE` arguments, in key order.
    pub fn to_args(&self) -> Vec<String> {
        self.definitions
            .iter()
            .map(|(key, value)| format!("-D{}={}", key, value))
            .collect()
    }

    /// A short stable digest of the definitions, used to detect drift
    /// between the build and package stages.
    pub fn fingerprint(&self) -> String {
        let mut fingerprint = Fingerprint::new();
        for (key, value) in &self.definitions {
            fingerprint.update_str(key);
            fingerprint.update_str(value);
        }
        fingerprint.finish_short()
    }
}

/// Derive the cache definitions for an effective option set.
///
/// Only options with a CMake mapping produce definitions; an option removed
/// by platform rules simply contributes nothing.
pub fn translate(options: &OptionSet) -> DefinitionSet {
    let mut definitions = DefinitionSet::new();
    for declaration in options.iter() {
        if declaration.key() == FPIC {
            definitions.insert(POSITION_INDEPENDENT_CODE, cmake_value(declaration.value()));
        }
    }
    definitions
}

fn cmake_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) => "ON".to_string(),
        OptionValue::Bool(false) => "OFF".to_string(),
        OptionValue::Str(s) => s.clone(),
    }
}
