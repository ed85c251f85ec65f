//! The recipe's option model.
//!
//! Options are declared with a fixed value domain and a default, may be
//! overridden by profiles or the command line, and are filtered by platform
//! rules before configuration is derived from them.

use std::collections::BTreeMap;
use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

use crate::recipe::settings::{CompilerFamily, Os, Settings};

/// The position-independent-code option key.
pub const FPIC: &str = "fPIC";

/// Oldest MSVC toolset major version able to build the gRPC component.
/// Visual Studio 2015 reports toolset version 14.
const MSVC_MINIMUM_VERSION: u32 = 14;

/// A single option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    /// Parse a textual value. `true` and `false` (any case) become
    /// booleans; everything else stays a string.
    pub fn parse(s: &str) -> OptionValue {
        match s.to_lowercase().as_str() {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => OptionValue::Str(s.to_string()),
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// One declared option: its key, allowed values, default, and current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDeclaration {
    key: String,
    domain: Vec<OptionValue>,
    default: OptionValue,
    value: OptionValue,
}

impl OptionDeclaration {
    /// Declare a boolean option with the given default.
    pub fn boolean(key: impl Into<String>, default: bool) -> Self {
        OptionDeclaration {
            key: key.into(),
            domain: vec![OptionValue::Bool(true), OptionValue::Bool(false)],
            default: OptionValue::Bool(default),
            value: OptionValue::Bool(default),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    pub fn default(&self) -> &OptionValue {
        &self.default
    }

    pub fn domain(&self) -> &[OptionValue] {
        &self.domain
    }
}

/// The set of declared options, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    options: BTreeMap<String, OptionDeclaration>,
}

impl OptionSet {
    pub fn new() -> Self {
        OptionSet::default()
    }

    /// Add a declaration to the set.
    pub fn declare(mut self, declaration: OptionDeclaration) -> Self {
        self.options.insert(declaration.key.clone(), declaration);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionDeclaration> {
        self.options.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Override an option's value. The key must be declared and the value
    /// must lie in the declared domain.
    pub fn set(&mut self, key: &str, value: OptionValue) -> Result<(), OptionError> {
        let declared = self.options.keys().cloned().collect::<Vec<_>>().join(", ");
        let declaration = match self.options.get_mut(key) {
            Some(declaration) => declaration,
            None => {
                return Err(OptionError::Unknown {
                    key: key.to_string(),
                    declared,
                })
            }
        };
        if !declaration.domain.contains(&value) {
            return Err(OptionError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                allowed: declaration
                    .domain
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        declaration.value = value;
        Ok(())
    }

    /// Iterate declarations in key order.
    pub fn iter(&self) -> impl Iterator<Item = &OptionDeclaration> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Filter the options by platform rules, returning the effective set
    /// for the given settings. The receiver is left untouched.
    ///
    /// MSVC cannot express `fPIC`, so the option is dropped on Windows when
    /// building with Visual Studio. That toolchain must also be recent
    /// enough for the gRPC component.
    pub fn apply_platform_rules(
        &self,
        settings: &Settings,
    ) -> Result<OptionSet, UnsupportedToolchainError> {
        let mut effective = self.clone();
        if settings.os == Os::Windows && settings.compiler.family() == CompilerFamily::Msvc {
            effective.options.remove(FPIC);
            let supported = settings
                .compiler
                .version
                .as_ref()
                .and_then(|v| v.major())
                .is_some_and(|major| major >= MSVC_MINIMUM_VERSION);
            if !supported {
                return Err(UnsupportedToolchainError {
                    compiler: settings.compiler.name.clone(),
                    version: settings
                        .compiler
                        .version
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "unknown".to_string()),
                });
            }
        }
        Ok(effective)
    }
}

/// Declare the recipe's options with their defaults.
pub fn declare_options() -> OptionSet {
    OptionSet::new().declare(OptionDeclaration::boolean(FPIC, true))
}

/// The host toolchain cannot build the package.
#[derive(Debug, Error, Diagnostic)]
#[error("unsupported toolchain: {compiler} {version} cannot build the gRPC component")]
#[diagnostic(
    code(cppkg_recipe::options::unsupported_toolchain),
    help("gRPC can only be built with Visual Studio 2015 or higher")
)]
pub struct UnsupportedToolchainError {
    pub compiler: String,
    pub version: String,
}

/// An option override failed validation.
#[derive(Debug, Error)]
pub enum OptionError {
    #[error("unknown option `{key}` (declared options: {declared})")]
    Unknown { key: String, declared: String },

    #[error("invalid value `{value}` for option `{key}` (allowed: {allowed})")]
    InvalidValue {
        key: String,
        value: String,
        allowed: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::settings::Compiler;
    use crate::test_support::{linux_gcc, windows_msvc};

    #[test]
    fn test_fpic_declared_on_by_default() {
        let options = declare_options();
        let fpic = options.get(FPIC).unwrap();
        assert_eq!(fpic.default(), &OptionValue::Bool(true));
        assert_eq!(fpic.value(), &OptionValue::Bool(true));
        assert_eq!(fpic.domain().len(), 2);
    }

    #[test]
    fn test_set_validates_key_and_domain() {
        let mut options = declare_options();

        options.set(FPIC, OptionValue::Bool(false)).unwrap();
        assert_eq!(options.get(FPIC).unwrap().value(), &OptionValue::Bool(false));

        let err = options.set("shared", OptionValue::Bool(true)).unwrap_err();
        assert!(matches!(err, OptionError::Unknown { .. }));
        // The rejection names the options that do exist.
        assert!(err.to_string().contains("declared options: fPIC"));
        assert_eq!(options.get(FPIC).unwrap().value(), &OptionValue::Bool(false));

        let err = options
            .set(FPIC, OptionValue::Str("banana".to_string()))
            .unwrap_err();
        assert!(matches!(err, OptionError::InvalidValue { .. }));
    }

    #[test]
    fn test_platform_rules_keep_fpic_off_windows() {
        let options = declare_options();
        let effective = options.apply_platform_rules(&linux_gcc()).unwrap();
        assert_eq!(effective, options);
        assert_eq!(effective.get(FPIC).unwrap().value(), &OptionValue::Bool(true));
    }

    #[test]
    fn test_platform_rules_drop_fpic_for_msvc() {
        let options = declare_options();
        let effective = options.apply_platform_rules(&windows_msvc(Some("16"))).unwrap();
        assert!(!effective.contains(FPIC));
        // The receiver is unchanged.
        assert!(options.contains(FPIC));
    }

    #[test]
    fn test_platform_rules_reject_old_msvc() {
        let options = declare_options();
        let err = options
            .apply_platform_rules(&windows_msvc(Some("12")))
            .unwrap_err();
        assert_eq!(err.compiler, "Visual Studio");
        assert_eq!(err.version, "12");

        // The rejection does not depend on the option's value.
        let mut disabled = declare_options();
        disabled.set(FPIC, OptionValue::Bool(false)).unwrap();
        assert!(disabled.apply_platform_rules(&windows_msvc(Some("12"))).is_err());
    }

    #[test]
    fn test_platform_rules_reject_unversioned_msvc() {
        let options = declare_options();
        let err = options.apply_platform_rules(&windows_msvc(None)).unwrap_err();
        assert_eq!(err.version, "unknown");
    }

    #[test]
    fn test_msvc_boundary_version_accepted() {
        let options = declare_options();
        let effective = options.apply_platform_rules(&windows_msvc(Some("14"))).unwrap();
        assert!(!effective.contains(FPIC));
    }

    #[test]
    fn test_non_msvc_windows_compiler_keeps_fpic() {
        let mut settings = windows_msvc(Some("16"));
        settings.compiler = Compiler::new("clang").with_version("17");

        let options = declare_options();
        let effective = options.apply_platform_rules(&settings).unwrap();
        assert!(effective.contains(FPIC));
    }

    #[test]
    fn test_option_value_parse() {
        assert_eq!(OptionValue::parse("True"), OptionValue::Bool(true));
        assert_eq!(OptionValue::parse("false"), OptionValue::Bool(false));
        assert_eq!(
            OptionValue::parse("banana"),
            OptionValue::Str("banana".to_string())
        );
    }
}
