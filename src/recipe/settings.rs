//! Host settings the recipe branches on.
//!
//! Only the operating system and compiler influence recipe behavior; the
//! build type and architecture pass straight through to the build driver.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::recipe::options::OptionValue;
use crate::util::fs::read_to_string;

/// Target operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Os {
    Linux,
    Windows,
    Macos,
    Other(String),
}

impl Os {
    /// Parse an operating system name. Unrecognized names are preserved
    /// rather than rejected; the recipe only branches on Windows.
    pub fn parse(s: &str) -> Os {
        match s.to_lowercase().as_str() {
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            "macos" | "darwin" => Os::Macos,
            _ => Os::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Os::Linux => "linux",
            Os::Windows => "windows",
            Os::Macos => "macos",
            Os::Other(name) => name,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Compiler families the recipe knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilerFamily {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
    Other,
}

/// A compiler version string such as `14` or `16.2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerVersion(String);

impl CompilerVersion {
    pub fn new(version: impl Into<String>) -> Self {
        CompilerVersion(version.into().trim().to_string())
    }

    /// Get the leading numeric component, if the version has one.
    pub fn major(&self) -> Option<u32> {
        self.0.split('.').next()?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompilerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The host compiler, as named by the caller or a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiler {
    pub name: String,
    pub version: Option<CompilerVersion>,
}

impl Compiler {
    pub fn new(name: impl Into<String>) -> Self {
        Compiler {
            name: name.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(CompilerVersion::new(version));
        self
    }

    /// Classify the compiler by family, matching the names Conan-style
    /// profiles use.
    pub fn family(&self) -> CompilerFamily {
        match self.name.to_lowercase().as_str() {
            "visual studio" | "msvc" => CompilerFamily::Msvc,
            "apple-clang" => CompilerFamily::AppleClang,
            "clang" => CompilerFamily::Clang,
            "gcc" => CompilerFamily::Gcc,
            _ => CompilerFamily::Other,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} {}", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The full settings tuple for one recipe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub os: Os,
    pub compiler: Compiler,
    pub build_type: String,
    pub arch: String,
}

impl Settings {
    /// Defaults derived from the machine running the recipe.
    pub fn host_defaults() -> Settings {
        let os = Os::parse(std::env::consts::OS);
        let compiler = match os {
            Os::Windows => Compiler::new("Visual Studio"),
            Os::Macos => Compiler::new("apple-clang"),
            _ => Compiler::new("gcc"),
        };
        Settings {
            os,
            compiler,
            build_type: "Release".to_string(),
            arch: std::env::consts::ARCH.to_string(),
        }
    }
}

/// A settings profile loaded from a TOML file.
///
/// ```toml
/// [settings]
/// os = "windows"
/// arch = "x86_64"
/// build_type = "Debug"
///
/// [settings.compiler]
/// name = "Visual Studio"
/// version = "16"
///
/// [options]
/// fPIC = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub settings: ProfileSettings,

    #[serde(default)]
    pub options: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileSettings {
    pub os: Option<String>,
    pub arch: Option<String>,
    pub build_type: Option<String>,
    pub compiler: Option<ProfileCompiler>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileCompiler {
    pub name: Option<String>,
    pub version: Option<String>,
}

impl Profile {
    /// Load a profile from a TOML file.
    pub fn load(path: &Path) -> Result<Profile> {
        let content = read_to_string(path)?;
        let profile: Profile = toml::from_str(&content)
            .with_context(|| format!("failed to parse profile: {}", path.display()))?;
        Ok(profile)
    }

    /// Overlay the profile's settings onto `settings`. Absent fields keep
    /// their current values.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(os) = &self.settings.os {
            settings.os = Os::parse(os);
        }
        if let Some(arch) = &self.settings.arch {
            settings.arch = arch.clone();
        }
        if let Some(build_type) = &self.settings.build_type {
            settings.build_type = build_type.clone();
        }
        if let Some(compiler) = &self.settings.compiler {
            if let Some(name) = &compiler.name {
                settings.compiler = Compiler::new(name.clone());
            }
            if let Some(version) = &compiler.version {
                settings.compiler.version = Some(CompilerVersion::new(version));
            }
        }
    }

    /// Get the option overrides declared in the profile.
    pub fn option_values(&self) -> Result<Vec<(String, OptionValue)>> {
        let mut values = Vec::new();
        for (key, value) in &self.options {
            let value = match value {
                toml::Value::Boolean(b) => OptionValue::Bool(*b),
                toml::Value::String(s) => OptionValue::parse(s),
                other => bail!(
                    "invalid profile option `{}`: expected a boolean or string, got {}",
                    key,
                    other.type_str()
                ),
            };
            values.push((key.clone(), value));
        }
        Ok(values)
    }
}
