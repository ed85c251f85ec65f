//! CLI definitions using clap.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use cppkg_recipe::recipe::options::OptionValue;
use cppkg_recipe::recipe::settings::{Compiler, CompilerVersion, Os, Profile, Settings};
use cppkg_recipe::util::context::profile_path;

/// cppkg-recipe - build and packaging driver for the cppkg C++ libraries
#[derive(Parser)]
#[command(name = "cppkg-recipe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory containing the version script
    #[arg(long, global = true, default_value = ".")]
    pub recipe_dir: PathBuf,

    /// Directory owning the checkout, build tree, and install output
    #[arg(long, global = true, default_value = ".")]
    pub work_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the package sources
    Source(SourceArgs),

    /// Configure and compile the sources
    Build(BuildArgs),

    /// Collect licenses and install the built tree
    Package(PackageArgs),

    /// Print the artifact manifest consumers link against
    PackageInfo(PackageInfoArgs),

    /// Run the whole lifecycle from scratch
    Create(CreateArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Discard any previous checkout and lifecycle state first
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args)]
pub struct PackageInfoArgs {
    /// Write the manifest to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Settings shared by the stages that derive configuration.
#[derive(Args)]
pub struct SettingsArgs {
    /// Settings profile name or path
    #[arg(long, env = "CPPKG_PROFILE")]
    pub profile: Option<String>,

    /// Target operating system
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture
    #[arg(long)]
    pub arch: Option<String>,

    /// Compiler name
    #[arg(long)]
    pub compiler: Option<String>,

    /// Compiler version
    #[arg(long)]
    pub compiler_version: Option<String>,

    /// CMake build type
    #[arg(long)]
    pub build_type: Option<String>,

    /// Override a recipe option (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

impl SettingsArgs {
    /// Resolve host defaults, the profile, and flags into effective
    /// settings plus option overrides. Flags win over the profile.
    pub fn resolve(&self) -> Result<(Settings, Vec<(String, OptionValue)>)> {
        let mut settings = Settings::host_defaults();
        let mut overrides = Vec::new();

        if let Some(name) = &self.profile {
            let path = profile_path(name);
            let profile = Profile::load(&path)?;
            profile.apply_to(&mut settings);
            overrides.extend(profile.option_values()?);
        }

        if let Some(os) = &self.os {
            settings.os = Os::parse(os);
        }
        if let Some(arch) = &self.arch {
            settings.arch = arch.clone();
        }
        if let Some(compiler) = &self.compiler {
            settings.compiler = Compiler::new(compiler.clone());
        }
        if let Some(version) = &self.compiler_version {
            settings.compiler.version = Some(CompilerVersion::new(version));
        }
        if let Some(build_type) = &self.build_type {
            settings.build_type = build_type.clone();
        }

        for raw in &self.options {
            let (key, value) = raw.split_once('=').with_context(|| {
                format!("invalid option override `{}`: expected KEY=VALUE", raw)
            })?;
            overrides.push((key.to_string(), OptionValue::parse(value)));
        }

        Ok((settings, overrides))
    }
}
