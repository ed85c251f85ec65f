//! cppkg-recipe CLI - drives the cppkg package through its lifecycle

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cppkg_recipe::util::context::RunContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cppkg_recipe=debug")
    } else {
        EnvFilter::new("cppkg_recipe=info")
    };

    // Keep stdout clean for manifest output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let ctx = RunContext::new(&cli.recipe_dir, &cli.work_dir)?;

    // Execute command
    match cli.command {
        Commands::Source(args) => commands::source::execute(ctx, args),
        Commands::Build(args) => commands::build::execute(ctx, args),
        Commands::Package(args) => commands::package::execute(ctx, args),
        Commands::PackageInfo(args) => commands::info::execute(ctx, args),
        Commands::Create(args) => commands::create::execute(ctx, args),
    }
}
