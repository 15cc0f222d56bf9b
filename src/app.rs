// Declare modules
pub mod cli;
pub mod config;
pub mod formatter;
pub mod models;
pub mod output;
pub mod patterns;
pub mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use std::path::Path;

use self::cli::{Cli, Command};
use self::config::{init_config, resolve_config, InitOutcome};
use self::models::CONFIG_FILENAME;

/// Initializes components and orchestrates data flow.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Project root is the working directory; everything below takes it explicitly
    let root = env::current_dir().context("Failed to get current directory")?;

    match args.command {
        Some(Command::Init) => init(&root),
        None => generate(&root, args.name.as_deref(), args.out_dir.as_deref()),
    }
}

fn init(root: &Path) -> Result<()> {
    match init_config(root)? {
        InitOutcome::Created => println!("Configuration template \"{}\" created.", CONFIG_FILENAME),
        InitOutcome::AlreadyExists => println!("The file \"{}\" already exists.", CONFIG_FILENAME),
    }
    Ok(())
}

fn generate(root: &Path, name: Option<&str>, out_dir: Option<&str>) -> Result<()> {
    // 1. Resolve Configuration
    let config = resolve_config(root, out_dir);
    log::debug!("Resolved configuration: {:?}", config);

    // 2. Name the output, so it can be left out of its own contents
    let file_name = output::output_file_name(name, config.is_root_out_dir());
    let relative = output::output_relative_path(&config, &file_name);

    // 3. Generate Output
    let content = formatter::assemble(root, &config, &relative);

    // 4. Write it
    let written = output::write_output(root, &config, &file_name, &content)?;
    log::info!("Wrote {} bytes to {}", content.len(), written.display());

    println!(
        "File \"{}\" generated successfully in directory \"{}\".",
        file_name, config.out_dir
    );

    Ok(())
}
