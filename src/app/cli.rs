use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate a context file with the project's directory tree and file contents"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output file name (default: "context_project.context-generator.txt" in the project
    /// root, "project.context-generator.txt" in an output directory)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Output directory, relative to the project root (overrides "outDir" in the config file)
    #[arg(long, visible_alias = "outDir")]
    pub out_dir: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the configuration template ("context-generator.config.json")
    Init,
}
