use crate::app::models::{Configuration, CONTEXT_SUFFIX};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Name used in the project root when no `--name` is given.
pub const ROOT_DEFAULT_NAME: &str = "context_project.context-generator.txt";

/// Name used in a dedicated output directory when no `--name` is given.
pub const DEFAULT_OUTPUT: &str = "project.context-generator.txt";

/// Final output file name. In the project root the name always carries the
/// generated-file suffix, so later runs ignore it; elsewhere `.txt` is enough.
pub fn output_file_name(raw: Option<&str>, root_out_dir: bool) -> String {
    match (raw, root_out_dir) {
        (Some(name), true) if name.ends_with(CONTEXT_SUFFIX) => name.to_string(),
        (Some(name), true) => format!("{}{}", name, CONTEXT_SUFFIX),
        (None, true) => ROOT_DEFAULT_NAME.to_string(),
        (Some(name), false) if name.ends_with(".txt") => name.to_string(),
        (Some(name), false) => format!("{}.txt", name),
        (None, false) => DEFAULT_OUTPUT.to_string(),
    }
}

/// Root-relative path of the output file, `/`-separated.
pub fn output_relative_path(config: &Configuration, file_name: &str) -> String {
    if config.is_root_out_dir() {
        file_name.to_string()
    } else {
        format!("{}/{}", config.out_dir, file_name)
    }
}

/// Writes `content` to the output file, creating the output directory first.
pub fn write_output(
    root: &Path,
    config: &Configuration,
    file_name: &str,
    content: &str,
) -> Result<PathBuf> {
    let out_dir = if config.is_root_out_dir() {
        root.to_path_buf()
    } else {
        root.join(&config.out_dir)
    };

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {:?}", out_dir))?;

    let output_path = out_dir.join(file_name);
    fs::write(&output_path, content)
        .with_context(|| format!("Failed to write {:?}", output_path))?;

    Ok(output_path)
}
