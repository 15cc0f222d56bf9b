use crate::app::models::Configuration;
use crate::app::scanner::Scanner;
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const TREE_HEADER: &str = "### Directory and Files Structure ###";
pub const CONTENTS_HEADER: &str = "### File Contents ###";
pub const SEPARATOR: &str = "================================================";

/// What becomes of one collected file in the contents section.
#[derive(Debug, PartialEq, Eq)]
pub enum BlockOutcome {
    /// The file's decoded text.
    Content(String),
    /// Left out entirely: the output file itself, or a path already emitted.
    Skipped,
    /// The file could not be read; carries the inline error text.
    Failed(String),
}

/// Builds the full context text for `root`, reading files from disk.
///
/// `output_relative` is the root-relative path of the file this text will be
/// written to; a collected file with that path is left out.
pub fn assemble(root: &Path, config: &Configuration, output_relative: &str) -> String {
    assemble_with(root, config, output_relative, |path| fs::read(path))
}

/// Same as [`assemble`], reading file contents through `read_file`.
pub fn assemble_with<F>(
    root: &Path,
    config: &Configuration,
    output_relative: &str,
    mut read_file: F,
) -> String
where
    F: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    let scanner = Scanner::new(root, config);

    let mut output = String::new();
    output.push_str(TREE_HEADER);
    output.push('\n');
    output.push_str(&scanner.render_tree(""));
    output.push('\n');

    output.push('\n');
    output.push_str(CONTENTS_HEADER);
    output.push('\n');

    let mut seen = HashSet::new();
    for path in scanner.collect_files(|_| true) {
        let Some(relative) = relative_path(root, &path) else {
            continue;
        };

        match block_outcome(&path, &relative, output_relative, &mut seen, &mut read_file) {
            BlockOutcome::Content(body) | BlockOutcome::Failed(body) => {
                push_block(&mut output, &relative, &body);
            }
            BlockOutcome::Skipped => {}
        }
    }

    output
}

fn block_outcome<F>(
    path: &Path,
    relative: &str,
    output_relative: &str,
    seen: &mut HashSet<PathBuf>,
    read_file: &mut F,
) -> BlockOutcome
where
    F: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    if relative == output_relative {
        log::debug!("Leaving out the output file {}", relative);
        return BlockOutcome::Skipped;
    }
    if !seen.insert(path.to_path_buf()) {
        return BlockOutcome::Skipped;
    }

    match read_file(path) {
        Ok(bytes) => BlockOutcome::Content(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            log::warn!("Failed to read {}: {}", path.display(), err);
            BlockOutcome::Failed(format!("Error reading file: {}", err))
        }
    }
}

fn push_block(output: &mut String, relative: &str, body: &str) {
    output.push('\n');
    output.push_str(SEPARATOR);
    output.push('\n');
    output.push_str(&format!("File: ./{}\n", relative));
    output.push_str(SEPARATOR);
    output.push('\n');
    output.push_str(body);
    output.push('\n');
}

/// `path` relative to `root`, with `/` separators.
pub fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = diff_paths(path, root)?;
    Some(relative.to_string_lossy().replace('\\', "/"))
}
