use crate::app::models::{Configuration, CONFIG_FILENAME, GENERATED_PATTERN};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// The on-disk shape of `context-generator.config.json`. Every field is optional.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_dirs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ignore_files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    out_dir: Option<String>,
}

impl ConfigFile {
    fn template() -> Self {
        let defaults = Configuration::default();
        Self {
            ignore_dirs: Some(defaults.ignore_dirs),
            ignore_files: Some(defaults.ignore_files),
            out_dir: Some(defaults.out_dir),
        }
    }
}

/// Reads the config file under `root`. A missing or unreadable file yields no
/// overrides; so does a malformed one, after a warning.
fn load_config_file(root: &Path) -> Option<ConfigFile> {
    let config_path = root.join(CONFIG_FILENAME);

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            log::warn!("Failed to read config at {:?}: {}", config_path, err);
            return None;
        }
    };

    match serde_json::from_str(&content) {
        Ok(parsed) => {
            log::debug!("Loaded configuration from {:?}", config_path);
            Some(parsed)
        }
        Err(err) => {
            log::warn!(
                "Failed to parse {}, using defaults: {}",
                CONFIG_FILENAME,
                err
            );
            None
        }
    }
}

/// Strips a leading `./` and trailing slashes, so `./` becomes the empty root marker.
fn normalize_out_dir(out_dir: &str) -> String {
    let out_dir = out_dir.strip_prefix("./").unwrap_or(out_dir);
    out_dir.trim_end_matches('/').to_string()
}

fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

/// Merges the defaults with the file's fields and the CLI's `--out-dir`, then
/// adds the patterns that keep the tool's own files out of the context.
fn merge(file: ConfigFile, out_dir_override: Option<&str>) -> Configuration {
    let defaults = Configuration::default();

    let out_dir = out_dir_override
        .map(str::to_string)
        .or(file.out_dir)
        .filter(|dir| !dir.is_empty())
        .unwrap_or(defaults.out_dir);

    let mut config = Configuration {
        ignore_dirs: file.ignore_dirs.unwrap_or(defaults.ignore_dirs),
        ignore_files: file.ignore_files.unwrap_or(defaults.ignore_files),
        out_dir: normalize_out_dir(&out_dir),
    };

    push_unique(&mut config.ignore_files, CONFIG_FILENAME);
    push_unique(&mut config.ignore_files, GENERATED_PATTERN);
    if !config.is_root_out_dir() {
        let out_dir = config.out_dir.clone();
        push_unique(&mut config.ignore_dirs, &out_dir);
    }

    config
}

pub fn resolve_config(root: &Path, out_dir_override: Option<&str>) -> Configuration {
    let file = load_config_file(root).unwrap_or_default();
    merge(file, out_dir_override)
}

/// Outcome of `init`.
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    AlreadyExists,
}

/// Writes the default configuration template under `root` unless one exists.
pub fn init_config(root: &Path) -> Result<InitOutcome> {
    let config_path = root.join(CONFIG_FILENAME);
    if config_path.exists() {
        return Ok(InitOutcome::AlreadyExists);
    }

    let content = serde_json::to_string_pretty(&ConfigFile::template())
        .context("Failed to serialize configuration template")?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {:?}", config_path))?;

    Ok(InitOutcome::Created)
}
