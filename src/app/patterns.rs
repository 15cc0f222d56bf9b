use crate::app::models::Configuration;
use globset::{Glob, GlobSet, GlobSetBuilder};

/// A compiled list of ignore patterns, matched against bare names.
///
/// Patterns starting with `.` are kept apart from the rest: a name with a
/// leading dot can only be matched by a pattern that spells the dot out, so
/// `*` never picks up `.env` but `.env` and `.*` do.
#[derive(Debug, Clone)]
pub struct PatternSet {
    explicit_dot: GlobSet,
    implicit_dot: GlobSet,
}

impl PatternSet {
    /// Compiles `patterns`. An invalid pattern is logged and matches nothing.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let mut explicit_dot = GlobSetBuilder::new();
        let mut implicit_dot = GlobSetBuilder::new();

        // Each brace alternative is classified on its own, so `{.env,*.log}`
        // still matches `.env`.
        for pat in patterns.iter().flat_map(|pat| expand_braces(pat.as_ref())) {
            let glob = match Glob::new(&pat) {
                Ok(glob) => glob,
                Err(err) => {
                    log::warn!("Ignoring invalid glob pattern {:?}: {}", pat, err);
                    continue;
                }
            };
            if pat.starts_with('.') {
                explicit_dot.add(glob);
            } else {
                implicit_dot.add(glob);
            }
        }

        Self {
            explicit_dot: build_or_empty(explicit_dot),
            implicit_dot: build_or_empty(implicit_dot),
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        if self.explicit_dot.is_match(name) {
            return true;
        }
        !name.starts_with('.') && self.implicit_dot.is_match(name)
    }
}

/// Returns true iff `name` matches at least one of `patterns`.
pub fn matches<S: AsRef<str>>(name: &str, patterns: &[S]) -> bool {
    PatternSet::new(patterns).is_match(name)
}

/// The directory and file pattern sets of a [`Configuration`], compiled once per run.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    dirs: PatternSet,
    files: PatternSet,
}

impl IgnoreRules {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            dirs: PatternSet::new(&config.ignore_dirs),
            files: PatternSet::new(&config.ignore_files),
        }
    }

    /// Tree filter: both pattern sets apply to every entry, whatever its type.
    pub fn hides_in_tree(&self, name: &str) -> bool {
        self.dirs.is_match(name) || self.files.is_match(name)
    }

    pub fn skips_dir(&self, name: &str) -> bool {
        self.dirs.is_match(name)
    }

    pub fn skips_file(&self, name: &str) -> bool {
        self.files.is_match(name)
    }
}

/// Expands `{a,b}` groups, nested ones included, into one pattern per alternative.
/// Unbalanced braces are left for the glob compiler to report.
fn expand_braces(pattern: &str) -> Vec<String> {
    let mut depth = 0usize;
    let mut group = None;
    for (i, c) in pattern.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    group = Some((i, None));
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some((start, _)) = group {
                        group = Some((start, Some(i)));
                        break;
                    }
                }
            }
            _ => {}
        }
    }

    let Some((start, Some(end))) = group else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..start];
    let suffix = &pattern[end + 1..];
    split_alternatives(&pattern[start + 1..end])
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
        .collect()
}

/// Splits the inside of a brace group on its top-level commas.
fn split_alternatives(content: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut from = 0;
    for (i, c) in content.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&content[from..i]);
                from = i + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&content[from..]);
    alternatives
}

fn build_or_empty(builder: GlobSetBuilder) -> GlobSet {
    builder.build().unwrap_or_else(|err| {
        log::warn!("Failed to compile glob set: {}", err);
        GlobSet::empty()
    })
}
