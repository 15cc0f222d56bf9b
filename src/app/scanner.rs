use crate::app::models::Configuration;
use crate::app::patterns::IgnoreRules;
use ignore::WalkBuilder;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE_INDENT: &str = "│   ";
const BLANK_INDENT: &str = "    ";

/// Walks a project root with the ignore rules of one [`Configuration`].
pub struct Scanner {
    root: PathBuf,
    rules: IgnoreRules,
}

/// One directory level of the tree still being rendered.
struct Frame {
    dir: PathBuf,
    prefix: String,
    names: Vec<OsString>,
    next: usize,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, config: &Configuration) -> Self {
        Self {
            root: root.into(),
            rules: IgnoreRules::from_config(config),
        }
    }

    /// Renders the directory tree below the root, one line per visible entry.
    ///
    /// Entries matching either pattern set are hidden. Unreadable directories
    /// contribute nothing, and an entry that cannot be stat'ed is drawn as a leaf.
    pub fn render_tree(&self, prefix: &str) -> String {
        let mut output = String::new();
        let mut stack: Vec<Frame> = self
            .tree_frame(&self.root, prefix.to_string())
            .into_iter()
            .collect();

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.names.len() {
                stack.pop();
                continue;
            }

            let index = frame.next;
            frame.next += 1;
            let is_last = frame.next == frame.names.len();
            let name = &frame.names[index];

            let connector = if is_last { LAST_BRANCH } else { BRANCH };
            output.push_str(&format!(
                "{}{}{}\n",
                frame.prefix,
                connector,
                name.to_string_lossy()
            ));

            let path = frame.dir.join(name);
            if !is_directory(&path) {
                continue;
            }
            let indent = if is_last { BLANK_INDENT } else { PIPE_INDENT };
            let child_prefix = format!("{}{}", frame.prefix, indent);
            if let Some(child) = self.tree_frame(&path, child_prefix) {
                stack.push(child);
            }
        }

        output
    }

    /// Lists every non-ignored file below the root, depth-first, for which
    /// `predicate` returns true.
    ///
    /// Ignored directories are never descended into. Entries that cannot be
    /// listed or stat'ed are skipped without error.
    pub fn collect_files<P>(&self, mut predicate: P) -> Vec<PathBuf>
    where
        P: FnMut(&Path) -> bool,
    {
        let rules = self.rules.clone();

        // Standard filters (hidden files, .gitignore, ...) are off: only the
        // configured patterns decide what is skipped.
        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(true)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                match entry.file_type() {
                    Some(ft) if ft.is_dir() => !rules.skips_dir(&name),
                    _ => !rules.skips_file(&name),
                }
            })
            .build();

        let mut files = Vec::new();
        for result in walker {
            match result {
                Ok(entry) => {
                    if entry.depth() == 0 || entry.file_type().is_some_and(|ft| ft.is_dir()) {
                        continue;
                    }
                    if predicate(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => log::debug!("Skipping unreadable entry: {}", err),
            }
        }

        files
    }

    fn tree_frame(&self, dir: &Path, prefix: String) -> Option<Frame> {
        let names = match list_dir(dir) {
            Ok(names) => names,
            Err(err) => {
                log::debug!("Skipping unreadable directory {}: {}", dir.display(), err);
                return None;
            }
        };

        let names = names
            .into_iter()
            .filter(|name| !self.rules.hides_in_tree(&name.to_string_lossy()))
            .collect();

        Some(Frame {
            dir: dir.to_path_buf(),
            prefix,
            names,
            next: 0,
        })
    }
}

/// Entry names of `dir` in byte-wise order, the order the collector's walker uses.
fn list_dir(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names: Vec<OsString> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.file_name()))
        .collect();
    names.sort();
    Ok(names)
}

fn is_directory(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config(dirs: &[&str], files: &[&str]) -> Configuration {
        Configuration {
            ignore_dirs: dirs.iter().map(|s| s.to_string()).collect(),
            ignore_files: files.iter().map(|s| s.to_string()).collect(),
            out_dir: String::new(),
        }
    }

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .expect("under root")
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn three_level_fixture() -> TempDir {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::write(root.join("a.txt"), "a\n").expect("write a");
        fs::create_dir_all(root.join("src/util")).expect("mkdir src/util");
        fs::write(root.join("src/main.rs"), "fn main() {}\n").expect("write main");
        fs::write(root.join("src/util/mod.rs"), "").expect("write mod");
        fs::create_dir(root.join(".git")).expect("mkdir .git");
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").expect("write HEAD");
        fs::write(root.join("zeta.md"), "# z\n").expect("write zeta");
        tmp
    }

    #[test]
    fn test_render_tree_connectors_and_prefixes() {
        let tmp = three_level_fixture();
        let scanner = Scanner::new(tmp.path(), &config(&[".git"], &[]));

        let expected = "\
├── a.txt
├── src
│   ├── main.rs
│   └── util
│       └── mod.rs
└── zeta.md
";
        assert_eq!(scanner.render_tree(""), expected);
    }

    #[test]
    fn test_render_tree_last_directory_gets_blank_indent() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("docs/guide")).expect("mkdir docs/guide");
        fs::write(root.join("docs/guide/intro.md"), "hi").expect("write intro");
        fs::write(root.join("README.md"), "# r").expect("write readme");

        let scanner = Scanner::new(root, &config(&[], &[]));
        let expected = "\
├── README.md
└── docs
    └── guide
        └── intro.md
";
        assert_eq!(scanner.render_tree(""), expected);
    }

    #[test]
    fn test_render_tree_applies_prefix_to_every_line() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir(root.join("a")).expect("mkdir a");
        fs::write(root.join("a/b.txt"), "").expect("write b");

        let scanner = Scanner::new(root, &config(&[], &[]));
        assert_eq!(scanner.render_tree("> "), "> └── a\n>     └── b.txt\n");
    }

    #[test]
    fn test_render_tree_skips_ignored_dir_and_its_children() {
        let tmp = three_level_fixture();
        let scanner = Scanner::new(tmp.path(), &config(&[".git"], &[]));

        let tree = scanner.render_tree("");
        assert!(!tree.contains(".git"));
        assert!(!tree.contains("HEAD"));
    }

    #[test]
    fn test_render_tree_checks_both_pattern_sets_for_every_entry() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        // A directory named like an ignored file, and a file named like an ignored directory.
        fs::create_dir(root.join("logs.log")).expect("mkdir logs.log");
        fs::write(root.join("logs.log/today.txt"), "x").expect("write today");
        fs::write(root.join("build"), "not a dir").expect("write build");
        fs::write(root.join("keep.txt"), "k").expect("write keep");

        let scanner = Scanner::new(root, &config(&["build"], &["*.log"]));
        assert_eq!(scanner.render_tree(""), "└── keep.txt\n");
    }

    #[test]
    fn test_render_tree_missing_root_is_empty() {
        let tmp = TempDir::new().expect("tmp dir");
        let scanner = Scanner::new(tmp.path().join("missing"), &config(&[], &[]));
        assert_eq!(scanner.render_tree(""), "");
    }

    #[test]
    fn test_render_tree_empty_directory_has_no_children() {
        let tmp = TempDir::new().expect("tmp dir");
        fs::create_dir(tmp.path().join("empty")).expect("mkdir empty");

        let scanner = Scanner::new(tmp.path(), &config(&[], &[]));
        assert_eq!(scanner.render_tree(""), "└── empty\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_render_tree_draws_broken_symlink_as_leaf() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling"))
            .expect("symlink");
        fs::write(root.join("file.txt"), "f").expect("write file");

        let scanner = Scanner::new(root, &config(&[], &[]));
        assert_eq!(scanner.render_tree(""), "├── dangling\n└── file.txt\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_subdirectory_contributes_nothing() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::write(root.join("a.txt"), "a").expect("write a");
        fs::create_dir(root.join("locked")).expect("mkdir locked");
        fs::write(root.join("locked/secret.txt"), "s").expect("write secret");
        fs::write(root.join("z.txt"), "z").expect("write z");
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000))
            .expect("chmod locked");

        // Privileged users can still list it; nothing to check then.
        if fs::read_dir(root.join("locked")).is_ok() {
            fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755))
                .expect("restore locked");
            return;
        }

        let scanner = Scanner::new(root, &config(&[], &[]));
        let tree = scanner.render_tree("");
        let files = relative(root, &scanner.collect_files(|_| true));

        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755))
            .expect("restore locked");

        assert_eq!(tree, "├── a.txt\n├── locked\n└── z.txt\n");
        assert_eq!(files, vec!["a.txt", "z.txt"]);
    }

    #[test]
    fn test_collect_files_depth_first_in_name_order() {
        let tmp = three_level_fixture();
        let scanner = Scanner::new(tmp.path(), &config(&[".git"], &[]));

        let files = scanner.collect_files(|_| true);
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["a.txt", "src/main.rs", "src/util/mod.rs", "zeta.md"]
        );
    }

    #[test]
    fn test_collect_files_excludes_ignored_dirs_and_files() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir_all(root.join("app/node_modules/pkg")).expect("mkdir nested");
        fs::write(root.join("app/node_modules/pkg/index.js"), "x").expect("write index");
        fs::write(root.join("app/index.js"), "y").expect("write app index");
        fs::write(root.join("app/.env"), "SECRET=1").expect("write env");
        fs::create_dir(root.join("node_modules")).expect("mkdir node_modules");
        fs::write(root.join("node_modules/top.js"), "z").expect("write top");
        fs::write(root.join("package-lock.json"), "{}").expect("write lock");

        let scanner = Scanner::new(
            root,
            &config(&["node_modules"], &[".env", "package-lock.json"]),
        );
        let files = relative(root, &scanner.collect_files(|_| true));

        assert_eq!(files, vec!["app/index.js"]);
        assert!(files.iter().all(|f| !f.split('/').any(|c| c == "node_modules")));
    }

    #[test]
    fn test_collect_files_splits_pattern_sets_by_entry_kind() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        fs::create_dir(root.join("logs.log")).expect("mkdir logs.log");
        fs::write(root.join("logs.log/today.txt"), "x").expect("write today");
        fs::write(root.join("build"), "not a dir").expect("write build");

        let scanner = Scanner::new(root, &config(&["build"], &["*.log"]));
        let files = relative(root, &scanner.collect_files(|_| true));

        // Unlike the tree, a directory only answers to ignore_dirs and a file to ignore_files.
        assert_eq!(files, vec!["build", "logs.log/today.txt"]);
    }

    #[test]
    fn test_collect_files_applies_predicate() {
        let tmp = three_level_fixture();
        let scanner = Scanner::new(tmp.path(), &config(&[".git"], &[]));

        let files = scanner.collect_files(|p| p.extension().is_some_and(|e| e == "rs"));
        assert_eq!(
            relative(tmp.path(), &files),
            vec!["src/main.rs", "src/util/mod.rs"]
        );
    }

    #[test]
    fn test_collect_files_ignores_root_name() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path().join("dist");
        fs::create_dir(&root).expect("mkdir dist");
        fs::write(root.join("bundle.js"), "b").expect("write bundle");

        let scanner = Scanner::new(&root, &config(&["dist"], &[]));
        assert_eq!(relative(&root, &scanner.collect_files(|_| true)), vec!["bundle.js"]);
    }

    #[test]
    fn test_collect_files_missing_root_is_empty() {
        let tmp = TempDir::new().expect("tmp dir");
        let scanner = Scanner::new(tmp.path().join("missing"), &config(&[], &[]));
        assert!(scanner.collect_files(|_| true).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_files_skips_broken_symlink() {
        let tmp = TempDir::new().expect("tmp dir");
        let root = tmp.path();
        std::os::unix::fs::symlink(root.join("nowhere"), root.join("dangling"))
            .expect("symlink");
        fs::write(root.join("file.txt"), "f").expect("write file");

        let scanner = Scanner::new(root, &config(&[], &[]));
        assert_eq!(relative(root, &scanner.collect_files(|_| true)), vec!["file.txt"]);
    }
}
