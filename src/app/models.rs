/// Name of the optional configuration file in the project root.
pub const CONFIG_FILENAME: &str = "context-generator.config.json";

/// Suffix that marks a generated context file.
pub const CONTEXT_SUFFIX: &str = ".context-generator.txt";

/// Ignore pattern matching every previously generated context file.
pub const GENERATED_PATTERN: &str = "*.context-generator.txt";

/// Represents the final configuration after merging defaults, the config file and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// Glob patterns matched against directory names.
    pub ignore_dirs: Vec<String>,
    /// Glob patterns matched against file names.
    pub ignore_files: Vec<String>,
    /// Output directory relative to the project root; "", "." or "./" is the root itself.
    pub out_dir: String,
}

impl Configuration {
    pub fn is_root_out_dir(&self) -> bool {
        matches!(self.out_dir.as_str(), "" | "." | "./")
    }
}

impl Default for Configuration {
    /// Built-in defaults, before any normalization.
    fn default() -> Self {
        Self {
            ignore_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                ".vscode".to_string(),
                "dist".to_string(),
            ],
            ignore_files: vec![
                "package-lock.json".to_string(),
                ".env".to_string(),
                ".gitignore".to_string(),
            ],
            out_dir: "./".to_string(),
        }
    }
}
