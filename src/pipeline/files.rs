//! Java source discovery

use crate::parsers::is_java_file;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Every `.java` file under `root`, respecting .gitignore, sorted by path.
///
/// A `root` that is itself a file is returned as the only entry.
pub fn collect_java_files(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .add_custom_ignore_filename(".seleniportignore");

    let mut files: Vec<PathBuf> = builder
        .build()
        .flatten()
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file() && is_java_file(path))
        .collect();

    files.sort();
    files
}
