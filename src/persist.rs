use std::io::{self, Write};
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};

/// Create the parent directory of `path` (recursively) if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Replace `path` with `contents` via a temp file and rename, so readers
/// see either the previous file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|file| file.write_all(contents))
        .map_err(|err| match err {
            atomicwrites::Error::Internal(err) => err,
            atomicwrites::Error::User(err) => err,
        })
}
