use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, contents).context(format!("Unable to write to {}", path.display()))
}

/// Read a file to a `String`.
pub(crate) fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Basically move a file. Renames `from` -> `to`.
pub(crate) fn rename(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    std::fs::rename(from.as_ref(), to.as_ref()).with_context(|| {
        format!(
            "Unable to move file from '{}' to '{}'",
            from.as_ref().display(),
            to.as_ref().display()
        )
    })
}

/// Creates `p` and any missing parents.
pub(crate) fn make_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p)
        .with_context(|| format!("Unable to create directory at {}", p.display()))
}

pub(crate) fn canonicalize(p: &Path) -> Result<PathBuf> {
    std::fs::canonicalize(p)
        .with_context(|| format!("Unable to canonicalize the path {}", p.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_rename() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        write(&a, "hello").unwrap();
        rename(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(read(&b).unwrap(), "hello");
    }

    #[test]
    fn test_make_dir_nested() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("x").join("y");
        make_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Creating an existing directory is not an error.
        make_dir(&nested).unwrap();
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read(&dir.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }
}
