//! Allow-list directory loading.
//!
//! Every regular file directly inside the configured directory is read as
//! allow-list text. Sub-directories are not descended into.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::index::PermissionIndex;

/// Load every allow-list file in `dir` into a fresh index.
///
/// An existing directory with no files (or only blank files) yields an
/// empty index, not an error.
///
/// # Arguments
///
/// * `dir` - Allow-list directory
///
/// # Errors
///
/// * [`ConfigError::DirectoryMissing`] if `dir` does not exist or is not a directory
/// * [`ConfigError::Read`] if listing the directory or reading a file fails
///
/// # Example
///
/// ```rust,no_run
/// use pubapi_meta::MethodKey;
/// use pubapi_rules::load_config;
///
/// let index = load_config("config/published-apis").unwrap();
/// println!("{} entries", index.len());
/// ```
#[instrument(skip_all, fields(path = %dir.as_ref().display()))]
pub fn load_config(dir: impl AsRef<Path>) -> ConfigResult<PermissionIndex> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(ConfigError::DirectoryMissing {
            path: dir.to_path_buf(),
        });
    }

    let files = list_files(dir)?;
    let mut index = PermissionIndex::new();
    let mut entries = 0;
    for file in &files {
        let text = read_file(dir, file)?;
        let added = index.extend_from_str(&text, &file.display().to_string());
        debug!(file = %file.display(), entries = added, "Read allow-list file");
        entries += added;
    }

    info!(
        files = files.len(),
        entries,
        distinct = index.len(),
        "Loaded allow-list"
    );
    Ok(index)
}

/// Read one allow-list file. Bytes that are not UTF-8 are replaced, not rejected.
fn read_file(dir: &Path, file: &Path) -> ConfigResult<String> {
    let bytes = std::fs::read(file).map_err(|source| ConfigError::Read {
        path: dir.to_path_buf(),
        file: Some(file.to_path_buf()),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(err) => {
            warn!(
                file = %file.display(),
                offset = err.utf8_error().valid_up_to(),
                "Allow-list file is not valid UTF-8, replacing invalid bytes"
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

/// Regular files directly inside `dir`, sorted by path.
fn list_files(dir: &Path) -> ConfigResult<Vec<PathBuf>> {
    let read_error = |source| ConfigError::Read {
        path: dir.to_path_buf(),
        file: None,
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() {
            files.push(path);
        } else {
            debug!(path = %path.display(), "Ignoring non-file entry");
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pubapi_meta::MethodKey;

    #[test]
    fn test_load_reads_every_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("core.config"), "a.b.C m ()V\n").unwrap();
        std::fs::write(dir.path().join("web.config"), "a.b.C m2 ()V\n").unwrap();

        let index = load_config(dir.path()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.is_permitted("a.b.C", &MethodKey::new("m", "()V")));
        assert!(index.is_permitted("a.b.C", &MethodKey::new("m2", "()V")));
    }

    #[test]
    fn test_subdirectories_are_not_scanned() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("deep.config"), "a.b.C\n").unwrap();

        let index = load_config(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_empty_directory_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let index = load_config(dir.path()).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("notExistingDirectory");

        let err = load_config(&missing).unwrap_err();
        assert!(matches!(err, ConfigError::DirectoryMissing { .. }));
        assert!(err.to_string().contains("Config file directory doesn't exist"));
        assert!(err.to_string().contains("notExistingDirectory"));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settingsTest.txt");
        std::fs::write(&file, "a.b.C\n").unwrap();

        let err = load_config(&file).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Config file directory doesn't exist.Path=[{}]", file.display())
        );
    }

    #[test]
    fn test_non_utf8_bytes_do_not_reject_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut contents = b"# \x83\x65\x83\x58\x83\x67\n".to_vec();
        contents.extend_from_slice(b"a.b.C m ()V\n");
        std::fs::write(dir.path().join("sjis.config"), contents).unwrap();

        let index = load_config(dir.path()).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.is_permitted("a.b.C", &MethodKey::new("m", "()V")));
    }

    #[test]
    fn test_unreadable_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let vanished = dir.path().join("vanished.config");

        let err = read_file(dir.path(), &vanished).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_READ_ERROR");
        assert_eq!(
            err.to_string(),
            format!("Couldn't read config file. Path=[{}]", dir.path().display())
        );
        match err {
            ConfigError::Read { file, source, .. } => {
                assert_eq!(file.as_deref(), Some(vanished.as_path()));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
