use std::path::Path;

use snafu::ResultExt;

use crate::platform::{Error, error};

/// Packs the content of `directory` into an uncompressed tar archive, the
/// input format of binary builds.
///
/// Entries are stored relative to `directory`, without a leading `./`.
/// Symbolic links are archived as links.
///
/// # Errors
///
/// Returns an error if the directory or any file below it cannot be read.
pub fn archive_directory(directory: &Path) -> Result<Vec<u8>, Error> {
    let mut builder = tar::Builder::new(Vec::new());
    builder.follow_symlinks(false);
    builder
        .append_dir_all("", directory)
        .with_context(|_| error::ArchiveDirectorySnafu { directory: directory.to_path_buf() })?;
    builder
        .into_inner()
        .with_context(|_| error::ArchiveDirectorySnafu { directory: directory.to_path_buf() })
}

#[cfg(test)]
mod tests {
    use std::{io::Read, path::PathBuf};

    use super::*;

    #[test]
    fn test_archive_contains_directory_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("server.js"), "console.log('hello');").unwrap();
        std::fs::create_dir(dir.path().join("views")).unwrap();
        std::fs::write(dir.path().join("views").join("index.html"), "<h1>hi</h1>").unwrap();

        let data = archive_directory(dir.path()).unwrap();
        let mut archive = tar::Archive::new(data.as_slice());

        let mut files = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.header().entry_type().is_file() {
                let path = entry.path().unwrap().into_owned();
                let mut content = String::new();
                let _size = entry.read_to_string(&mut content).unwrap();
                files.push((path, content));
            }
        }
        files.sort();

        assert_eq!(
            files,
            vec![
                (PathBuf::from("server.js"), "console.log('hello');".to_string()),
                (PathBuf::from("views/index.html"), "<h1>hi</h1>".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = archive_directory(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::ArchiveDirectory { .. }));
    }
}
