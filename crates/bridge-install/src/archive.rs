use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};

/// Extract the zip at `archive` into `dest`, keeping its internal layout.
///
/// Entries whose paths would land outside `dest` are rejected. Unix
/// permission bits stored in the archive are restored so bundled executables
/// stay executable.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(Error::io("open", archive))?;
    let mut zip = ZipArchive::new(file).map_err(|e| Error::Corrupted(e.to_string()))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| Error::Corrupted(e.to_string()))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| Error::UnsafeEntry(entry.name().to_string()))?;
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(Error::io("create directory", &out))?;
            continue;
        }

        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(Error::io("create directory", parent))?;
        }
        let mut writer = File::create(&out).map_err(Error::io("create", &out))?;
        io::copy(&mut entry, &mut writer).map_err(Error::io("extract", &out))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode))
                .map_err(Error::io("set permissions on", &out))?;
        }
    }

    debug!(archive = %archive.display(), dest = %dest.display(), entries = zip.len(), "archive extracted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::tempdir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        for (name, content) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_extract_nested_bundle() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("bundle.zip");
        write_zip(
            &archive,
            &[
                ("bridge-cli-bundle-1.0.0-linux64/", ""),
                ("bridge-cli-bundle-1.0.0-linux64/bridge-cli", "#!/bin/sh\n"),
                ("bridge-cli-bundle-1.0.0-linux64/adapters/coverity.jar", "jar"),
            ],
        );
        let dest = dir.path().join("out");

        extract_zip(&archive, &dest).unwrap();

        let root = dest.join("bridge-cli-bundle-1.0.0-linux64");
        assert_eq!(fs::read(root.join("bridge-cli")).unwrap(), b"#!/bin/sh\n");
        assert!(root.join("adapters/coverity.jar").is_file());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(root.join("bridge-cli")).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }

    #[test]
    fn test_reject_corrupt_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        fs::write(&archive, b"definitely not a zip").unwrap();

        let err = extract_zip(&archive, dir.path()).unwrap_err();

        assert!(matches!(err, Error::Corrupted(_)));
    }

    #[test]
    fn test_missing_archive() {
        let dir = tempdir().unwrap();
        let err = extract_zip(&dir.path().join("absent.zip"), dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io { action: "open", .. }));
    }
}
