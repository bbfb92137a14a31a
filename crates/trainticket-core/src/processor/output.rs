//! Crash-safe, non-clobbering output writes.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// Suffix number of the first renamed copy (`name-2.pdf`).
const FIRST_COLLISION_NUMBER: u32 = 2;

/// `file_name` for `n <= 1`, otherwise `stem-n.ext`.
pub fn collision_name(file_name: &str, n: u32) -> String {
    if n < FIRST_COLLISION_NUMBER {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{file_name}-{n}"),
    }
}

/// Write `pdf` into `output_dir` under `file_name`, or the first free
/// `-2`, `-3`, … variant of it, and return the path written.
///
/// Data goes to a temporary file in `output_dir` first and is moved into
/// place only once it is complete; an existing file is never replaced.
pub fn write_pdf(output_dir: &Path, file_name: &str, pdf: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(output_dir).map_err(Error::io("failed to create output directory"))?;

    let mut tmp = NamedTempFile::new_in(output_dir).map_err(Error::io("failed to create temporary file"))?;
    tmp.write_all(pdf).map_err(Error::io("failed to write output file"))?;
    tmp.as_file().sync_all().map_err(Error::io("failed to write output file"))?;
    set_default_permissions(tmp.as_file())?;

    let mut n = 1;
    loop {
        let target = output_dir.join(collision_name(file_name, n));
        match tmp.persist_noclobber(&target) {
            Ok(_) => return Ok(target),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                debug!("{} exists, trying next suffix", target.display());
                tmp = err.file;
                n += 1;
            }
            Err(err) => {
                return Err(Error::Io {
                    context: "failed to write output file",
                    source: err.error,
                });
            }
        }
    }
}

#[cfg(unix)]
fn set_default_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
        .map_err(Error::io("failed to set output file permissions"))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}
