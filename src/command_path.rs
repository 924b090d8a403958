//! Resolution of the external `ssh` binary used by the connection probe.

use once_cell::sync::OnceCell;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

#[cfg(unix)]
const EXECUTE_BITS: u32 = 0o111;
#[cfg(unix)]
const WORLD_WRITABLE_BIT: u32 = 0o002;

#[derive(Debug, Clone)]
struct CachedPathError {
    kind: io::ErrorKind,
    message: String,
}

static SSH_PATH: OnceCell<Result<PathBuf, CachedPathError>> = OnceCell::new();

/// Canonical path of `ssh` on `PATH`, looked up once per process.
pub fn ssh_path() -> io::Result<PathBuf> {
    let cached = SSH_PATH.get_or_init(|| {
        resolve_in_path("ssh").map_err(|err| CachedPathError {
            kind: err.kind(),
            message: err.to_string(),
        })
    });
    match cached {
        Ok(path) => Ok(path.clone()),
        Err(err) => Err(io::Error::new(err.kind, format!("ssh: {}", err.message))),
    }
}

/// Locate `binary` on `PATH` and check it is a usable executable.
pub fn resolve_in_path(binary: &str) -> io::Result<PathBuf> {
    let located = which::which(binary).map_err(|err| io::Error::new(io::ErrorKind::NotFound, format!("{binary} not found in PATH: {err}")))?;
    validate_executable_path(&located, binary)
}

pub(crate) fn validate_executable_path(path: &Path, label: &str) -> io::Result<PathBuf> {
    let canonical = fs::canonicalize(path).map_err(|err| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("unable to canonicalize {label} path '{}': {err}", path.display()),
        )
    })?;

    let metadata = fs::metadata(&canonical)?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{label} path '{}' is not a regular file", canonical.display()),
        ));
    }

    #[cfg(unix)]
    {
        let mode = metadata.permissions().mode();
        if mode & WORLD_WRITABLE_BIT != 0 {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{label} path '{}' is world-writable", canonical.display()),
            ));
        }
        if mode & EXECUTE_BITS == 0 {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{label} path '{}' is not executable", canonical.display()),
            ));
        }
    }

    Ok(canonical)
}

#[cfg(test)]
#[path = "test/command_path.rs"]
mod tests;
