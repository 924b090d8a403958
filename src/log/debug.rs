//! Debug log file sink.
//!
//! Entries go to `~/.sshm/logs/sshm.log` unless another path was set first.
//! The file is opened on the first entry and kept private to the user.

use super::{LogError, LogLevel, formatter::LogFormatter};
use crate::utils::lock_recovering;
use std::{
    fs::{self, File, OpenOptions},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

const FLUSH_THRESHOLD_BYTES: usize = 16 * 1024;
#[cfg(unix)]
const PRIVATE_DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const PRIVATE_FILE_MODE: u32 = 0o600;

struct OpenLog {
    writer: BufWriter<File>,
    unflushed: usize,
}

pub(super) struct DebugLogger {
    path: Mutex<Option<PathBuf>>,
    file: Mutex<Option<OpenLog>>,
}

impl DebugLogger {
    pub(super) fn new() -> Self {
        Self {
            path: Mutex::new(None),
            file: Mutex::new(None),
        }
    }

    pub(super) fn set_log_path(&self, path: PathBuf) {
        *lock_recovering(&self.path) = Some(path);
    }

    pub(super) fn log(&self, level: LogLevel, message: &str) -> Result<(), LogError> {
        let mut file = lock_recovering(&self.file);
        if file.is_none() {
            *file = Some(self.open()?);
        }
        let Some(log) = file.as_mut() else {
            return Ok(());
        };

        let line = LogFormatter.format(level, message);
        writeln!(log.writer, "{line}")?;
        log.unflushed += line.len() + 1;

        // Warnings and errors hit the disk right away.
        if should_flush(level, log.unflushed) {
            log.writer.flush()?;
            log.unflushed = 0;
        }
        Ok(())
    }

    pub(super) fn flush(&self) -> Result<(), LogError> {
        if let Some(log) = lock_recovering(&self.file).as_mut() {
            log.writer.flush()?;
            log.unflushed = 0;
        }
        Ok(())
    }

    fn open(&self) -> Result<OpenLog, LogError> {
        let path = match lock_recovering(&self.path).clone() {
            Some(path) => path,
            None => default_log_path()?,
        };
        if let Some(parent) = path.parent() {
            create_private_directory(parent)?;
        }
        Ok(OpenLog {
            writer: BufWriter::new(open_private_append_file(&path)?),
            unflushed: 0,
        })
    }
}

fn default_log_path() -> Result<PathBuf, LogError> {
    let home = dirs::home_dir().ok_or(LogError::HomeDirUnavailable)?;
    Ok(home.join(".sshm").join("logs").join("sshm.log"))
}

fn should_flush(level: LogLevel, unflushed: usize) -> bool {
    matches!(level, LogLevel::Warning | LogLevel::Error) || unflushed >= FLUSH_THRESHOLD_BYTES
}

fn create_private_directory(path: &Path) -> Result<(), LogError> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_DIR_MODE))?;
    Ok(())
}

fn open_private_append_file(path: &Path) -> Result<File, LogError> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(PRIVATE_FILE_MODE);
    let file = options.open(path)?;
    // `mode` only applies to newly created files
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(PRIVATE_FILE_MODE))?;
    Ok(file)
}

#[cfg(test)]
#[path = "../test/log/debug.rs"]
mod tests;
