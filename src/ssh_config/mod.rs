//! SSH config tree model: reading host blocks, rewriting them and keeping the
//! `Include` directive for per-project host files in place.
//!
//! The tree is one main file (usually `~/.ssh/config`) plus an include
//! directory holding one subdirectory per project and one file per host:
//!
//! ```text
//! ~/.ssh/config                 Include conf.d/*/*
//! ~/.ssh/conf.d/funrize/alpha   Host alpha ...
//! ```
//!
//! Per-host files carry their own `Host <name>` header, byte-identical to a
//! block in the main file. The file name always equals the host name.

mod block;
mod errors;
mod gateway;
mod include;
mod model;
mod parser;
mod path;
mod validate;
mod writer;

pub use block::serialize_block;
pub use errors::{SshConfigError, ValidationError};
pub use gateway::{GatewayOutcome, GatewaySpec, ensure_gateway, gateway_record};
pub use model::{HostRecord, HostScope, SourceLocation};
pub use parser::{find_duplicate_names, find_host, parse_config_str, read_hosts};
pub use path::{expand_tilde, get_default_include_dir, get_default_ssh_config_path};
pub use validate::{ensure_name_available, validate_host_name, validate_identity_file, validate_port, validate_project_name};
pub use writer::{duplicate, ensure_include, remove, remove_host, rename, upsert};

use std::path::{Path, PathBuf};

/// Location of the main config file and the per-project include directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    main_file: PathBuf,
    include_dir: PathBuf,
}

impl ConfigTree {
    pub fn new(main_file: impl Into<PathBuf>, include_dir: impl Into<PathBuf>) -> Self {
        Self {
            main_file: main_file.into(),
            include_dir: include_dir.into(),
        }
    }

    /// Tree rooted at `~/.ssh/config` with `~/.ssh/conf.d` as include directory.
    pub fn from_home() -> Result<Self, SshConfigError> {
        let main_file = get_default_ssh_config_path().ok_or(SshConfigError::HomeDirUnavailable)?;
        let include_dir = get_default_include_dir().ok_or(SshConfigError::HomeDirUnavailable)?;
        Ok(Self::new(main_file, include_dir))
    }

    pub fn main_file(&self) -> &Path {
        &self.main_file
    }

    pub fn include_dir(&self) -> &Path {
        &self.include_dir
    }

    /// Directory holding the host files of `project` (project names are stored lowercased).
    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.include_dir.join(project.to_lowercase())
    }

    pub fn project_host_file(&self, project: &str, host_name: &str) -> PathBuf {
        self.project_dir(project).join(host_name)
    }
}
