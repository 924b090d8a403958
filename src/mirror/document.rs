//! Loading and storing one mirror document.

use super::MirrorError;
use super::xml::{XmlElement, parse_document, to_document_string};
use crate::utils;
use std::io;
use std::path::Path;

/// Root element of the document at `path`; `None` when the file does not exist.
pub(crate) fn load(path: &Path) -> Result<Option<XmlElement>, MirrorError> {
    let Some(content) = utils::read_optional(path).map_err(|err| MirrorError::io(path, err))? else {
        return Ok(None);
    };

    parse_document(&content).map(Some).map_err(|message| MirrorError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub(crate) fn save(path: &Path, root: &XmlElement) -> Result<(), MirrorError> {
    let content = to_document_string(root).map_err(|message| MirrorError::io(path, io::Error::other(message)))?;
    utils::write_atomic(path, &content).map_err(|err| MirrorError::io(path, err))
}

pub(crate) fn delete(path: &Path) -> Result<bool, MirrorError> {
    utils::remove_if_exists(path).map_err(|err| MirrorError::io(path, err))
}
