// SPDX-License-Identifier: PMPL-1.0-or-later

//! Errors raised while loading a translation catalog.
//!
//! Everything above the reader (checks, reports, sweep, CLI) works with
//! `anyhow::Result`; this enum only covers the parts where a caller may want
//! to tell a malformed catalog apart from an unreadable file.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid {encoding}")]
    Encoding { path: PathBuf, encoding: &'static str },

    #[error("malformed XML at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("expected <TS> root element, found <{found}>")]
    UnexpectedRoot { found: String },

    #[error("document has no <TS> root element")]
    MissingRoot,

    #[error("<{parent}> at byte {position} has no <{element}> child")]
    MissingElement {
        parent: &'static str,
        element: &'static str,
        position: u64,
    },

    #[error("invalid value {value:?} for attribute `{attribute}` at byte {position}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
        position: u64,
    },

    #[error("unexpected <{element}> inside <{parent}> at byte {position}")]
    UnexpectedElement {
        parent: &'static str,
        element: String,
        position: u64,
    },

    #[error("document ended inside <{element}>")]
    UnexpectedEof { element: &'static str },
}

impl CatalogError {
    /// Byte offset into the document, when the error has one.
    pub fn position(&self) -> Option<u64> {
        match self {
            Self::Xml { position, .. }
            | Self::MissingElement { position, .. }
            | Self::InvalidAttribute { position, .. }
            | Self::UnexpectedElement { position, .. } => Some(*position),
            _ => None,
        }
    }
}
