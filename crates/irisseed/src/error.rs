//! Error types for the seeding library.
//!
//! Configuration and database errors abort a run; folder replication never
//! produces one.

use std::io;
use std::path::PathBuf;

use irisseed_io_fs::{CopyTreeError, SpecCopyError};
use thiserror::Error;

/// Failures reading the instance configuration file.
#[derive(Debug, Error)]
pub enum CpfError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse configuration file {path}: {message}")]
    Parse {
        /// Configuration file path.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    #[error("section [{section}] not found in configuration file")]
    SectionNotFound {
        /// Section name as looked up.
        section: String,
    },
}

/// Failures that abort database materialization.
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("failed to create destination directory {path}: {source}")]
    CreateDestination {
        /// Destination directory.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy database {name}: {source}")]
    CopyTree {
        /// Database name.
        name: String,
        #[source]
        source: CopyTreeError,
    },

    #[error("failed to copy database {name}: {} entries failed, first: {}", .errors.len(), first_error(.errors))]
    CopyEntries {
        /// Database name.
        name: String,
        /// Every entry that failed, in walk order.
        errors: Vec<SpecCopyError>,
    },

    #[error("failed to copy database file for {name} from {path}: {source}")]
    CopyFile {
        /// Database name.
        name: String,
        /// Source database file.
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn first_error(errors: &[SpecCopyError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Failures that end a seeding run.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Cpf(#[from] CpfError),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),
}
