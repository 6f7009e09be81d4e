//! Database name classification.

use std::collections::BTreeSet;
use std::fmt;

use crate::conf::{TUP_DATABASES_FILE_OVERWRITE, TUP_DATABASES_RESERVED};

/// What the materializer does for one database entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumDatabaseAction {
    /// Merge the whole source directory into the destination.
    CopyTree,
    /// Overwrite only the database file.
    OverwriteFile,
    /// Reserved shared database; nothing is copied.
    Skip,
}

impl fmt::Display for EnumDatabaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c_name = match self {
            Self::CopyTree => "copy-tree",
            Self::OverwriteFile => "overwrite-file",
            Self::Skip => "skip",
        };
        write!(f, "{c_name}")
    }
}

/// Classification table for database names.
///
/// Names are stored uppercase and looked up case-insensitively. A name listed
/// in `set_file_overwrite` but not in `set_reserved` is still treated as a
/// file overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDatabasePolicy {
    set_reserved: BTreeSet<String>,
    set_file_overwrite: BTreeSet<String>,
}

impl Default for SpecDatabasePolicy {
    fn default() -> Self {
        Self::new(TUP_DATABASES_RESERVED, TUP_DATABASES_FILE_OVERWRITE)
    }
}

impl SpecDatabasePolicy {
    /// Build a policy from reserved names and the file-overwrite subset.
    pub fn new<I, J, S, T>(names_reserved: I, names_file_overwrite: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            set_reserved: names_reserved
                .into_iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
            set_file_overwrite: names_file_overwrite
                .into_iter()
                .map(|s| s.as_ref().to_uppercase())
                .collect(),
        }
    }

    /// Add a reserved name that is skipped.
    pub fn with_reserved(mut self, name: &str) -> Self {
        self.set_reserved.insert(name.to_uppercase());
        self
    }

    /// Add a reserved name whose database file is overwritten.
    pub fn with_file_overwrite(mut self, name: &str) -> Self {
        let c_name = name.to_uppercase();
        self.set_reserved.insert(c_name.clone());
        self.set_file_overwrite.insert(c_name);
        self
    }

    /// Action for database `name`; unlisted names get a full tree copy.
    pub fn classify(&self, name: &str) -> EnumDatabaseAction {
        let c_name = name.to_uppercase();
        if self.set_file_overwrite.contains(&c_name) {
            EnumDatabaseAction::OverwriteFile
        } else if self.set_reserved.contains(&c_name) {
            EnumDatabaseAction::Skip
        } else {
            EnumDatabaseAction::CopyTree
        }
    }
}
