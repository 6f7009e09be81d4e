//! Database materializer: copies each configured database from the data
//! directory into the instance layout.
//!
//! Non-reserved databases are merged directory-wise; system databases only get
//! their `IRIS.DAT` overwritten; shared library databases are left alone. Any
//! failure aborts the run.

use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};

use irisseed_io_fs::{copy_file, copy_tree};
use tracing::{error, info};

use crate::conf::{C_DATABASE_FILE_NAME, C_ROOT_DIR_DEFAULT};
use crate::error::MaterializeError;
use crate::policy::{EnumDatabaseAction, SpecDatabasePolicy};

/// One `[Databases]` line: logical name and configured directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDatabaseEntry {
    /// Logical database name as spelled in the file.
    pub name: String,
    /// `None` when the configuration line carried no value.
    pub path_destination: Option<String>,
}

impl SpecDatabaseEntry {
    /// Entry with a configured directory.
    pub fn new(name: &str, path_destination: &str) -> Self {
        Self {
            name: name.to_string(),
            path_destination: Some(path_destination.to_string()),
        }
    }
}

/// What happened to one database entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMaterializeOutcome {
    /// Logical database name.
    pub name: String,
    /// Action chosen by the classification policy.
    pub action: EnumDatabaseAction,
    /// Directory under the data directory.
    pub path_source: PathBuf,
    /// Directory under the root.
    pub path_destination: PathBuf,
    /// Files, links and directories written.
    pub cnt_copied: u64,
}

/// Per-entry outcomes of one materializer run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportMaterialize {
    /// Processed entries, in configuration order.
    pub outcomes: Vec<SpecMaterializeOutcome>,
    /// Entries skipped because they name no directory.
    pub names_without_path: Vec<String>,
}

impl ReportMaterialize {
    /// Number of entries that took `action`.
    pub fn count_action(&self, action: EnumDatabaseAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    /// Entries written across all databases.
    pub fn cnt_copied(&self) -> u64 {
        self.outcomes.iter().map(|o| o.cnt_copied).sum()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} databases={} copy_tree={} overwrite_file={} skip={} no_path={} copied={}",
            self.outcomes.len() + self.names_without_path.len(),
            self.count_action(EnumDatabaseAction::CopyTree),
            self.count_action(EnumDatabaseAction::OverwriteFile),
            self.count_action(EnumDatabaseAction::Skip),
            self.names_without_path.len(),
            self.cnt_copied()
        )
    }
}

impl fmt::Display for ReportMaterialize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[DATABASES]"))
    }
}

/// Join `path` under `path_base`, dropping its root and any drive prefix.
///
/// `/usr/irissys/mgr/user` under `/data` becomes `/data/usr/irissys/mgr/user`.
/// Relative paths are joined as they are.
pub fn resolve_under(path_base: &Path, path: &Path) -> PathBuf {
    let path_rel: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    path_base.join(path_rel)
}

/// Copies databases listed in the instance configuration.
#[derive(Debug, Clone)]
pub struct DatabaseMaterializer {
    path_dir_data: PathBuf,
    path_dir_root: PathBuf,
    policy: SpecDatabasePolicy,
}

impl DatabaseMaterializer {
    /// Materializer reading sources from `dir_data`, writing under `/`.
    pub fn new<P: AsRef<Path>>(dir_data: P) -> Self {
        Self {
            path_dir_data: dir_data.as_ref().to_path_buf(),
            path_dir_root: PathBuf::from(C_ROOT_DIR_DEFAULT),
            policy: SpecDatabasePolicy::default(),
        }
    }

    /// Resolve configured destinations under `dir_root` instead of `/`.
    pub fn with_root<P: AsRef<Path>>(mut self, dir_root: P) -> Self {
        self.path_dir_root = dir_root.as_ref().to_path_buf();
        self
    }

    /// Replace the default classification.
    pub fn with_policy(mut self, policy: SpecDatabasePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process every entry in order, stopping at the first failure.
    pub fn materialize(
        &self,
        entries: &[SpecDatabaseEntry],
    ) -> Result<ReportMaterialize, MaterializeError> {
        let mut report = ReportMaterialize::default();
        for entry in entries {
            let Some(c_path_destination) = entry
                .path_destination
                .as_deref()
                .filter(|p| !p.trim().is_empty())
            else {
                error!("database {} has no directory, skipped", entry.name);
                report.names_without_path.push(entry.name.clone());
                continue;
            };
            let outcome = self.materialize_entry(&entry.name, c_path_destination)?;
            report.outcomes.push(outcome);
        }
        info!("{report}");
        Ok(report)
    }

    /// Copy one database.
    ///
    /// The destination directory is created first, whatever the action; the
    /// source is not checked beforehand so a missing one fails in the copy.
    pub fn materialize_entry(
        &self,
        name: &str,
        path_destination: &str,
    ) -> Result<SpecMaterializeOutcome, MaterializeError> {
        let path_configured = Path::new(path_destination);
        let path_dir_dst = resolve_under(&self.path_dir_root, path_configured);
        let path_dir_src = resolve_under(&self.path_dir_data, path_configured);
        info!(
            "database {name}: source {} destination {}",
            path_dir_src.display(),
            path_dir_dst.display()
        );

        if !path_dir_dst.exists() {
            info!("creating directory {}", path_dir_dst.display());
            fs::create_dir_all(&path_dir_dst).map_err(|source| {
                MaterializeError::CreateDestination {
                    path: path_dir_dst.clone(),
                    source,
                }
            })?;
        }

        let action = self.policy.classify(name);
        let cnt_copied = match action {
            EnumDatabaseAction::CopyTree => {
                self.copy_database_tree(name, &path_dir_src, &path_dir_dst)?
            }
            EnumDatabaseAction::OverwriteFile => {
                self.copy_database_file(name, &path_dir_src, &path_dir_dst)?
            }
            EnumDatabaseAction::Skip => {
                info!("database {name} is a shared system database, nothing copied");
                0
            }
        };

        Ok(SpecMaterializeOutcome {
            name: name.to_string(),
            action,
            path_source: path_dir_src,
            path_destination: path_dir_dst,
            cnt_copied,
        })
    }

    fn copy_database_tree(
        &self,
        name: &str,
        path_dir_src: &Path,
        path_dir_dst: &Path,
    ) -> Result<u64, MaterializeError> {
        info!(
            "copying directory {} to {}",
            path_dir_src.display(),
            path_dir_dst.display()
        );
        let report =
            copy_tree(path_dir_src, path_dir_dst).map_err(|source| MaterializeError::CopyTree {
                name: name.to_string(),
                source,
            })?;
        for warning in &report.warnings {
            info!("database {name}: {warning}");
        }
        if !report.is_clean() {
            for spec_error in &report.errors {
                error!("database {name}: {spec_error}");
            }
            return Err(MaterializeError::CopyEntries {
                name: name.to_string(),
                errors: report.errors,
            });
        }
        info!("database {name}: {}", report.format("[COPY]"));
        Ok(report.cnt_copied)
    }

    fn copy_database_file(
        &self,
        name: &str,
        path_dir_src: &Path,
        path_dir_dst: &Path,
    ) -> Result<u64, MaterializeError> {
        let path_file_src = path_dir_src.join(C_DATABASE_FILE_NAME);
        let path_file_dst = path_dir_dst.join(C_DATABASE_FILE_NAME);
        info!(
            "copying file {} to {}",
            path_file_src.display(),
            path_file_dst.display()
        );
        copy_file(&path_file_src, &path_file_dst).map_err(|source| {
            MaterializeError::CopyFile {
                name: name.to_string(),
                path: path_file_src.clone(),
                source,
            }
        })?;
        Ok(1)
    }
}
