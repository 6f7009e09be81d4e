//! Folder replicator: mirrors auxiliary folders from the data directory onto
//! the filesystem root. Problems are logged and never abort the run.

use std::fmt;
use std::path::{Path, PathBuf};

use irisseed_io_fs::copy_tree;
use tracing::{error, info};

use crate::conf::{C_ROOT_DIR_DEFAULT, TUP_FOLDERS_CSP, TUP_FOLDERS_PYTHON};
use crate::materialize::resolve_under;

/// Folders handled by one replicator call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportReplicate {
    /// Folders copied without any per-entry error.
    pub replicated: Vec<String>,
    /// Folders absent from the data directory.
    pub missing: Vec<String>,
    /// Folders whose copy failed entirely or partially, with the first reason.
    pub failed: Vec<(String, String)>,
    /// Entries written across all folders.
    pub cnt_copied: u64,
}

impl ReportReplicate {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} replicated={} missing={} failed={} copied={}",
            self.replicated.len(),
            self.missing.len(),
            self.failed.len(),
            self.cnt_copied
        )
    }
}

impl fmt::Display for ReportReplicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[FOLDERS]"))
    }
}

/// Copies auxiliary folders from the data directory onto the root.
///
/// Each folder is merged into its destination; a folder missing from the data
/// directory or failing to copy is logged and recorded in the report.
#[derive(Debug, Clone)]
pub struct FolderReplicator {
    path_dir_data: PathBuf,
    path_dir_root: PathBuf,
}

impl FolderReplicator {
    /// Replicator reading folders from `dir_data`, writing under `/`.
    pub fn new<P: AsRef<Path>>(dir_data: P) -> Self {
        Self {
            path_dir_data: dir_data.as_ref().to_path_buf(),
            path_dir_root: PathBuf::from(C_ROOT_DIR_DEFAULT),
        }
    }

    /// Write folders under `dir_root` instead of `/`.
    pub fn with_root<P: AsRef<Path>>(mut self, dir_root: P) -> Self {
        self.path_dir_root = dir_root.as_ref().to_path_buf();
        self
    }

    /// Web application resources.
    pub fn replicate_csp(&self) -> ReportReplicate {
        self.replicate(&TUP_FOLDERS_CSP)
    }

    /// Embedded Python folders.
    pub fn replicate_python(&self) -> ReportReplicate {
        self.replicate(&TUP_FOLDERS_PYTHON)
    }

    /// Copy each `data_dir/folder` onto `root/folder`, in order.
    ///
    /// A leading separator on `folder` is ignored.
    pub fn replicate<S: AsRef<str>>(&self, folders: &[S]) -> ReportReplicate {
        let mut report = ReportReplicate::default();
        for folder in folders {
            self.replicate_folder(folder.as_ref(), &mut report);
        }
        info!("{report}");
        report
    }

    fn replicate_folder(&self, folder: &str, report: &mut ReportReplicate) {
        let path_folder = Path::new(folder);
        let path_dir_src = resolve_under(&self.path_dir_data, path_folder);
        let path_dir_dst = resolve_under(&self.path_dir_root, path_folder);

        if !path_dir_src.exists() {
            error!("folder {} does not exist, skipped", path_dir_src.display());
            report.missing.push(folder.to_string());
            return;
        }

        info!(
            "copying folder {} to {}",
            path_dir_src.display(),
            path_dir_dst.display()
        );
        let report_copy = match copy_tree(&path_dir_src, &path_dir_dst) {
            Ok(v) => v,
            Err(e) => {
                error!("folder {folder}: {e}");
                report.failed.push((folder.to_string(), e.to_string()));
                return;
            }
        };

        report.cnt_copied += report_copy.cnt_copied;
        for warning in &report_copy.warnings {
            info!("folder {folder}: {warning}");
        }
        if let Some(spec_error) = report_copy.errors.first() {
            for spec_error in &report_copy.errors {
                error!("folder {folder}: {spec_error}");
            }
            report
                .failed
                .push((folder.to_string(), spec_error.to_string()));
            return;
        }
        info!("folder {folder}: {}", report_copy.format("[COPY]"));
        report.replicated.push(folder.to_string());
    }
}
