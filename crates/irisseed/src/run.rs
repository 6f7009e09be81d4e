//! One complete seeding run: databases first, then auxiliary folders.

use std::path::PathBuf;

use tracing::info;

use crate::conf::C_ROOT_DIR_DEFAULT;
use crate::cpf::read_database_entries;
use crate::error::SeedError;
use crate::materialize::{DatabaseMaterializer, ReportMaterialize};
use crate::policy::SpecDatabasePolicy;
use crate::replicate::{FolderReplicator, ReportReplicate};

/// Inputs of a seeding run.
#[derive(Debug, Clone)]
pub struct SpecSeedOptions {
    /// Instance configuration listing the databases.
    pub path_cpf: PathBuf,
    /// Staging directory holding the files to deploy.
    pub path_dir_data: PathBuf,
    /// Filesystem root destinations are resolved under.
    pub path_dir_root: PathBuf,
    /// Replicate the web application resources.
    pub if_csp: bool,
    /// Replicate the embedded Python folders.
    pub if_python: bool,
    /// Extra folders to replicate, relative to the data directory.
    pub folders_other: Vec<String>,
    /// Database name classification.
    pub policy: SpecDatabasePolicy,
}

impl SpecSeedOptions {
    /// Databases only, written under `/` with the default classification.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(path_cpf: P, path_dir_data: Q) -> Self {
        Self {
            path_cpf: path_cpf.into(),
            path_dir_data: path_dir_data.into(),
            path_dir_root: PathBuf::from(C_ROOT_DIR_DEFAULT),
            if_csp: false,
            if_python: false,
            folders_other: Vec::new(),
            policy: SpecDatabasePolicy::default(),
        }
    }
}

/// Reports of every stage that ran.
#[derive(Debug, Clone, Default)]
pub struct ReportSeed {
    /// Database materializer outcomes.
    pub databases: ReportMaterialize,
    /// Web resources, when requested.
    pub csp: Option<ReportReplicate>,
    /// Embedded Python folders, when requested.
    pub python: Option<ReportReplicate>,
    /// Extra folders, when any were given.
    pub other: Option<ReportReplicate>,
}

/// Materialize databases, then replicate the requested folders.
///
/// Only configuration and database failures are returned; folder problems end
/// up in the folder reports and the log.
pub fn seed(spec_seed_options: &SpecSeedOptions) -> Result<ReportSeed, SeedError> {
    info!(
        "seeding from {} using {}",
        spec_seed_options.path_dir_data.display(),
        spec_seed_options.path_cpf.display()
    );

    let entries = read_database_entries(&spec_seed_options.path_cpf)?;
    let materializer = DatabaseMaterializer::new(&spec_seed_options.path_dir_data)
        .with_root(&spec_seed_options.path_dir_root)
        .with_policy(spec_seed_options.policy.clone());
    let mut report = ReportSeed {
        databases: materializer.materialize(&entries)?,
        ..ReportSeed::default()
    };

    let replicator = FolderReplicator::new(&spec_seed_options.path_dir_data)
        .with_root(&spec_seed_options.path_dir_root);
    if spec_seed_options.if_csp {
        report.csp = Some(replicator.replicate_csp());
    }
    if spec_seed_options.if_python {
        report.python = Some(replicator.replicate_python());
    }
    if !spec_seed_options.folders_other.is_empty() {
        report.other = Some(replicator.replicate(&spec_seed_options.folders_other));
    }
    Ok(report)
}
