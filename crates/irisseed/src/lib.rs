//! `irisseed`:
//! Seeds an IRIS instance directory layout from a staging data directory.
//!
//! - `conf`        : classification tables and default paths
//! - `policy`      : database name classification
//! - `cpf`         : `[Databases]` reader for the instance configuration
//! - `materialize` : per-database copy (fatal on failure)
//! - `replicate`   : auxiliary folder copy (logged on failure)
//! - `run`         : full seeding run
//! - `error`       : fatal error types
//! - `logging`     : file + console subscriber

pub mod conf;
pub mod cpf;
pub mod error;
pub mod logging;
pub mod materialize;
pub mod policy;
pub mod replicate;
pub mod run;

pub use cpf::read_database_entries;
pub use error::{CpfError, MaterializeError, SeedError};
pub use materialize::{DatabaseMaterializer, ReportMaterialize, SpecDatabaseEntry};
pub use policy::{EnumDatabaseAction, SpecDatabasePolicy};
pub use replicate::{FolderReplicator, ReportReplicate};
pub use run::{ReportSeed, SpecSeedOptions, seed};
