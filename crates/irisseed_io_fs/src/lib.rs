//! `irisseed_io_fs`:
//! Filesystem copy engine used by the seeding tool.
//!
//! - `copy`   : tree traversal, tree copy and single-file copy
//! - `spec`   : per-entry and top-level errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use copy::{copy_file, copy_tree};
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{CopyTreeError, SpecCopyError};
