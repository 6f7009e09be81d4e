//! Static classification tables and default paths.

/// File name of an IRIS database inside its directory.
pub const C_DATABASE_FILE_NAME: &str = "IRIS.DAT";

/// CPF section listing database name -> directory.
pub const C_CPF_SECTION_DATABASES: &str = "Databases";

/// Default operational trace file.
pub const C_LOG_FILE_DEFAULT: &str = "/tmp/copy-data.log";

/// Default filesystem root destinations are resolved under.
pub const C_ROOT_DIR_DEFAULT: &str = "/";

/// System databases that never receive a whole-directory copy.
pub const TUP_DATABASES_RESERVED: [&str; 8] = [
    "IRISSYS",
    "IRISLIB",
    "IRISTEMP",
    "IRISLOCALDATA",
    "IRISAUDIT",
    "ENSLIB",
    "HSLIB",
    "HSSYS",
];

/// Reserved databases whose `IRIS.DAT` is overwritten in place.
///
/// The remaining reserved names are shared libraries already shipped with the
/// instance and are left untouched.
pub const TUP_DATABASES_FILE_OVERWRITE: [&str; 5] =
    ["IRISSYS", "HSSYS", "IRISLOCALDATA", "IRISAUDIT", "IRISTEMP"];

/// Web application resources.
pub const TUP_FOLDERS_CSP: [&str; 1] = ["usr/irissys/csp"];

/// Embedded Python packages and interpreter bits.
pub const TUP_FOLDERS_PYTHON: [&str; 4] = [
    "usr/irissys/mgr/python",
    "usr/irissys/lib/python",
    "usr/local/lib/python3",
    "usr/local/bin",
];
