use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use irisseed::conf::{C_LOG_FILE_DEFAULT, C_ROOT_DIR_DEFAULT};
use irisseed::logging::init_logging;
use irisseed::{SpecDatabasePolicy, SpecSeedOptions, seed};

/// Copy database and auxiliary files from a data directory into an IRIS instance.
///
/// Every database listed in the [Databases] section of the instance configuration
/// is copied from the same path under the data directory. System databases only
/// get their IRIS.DAT replaced and shared library databases are left alone.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    /// Instance configuration file (iris.cpf).
    #[arg(short, long, value_name = "path", env = "IRISSEED_CPF")]
    cpf: PathBuf,

    /// Directory holding the files to deploy, laid out like the filesystem root.
    #[arg(short, long, value_name = "path", env = "IRISSEED_DATA_DIR")]
    data_dir: PathBuf,

    /// Also copy the web application resources folder.
    #[arg(long)]
    csp: bool,

    /// Also copy the embedded Python folders.
    #[arg(short, long)]
    python: bool,

    /// Extra folder to copy, relative to the data directory. May be repeated.
    #[arg(short, long, value_name = "folder")]
    other: Vec<String>,

    /// Filesystem root destinations are resolved under.
    #[arg(long, value_name = "path", default_value = C_ROOT_DIR_DEFAULT)]
    root: PathBuf,

    /// Operational trace file.
    #[arg(long, value_name = "path", default_value = C_LOG_FILE_DEFAULT)]
    log_file: PathBuf,

    /// Logging level filters, e.g., info, error, etc ...
    #[arg(short, long, default_value = "info")]
    logging: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guards = init_logging(&cli.log_file, &cli.logging)
        .with_context(|| format!("initializing log file {}", cli.log_file.display()))?;

    let spec_seed_options = SpecSeedOptions {
        path_cpf: cli.cpf,
        path_dir_data: cli.data_dir,
        path_dir_root: cli.root,
        if_csp: cli.csp,
        if_python: cli.python,
        folders_other: cli.other,
        policy: SpecDatabasePolicy::default(),
    };
    let report = seed(&spec_seed_options).context("seeding failed")?;

    info!("{}", report.databases);
    for report_folders in [&report.csp, &report.python, &report.other]
        .into_iter()
        .flatten()
    {
        info!("{report_folders}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_repeated_folders() {
        let cli = Cli::try_parse_from([
            "irisseed",
            "-c",
            "/usr/irissys/iris.cpf",
            "-d",
            "/data",
            "--csp",
            "-o",
            "/opt/app",
            "--other",
            "usr/local/share",
        ])
        .expect("parse");
        assert!(cli.csp);
        assert!(!cli.python);
        assert_eq!(cli.other, ["/opt/app", "usr/local/share"]);
        assert_eq!(cli.root.to_str(), Some("/"));
        assert_eq!(cli.log_file.to_str(), Some("/tmp/copy-data.log"));
    }

    #[test]
    fn cli_requires_cpf_and_data_dir() {
        let cmd = Cli::command();
        for (c_id, c_env) in [("cpf", "IRISSEED_CPF"), ("data_dir", "IRISSEED_DATA_DIR")] {
            let arg = cmd
                .get_arguments()
                .find(|a| a.get_id() == c_id)
                .expect("argument defined");
            assert!(arg.is_required_set(), "{c_id}");
            assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(c_env)), "{c_id}");
        }
    }
}
