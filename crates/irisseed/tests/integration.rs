use std::path::{Path, PathBuf};
use std::process::Command;

use irisseed::{EnumDatabaseAction, SeedError, SpecSeedOptions, seed};
use tempfile::TempDir;

fn write_text(path: &Path, txt: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, txt).expect("write text");
}

fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).expect("read text")
}

struct Fixture {
    _tmp: TempDir,
    cpf: PathBuf,
    data: PathBuf,
    root: PathBuf,
}

/// Staged data for a small instance: one user database, two system databases,
/// one shared library database, web resources and one Python folder.
fn fixture() -> Fixture {
    let tmp = TempDir::new().expect("tempdir");
    let cpf = tmp.path().join("iris.cpf");
    let data = tmp.path().join("data");
    let root = tmp.path().join("root");

    write_text(
        &cpf,
        "[ConfigFile]\nProduct=IRIS\n\n[Databases]\n\
         IRISSYS=/usr/irissys/mgr/\n\
         IRISLIB=/usr/irissys/mgr/irislib/\n\
         IRISAUDIT=/usr/irissys/mgr/irisaudit/\n\
         USER=/usr/irissys/mgr/user/\n\n\
         [Namespaces]\nUSER=USER\n",
    );

    write_text(&data.join("usr/irissys/mgr/IRIS.DAT"), "sys-new");
    write_text(&data.join("usr/irissys/mgr/messages.log"), "not copied");
    write_text(&data.join("usr/irissys/mgr/irisaudit/IRIS.DAT"), "audit-new");
    write_text(&data.join("usr/irissys/mgr/irislib/IRIS.DAT"), "lib-new");
    write_text(&data.join("usr/irissys/mgr/user/IRIS.DAT"), "user-new");
    write_text(&data.join("usr/irissys/mgr/user/stream/a.stream"), "stream");
    write_text(&data.join("usr/irissys/csp/user/index.csp"), "csp");
    write_text(&data.join("usr/irissys/mgr/python/pkg/__init__.py"), "py");

    write_text(&root.join("usr/irissys/mgr/IRIS.DAT"), "sys-old");
    write_text(&root.join("usr/irissys/mgr/iris.cpf"), "live");
    write_text(&root.join("usr/irissys/mgr/irislib/IRIS.DAT"), "lib-old");

    Fixture {
        _tmp: tmp,
        cpf,
        data,
        root,
    }
}

#[test]
fn seed_applies_each_database_action() {
    let fx = fixture();
    let spec_seed_options = SpecSeedOptions {
        path_dir_root: fx.root.clone(),
        ..SpecSeedOptions::new(&fx.cpf, &fx.data)
    };

    let report = seed(&spec_seed_options).expect("seed");

    let l_actions: Vec<(&str, EnumDatabaseAction)> = report
        .databases
        .outcomes
        .iter()
        .map(|o| (o.name.as_str(), o.action))
        .collect();
    assert_eq!(
        l_actions,
        [
            ("IRISSYS", EnumDatabaseAction::OverwriteFile),
            ("IRISLIB", EnumDatabaseAction::Skip),
            ("IRISAUDIT", EnumDatabaseAction::OverwriteFile),
            ("USER", EnumDatabaseAction::CopyTree),
        ]
    );

    let mgr = fx.root.join("usr/irissys/mgr");
    assert_eq!(read_text(&mgr.join("IRIS.DAT")), "sys-new");
    assert_eq!(read_text(&mgr.join("iris.cpf")), "live");
    assert!(!mgr.join("messages.log").exists());
    assert_eq!(read_text(&mgr.join("irislib/IRIS.DAT")), "lib-old");
    assert_eq!(read_text(&mgr.join("irisaudit/IRIS.DAT")), "audit-new");
    assert_eq!(read_text(&mgr.join("user/IRIS.DAT")), "user-new");
    assert_eq!(read_text(&mgr.join("user/stream/a.stream")), "stream");

    assert!(report.csp.is_none());
    assert!(report.python.is_none());
    assert!(report.other.is_none());
}

#[test]
fn seed_replicates_requested_folders() {
    let fx = fixture();
    let spec_seed_options = SpecSeedOptions {
        path_dir_root: fx.root.clone(),
        if_csp: true,
        if_python: true,
        folders_other: vec!["/opt/absent".to_string()],
        ..SpecSeedOptions::new(&fx.cpf, &fx.data)
    };

    let report = seed(&spec_seed_options).expect("seed");

    let report_csp = report.csp.expect("csp report");
    assert_eq!(report_csp.replicated, ["usr/irissys/csp"]);
    assert!(fx.root.join("usr/irissys/csp/user/index.csp").exists());

    let report_python = report.python.expect("python report");
    assert_eq!(report_python.replicated, ["usr/irissys/mgr/python"]);
    assert!(fx.root.join("usr/irissys/mgr/python/pkg/__init__.py").exists());

    let report_other = report.other.expect("other report");
    assert_eq!(report_other.missing, ["/opt/absent"]);
}

#[test]
fn seed_is_repeatable() {
    let fx = fixture();
    let spec_seed_options = SpecSeedOptions {
        path_dir_root: fx.root.clone(),
        if_csp: true,
        ..SpecSeedOptions::new(&fx.cpf, &fx.data)
    };

    seed(&spec_seed_options).expect("first seed");
    seed(&spec_seed_options).expect("second seed");
    assert_eq!(
        read_text(&fx.root.join("usr/irissys/mgr/user/IRIS.DAT")),
        "user-new"
    );
}

#[test]
fn seed_fails_on_missing_database_source() {
    let fx = fixture();
    std::fs::remove_dir_all(fx.data.join("usr/irissys/mgr/user")).expect("remove user");
    let spec_seed_options = SpecSeedOptions {
        path_dir_root: fx.root.clone(),
        if_csp: true,
        ..SpecSeedOptions::new(&fx.cpf, &fx.data)
    };

    let err = seed(&spec_seed_options).expect_err("must fail");
    assert!(matches!(err, SeedError::Materialize(_)));
    // Folders are never reached after a database failure.
    assert!(!fx.root.join("usr/irissys/csp").exists());
}

#[test]
fn seed_fails_without_databases_section() {
    let fx = fixture();
    write_text(&fx.cpf, "[ConfigFile]\nProduct=IRIS\n");
    let spec_seed_options = SpecSeedOptions {
        path_dir_root: fx.root.clone(),
        ..SpecSeedOptions::new(&fx.cpf, &fx.data)
    };

    let err = seed(&spec_seed_options).expect_err("must fail");
    assert!(matches!(err, SeedError::Cpf(_)));
}

#[test]
fn binary_seeds_and_writes_log_file() {
    let fx = fixture();
    let path_log = fx.root.join("copy-data.log");

    let status = Command::new(env!("CARGO_BIN_EXE_irisseed"))
        .arg("--cpf")
        .arg(&fx.cpf)
        .arg("--data-dir")
        .arg(&fx.data)
        .arg("--root")
        .arg(&fx.root)
        .arg("--log-file")
        .arg(&path_log)
        .arg("--python")
        .status()
        .expect("run irisseed");

    assert!(status.success());
    assert_eq!(
        read_text(&fx.root.join("usr/irissys/mgr/user/IRIS.DAT")),
        "user-new"
    );
    let txt = read_text(&path_log);
    assert!(txt.contains("copying directory"));
    assert!(txt.contains("does not exist, skipped"));
}

#[test]
fn binary_exits_non_zero_on_fatal_error() {
    let fx = fixture();
    std::fs::remove_file(fx.data.join("usr/irissys/mgr/irisaudit/IRIS.DAT"))
        .expect("remove audit database");

    let output = Command::new(env!("CARGO_BIN_EXE_irisseed"))
        .arg("--cpf")
        .arg(&fx.cpf)
        .arg("--data-dir")
        .arg(&fx.data)
        .arg("--root")
        .arg(&fx.root)
        .arg("--log-file")
        .arg(fx.root.join("copy-data.log"))
        .output()
        .expect("run irisseed");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("IRISAUDIT"));
}
