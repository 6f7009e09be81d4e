//! `[Databases]` reader for the INI-style instance configuration (`iris.cpf`).
//!
//! Parsing is delegated to `configparser` in case-sensitive mode with
//! multiline values, so section and key spelling is kept and entries come back
//! in file order. A line without a delimiter is a key with no value.

use std::fs;
use std::path::Path;

use configparser::ini::Ini;
use tracing::info;

use crate::conf::C_CPF_SECTION_DATABASES;
use crate::error::CpfError;
use crate::materialize::SpecDatabaseEntry;

/// Database entries of the `[Databases]` section, in file order.
///
/// An unreadable file, a parse failure and a missing section are all errors.
pub fn read_database_entries<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<SpecDatabaseEntry>, CpfError> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|source| CpfError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_database_entries(&String::from_utf8_lossy(&raw), path)?;
    info!("read {} database entries from {}", entries.len(), path.display());
    Ok(entries)
}

fn parse_database_entries(text: &str, path: &Path) -> Result<Vec<SpecDatabaseEntry>, CpfError> {
    let mut ini = Ini::new_cs();
    ini.set_multiline(true);
    let map_sections = ini
        .read(text.to_string())
        .map_err(|message| CpfError::Parse {
            path: path.to_path_buf(),
            message,
        })?;

    let section = map_sections
        .get(C_CPF_SECTION_DATABASES)
        .ok_or_else(|| CpfError::SectionNotFound {
            section: C_CPF_SECTION_DATABASES.to_string(),
        })?;
    Ok(section
        .iter()
        .map(|(key, value)| SpecDatabaseEntry {
            name: key.clone(),
            path_destination: value.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_database_entries, read_database_entries};
    use crate::error::CpfError;

    const C_CPF_SAMPLE: &str = "\
[ConfigFile]
Product=IRIS
Version=2024.1

[Databases]
IRISSYS=/usr/irissys/mgr/
IRISLIB=/usr/irissys/mgr/irislib/
IRISTEMP=/usr/irissys/mgr/iristemp/
USER=/usr/irissys/mgr/user/

[Namespaces]
%SYS=IRISSYS
USER=USER
";

    fn names(text: &str) -> Vec<String> {
        parse_database_entries(text, Path::new("iris.cpf"))
            .expect("entries")
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn entries_keep_file_order_and_spelling() {
        assert_eq!(names(C_CPF_SAMPLE), ["IRISSYS", "IRISLIB", "IRISTEMP", "USER"]);
        assert_eq!(names("[Databases]\nUser=/u\nirisaudit=/a\n"), ["User", "irisaudit"]);
    }

    #[test]
    fn entries_tolerate_missing_values_and_comments() {
        let entries = parse_database_entries(
            "[Databases]\n; comment\n# comment\nNOVALUE\nAPP = /data/app \n",
            Path::new("iris.cpf"),
        )
        .expect("entries");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "NOVALUE");
        assert_eq!(entries[0].path_destination, None);
        assert_eq!(entries[1].name, "APP");
        assert_eq!(entries[1].path_destination.as_deref(), Some("/data/app"));
    }

    #[test]
    fn repeated_sections_merge() {
        let txt = "[Databases]\nUSER=/a\n[Other]\nk=v\n[Databases]\nEXTRA=/d\n";
        assert_eq!(names(txt), ["USER", "EXTRA"]);
    }

    #[test]
    fn section_names_are_case_sensitive() {
        let err = parse_database_entries("[databases]\nUSER=/a\n", Path::new("iris.cpf"))
            .expect_err("must fail");
        assert!(matches!(err, CpfError::SectionNotFound { .. }));
    }

    #[test]
    fn read_database_entries_from_file() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path_cpf = tmp.path().join("iris.cpf");
        std::fs::write(&path_cpf, C_CPF_SAMPLE).expect("write cpf");

        let entries = read_database_entries(&path_cpf).expect("entries");
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].name, "USER");
        assert_eq!(
            entries[3].path_destination.as_deref(),
            Some("/usr/irissys/mgr/user/")
        );
    }

    #[test]
    fn read_missing_file_is_error() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = read_database_entries(tmp.path().join("absent.cpf")).expect_err("must fail");
        assert!(matches!(err, CpfError::Read { .. }));
    }
}
