use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::ReportCopyBuilder;

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _is_relative_to_base(path: &Path, base: &Path) -> bool {
    path.starts_with(base)
}

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

fn _normalize_path(path: &Path) -> PathBuf {
    match fs::canonicalize(path) {
        Ok(resolved) => resolved,
        Err(_) => _absolutize_path(path),
    }
}

/// `true` when one directory contains the other once links are resolved.
pub(crate) fn is_overlap(src: &Path, dst: &Path) -> bool {
    let src_resolved = _normalize_path(src);
    let dst_resolved = _normalize_path(dst);
    _is_relative_to_base(&dst_resolved, &src_resolved)
        || _is_relative_to_base(&src_resolved, &dst_resolved)
}

/// Map `path_src` under `path_dir_src` onto the same relative spot under `path_dir_dst`.
pub(crate) fn derive_destination_path(
    path_src: &Path,
    path_item_name: &str,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    path_dir_dst.join(
        path_src
            .strip_prefix(path_dir_src)
            .unwrap_or(Path::new(path_item_name)),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ConflictChecks

/// Record an error when `path_dst` exists but does not resolve to a directory.
///
/// Links are followed, so a link to a directory is merged into like the
/// directory itself.
pub(crate) fn should_error_dir_conflict(
    path_dst: &Path,
    builder_cp_report: &mut ReportCopyBuilder,
) -> bool {
    match fs::metadata(path_dst) {
        Ok(meta_dst) if !meta_dst.is_dir() => {
            let message = format!("Destination is not a directory: {}", path_dst.display());
            builder_cp_report.add_error(path_dst.to_path_buf(), message);
            true
        }
        _ => false,
    }
}

/// Record an error when `path_dst` resolves to a directory.
///
/// Any other existing entry is overwritten; a link to a file is written
/// through.
pub(crate) fn should_error_file_conflict(
    path_dst: &Path,
    builder_cp_report: &mut ReportCopyBuilder,
) -> bool {
    match fs::metadata(path_dst) {
        Ok(meta_dst) if meta_dst.is_dir() => {
            let message = format!("Destination is a directory: {}", path_dst.display());
            builder_cp_report.add_error(path_dst.to_path_buf(), message);
            true
        }
        _ => false,
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EntryWriters

/// Recreate the link at `path_src` as `path_dst`.
///
/// An existing non-directory entry at `path_dst` (including an older link) is
/// removed first; callers resolve directory conflicts before getting here.
pub(crate) fn create_symbolic_link(
    path_src: &Path,
    path_dst: &Path,
    builder_cp_report: &mut ReportCopyBuilder,
) {
    let target = match fs::read_link(path_src) {
        Ok(v) => v,
        Err(e) => {
            builder_cp_report.add_error(path_dst.to_path_buf(), e.to_string());
            return;
        }
    };

    if let Ok(meta_dst) = fs::symlink_metadata(path_dst)
        && !meta_dst.is_dir()
        && let Err(e) = fs::remove_file(path_dst)
    {
        builder_cp_report.add_error(path_dst.to_path_buf(), e.to_string());
        return;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::symlink;
        match symlink(&target, path_dst) {
            Ok(_) => builder_cp_report.add_copied(),
            Err(e) => builder_cp_report.add_error(path_dst.to_path_buf(), e.to_string()),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = target;
        let message = "Symbolic links are unsupported on this platform".to_string();
        builder_cp_report.add_error(path_dst.to_path_buf(), message);
    }
}

/// Copy file content, then carry permissions, timestamps and xattrs on Linux.
///
/// `fs::copy` opens the destination by path, so an existing link is written
/// through to its target.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    #[cfg(target_os = "linux")]
    apply_metadata_linux(path_file_src, path_file_dst)?;
    Ok(())
}

#[cfg(target_os = "linux")]
fn apply_metadata_linux(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
