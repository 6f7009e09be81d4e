//! Filesystem tree traversal and copy orchestration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::CopyTreeError;
use crate::util::{
    copy_file_with_metadata, create_symbolic_link, derive_destination_path, is_overlap,
    should_error_dir_conflict, should_error_file_conflict,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: String,
    if_is_symlink: bool,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: String,
    if_is_symlink: bool,
}

#[derive(Debug)]
struct SpecCopyContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    builder_cp_report: ReportCopyBuilder,
}

/// Merge the directory tree `dir_source` into `dir_destination`.
///
/// - source links are recreated as links, never followed;
/// - existing destination directories are merged into, and existing files are
///   overwritten;
/// - destination links are resolved like any other path, so a linked
///   destination root or subdirectory is written into and a linked file is
///   written through;
/// - regular files keep permissions, timestamps and extended attributes.
///
/// The destination root is created when missing. Entries are visited in name
/// order and copied one at a time.
///
/// Returns [`ReportCopy`] when the run completes (with possible per-entry errors
/// stored in the report). Returns [`CopyTreeError`] only for top-level setup and
/// validation failures, including a missing source directory.
pub fn copy_tree<P, Q>(dir_source: P, dir_destination: Q) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.exists() {
        return Err(CopyTreeError::SourceNotFound(path_dir_src));
    }
    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }
    if is_overlap(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source: path_dir_src,
            destination: path_dir_dst,
        });
    }
    fs::create_dir_all(&path_dir_dst).map_err(|e| CopyTreeError::DestinationInitFailed {
        path: path_dir_dst.clone(),
        message: e.to_string(),
    })?;

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src: path_dir_src.clone(),
        path_dir_dst,
        builder_cp_report: ReportCopyBuilder::default(),
    };

    walk_directory(&path_dir_src, &mut spec_cp_ctx);
    Ok(spec_cp_ctx.builder_cp_report.build())
}

/// Copy the single regular file `file_source` onto `file_destination`.
///
/// An existing destination file is overwritten. Content only: no permissions,
/// timestamps or attributes are carried beyond what the platform copy does.
/// A missing source surfaces as [`io::ErrorKind::NotFound`].
pub fn copy_file<P, Q>(file_source: P, file_destination: Q) -> io::Result<u64>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_file_src = file_source.as_ref();
    let path_file_dst = file_destination.as_ref();

    let meta_file_src = fs::metadata(path_file_src)
        .map_err(|e| io::Error::new(e.kind(), format!("{e}: {}", path_file_src.display())))?;
    if meta_file_src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Source is a directory: {}", path_file_src.display()),
        ));
    }
    if path_file_dst.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Destination is a directory: {}", path_file_dst.display()),
        ));
    }
    fs::copy(path_file_src, path_file_dst)
}

fn walk_directory(path_root: &Path, spec_cp_ctx: &mut SpecCopyContext) {
    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    let iter_entries = match fs::read_dir(path_root) {
        Ok(iter) => iter,
        Err(e) => {
            let message = format!("Failed to read directory ({e})");
            spec_cp_ctx.builder_cp_report.add_error(path_root.to_path_buf(), message);
            return;
        }
    };

    for _entry_res in iter_entries {
        let entry = match _entry_res {
            Ok(v) => v,
            Err(e) => {
                let message = format!("Failed to read directory entry ({e})");
                spec_cp_ctx.builder_cp_report.add_error(path_root.to_path_buf(), message);
                continue;
            }
        };

        let path_entry = entry.path();
        let c_name = entry.file_name().to_string_lossy().to_string();
        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx
                    .builder_cp_report
                    .add_error(path_entry, format!("Failed to inspect entry ({e})"));
                continue;
            }
        };

        let b_is_symlink = cfg_file_type.is_symlink();
        if cfg_file_type.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: c_name,
                if_is_symlink: false,
            });
        } else if b_is_symlink && path_entry.is_dir() {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: c_name,
                if_is_symlink: true,
            });
        } else if cfg_file_type.is_file() || b_is_symlink {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: c_name,
                if_is_symlink: b_is_symlink,
            });
        } else {
            spec_cp_ctx.builder_cp_report.add_scanned();
            spec_cp_ctx
                .builder_cp_report
                .add_warning(format!("Special file skipped: {}", path_entry.display()));
            spec_cp_ctx.builder_cp_report.add_skipped();
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for _dir_entry in l_dirs {
        let path_next = _dir_entry.path_dir_src_sub.clone();
        if handle_dir_entry(_dir_entry, spec_cp_ctx) {
            walk_directory(&path_next, spec_cp_ctx);
        }
    }

    for _file_entry in l_files {
        handle_file_entry(_file_entry, spec_cp_ctx);
    }
}

/// Recreate a source link (file or directory) as a link at the destination.
fn handle_symlink_entry(path_src: &Path, name_entry: &str, spec_cp_ctx: &mut SpecCopyContext) {
    let path_dst = derive_destination_path(
        path_src,
        name_entry,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );

    // A real directory is never swapped for a link; an older link is replaced.
    if let Ok(meta_dst) = fs::symlink_metadata(&path_dst)
        && meta_dst.is_dir()
    {
        let warning = format!("Existing directory not replaced by symlink: {}", path_dst.display());
        spec_cp_ctx.builder_cp_report.add_warning(warning);
        spec_cp_ctx.builder_cp_report.add_skipped();
        return;
    }

    if let Some(path_parent_dst) = path_dst.parent()
        && let Err(e) = fs::create_dir_all(path_parent_dst)
    {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dst, e.to_string());
        return;
    }

    create_symbolic_link(path_src, &path_dst, &mut spec_cp_ctx.builder_cp_report);
}

fn handle_dir_entry(spec_dir_entry: SpecDirEntry, spec_cp_ctx: &mut SpecCopyContext) -> bool {
    spec_cp_ctx.builder_cp_report.add_scanned();

    if spec_dir_entry.if_is_symlink {
        handle_symlink_entry(
            &spec_dir_entry.path_dir_src_sub,
            &spec_dir_entry.name_dir,
            spec_cp_ctx,
        );
        return false;
    }

    let path_dir_dst_sub = derive_destination_path(
        &spec_dir_entry.path_dir_src_sub,
        &spec_dir_entry.name_dir,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );
    if should_error_dir_conflict(&path_dir_dst_sub, &mut spec_cp_ctx.builder_cp_report) {
        return false;
    }

    if let Err(e) = fs::create_dir_all(&path_dir_dst_sub) {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_dir_dst_sub, e.to_string());
        return false;
    }
    spec_cp_ctx.builder_cp_report.add_copied();
    true
}

fn handle_file_entry(spec_file_entry: SpecFileEntry, spec_cp_ctx: &mut SpecCopyContext) {
    spec_cp_ctx.builder_cp_report.add_scanned();

    if spec_file_entry.if_is_symlink {
        handle_symlink_entry(
            &spec_file_entry.path_file_src,
            &spec_file_entry.name_file,
            spec_cp_ctx,
        );
        return;
    }

    let path_file_dst = derive_destination_path(
        &spec_file_entry.path_file_src,
        &spec_file_entry.name_file,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );

    if let Some(path_parent_dst) = path_file_dst.parent()
        && let Err(e) = fs::create_dir_all(path_parent_dst)
    {
        spec_cp_ctx
            .builder_cp_report
            .add_error(path_file_dst, e.to_string());
        return;
    }

    if should_error_file_conflict(&path_file_dst, &mut spec_cp_ctx.builder_cp_report) {
        return;
    }

    match copy_file_with_metadata(&spec_file_entry.path_file_src, &path_file_dst) {
        Ok(_) => spec_cp_ctx.builder_cp_report.add_copied(),
        Err(e) => spec_cp_ctx
            .builder_cp_report
            .add_error(path_file_dst, e.to_string()),
    }
}
