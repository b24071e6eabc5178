use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::entry::{FolderEntry, FolderTotals};
use crate::error::{FlistError, Result};

/// Walks `root` depth-first, pre-order: a directory's entry precedes its
/// children, and children are visited in name order for determinism. The
/// root directory itself is not emitted as an entry — its name travels
/// separately in `MSG_FOLDER_START`.
pub fn walk_folder(root: &Path) -> Result<(FolderTotals, Vec<FolderEntry>)> {
    let mut entries = Vec::new();
    let mut totals = FolderTotals::default();
    walk_into(root, Path::new(""), &mut entries, &mut totals)?;
    Ok((totals, entries))
}

fn walk_into(root: &Path, relative: &Path, out: &mut Vec<FolderEntry>, totals: &mut FolderTotals) -> Result<()> {
    let absolute = root.join(relative);
    let mut children: Vec<_> = fs::read_dir(&absolute)
        .map_err(|source| FlistError::Io { path: absolute.display().to_string(), source })?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|source| FlistError::Io { path: absolute.display().to_string(), source })?;
    children.sort_by_key(std::fs::DirEntry::file_name);

    for child in children {
        let metadata = child
            .metadata()
            .map_err(|source| FlistError::Io { path: child.path().display().to_string(), source })?;
        let child_relative = relative.join(child.file_name());
        let relative_path = to_wire_path(&child_relative);
        let last_write_time = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map_or(0, |d| d.as_secs());

        if metadata.is_dir() {
            totals.total_folders += 1;
            out.push(FolderEntry { relative_path, is_directory: true, size: 0, last_write_time });
            walk_into(root, &child_relative, out, totals)?;
        } else {
            totals.total_files += 1;
            totals.total_size += metadata.len();
            out.push(FolderEntry { relative_path, is_directory: false, size: metadata.len(), last_write_time });
        }
    }
    Ok(())
}

fn to_wire_path(path: &Path) -> String {
    path.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect::<Vec<_>>().join("/")
}
