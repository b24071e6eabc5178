use std::path::{Path, PathBuf};

use platform::FilesystemAdapter;

use crate::error::{Result, TransferError};

/// Resolves the folder a received file is written into, by priority:
/// an explicit path from the local application, else the platform's
/// remembered folder, else its desktop, else the platform drive root.
/// The chosen path must exist as a directory.
pub fn resolve_destination_folder(
    fs: &dyn FilesystemAdapter,
    explicit: Option<&Path>,
    drive_root: &Path,
) -> Result<PathBuf> {
    let candidates = [
        explicit.map(Path::to_path_buf),
        fs.active_folder().ok(),
        fs.desktop_path().ok(),
        Some(drive_root.to_path_buf()),
    ];

    for candidate in candidates.into_iter().flatten() {
        if let Ok(stat) = fs.stat(&candidate) {
            if stat.is_directory {
                return Ok(candidate);
            }
        }
    }
    Err(TransferError::NoDestinationFolder)
}
