use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PlatformError, Result};

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Stat {
    pub size: u64,
    pub is_directory: bool,
}

/// Filesystem operations the session layer needs for file/folder transfer
/// and clipboard file-path resolution.
pub trait FilesystemAdapter: Send {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
    fn stat(&self, path: &Path) -> Result<Stat>;
    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>>;
    fn open_write(&self, path: &Path) -> Result<Box<dyn Write + Send>>;
    fn delete(&self, path: &Path) -> Result<()>;
    fn mkdir_recursive(&self, path: &Path) -> Result<()>;

    /// The platform's "remembered" / most-recently-used folder, if any.
    fn active_folder(&self) -> Result<PathBuf>;
    /// The current user's desktop directory.
    fn desktop_path(&self) -> Result<PathBuf>;
}

/// A `std::fs`-backed adapter used on all platforms; `active_folder` and
/// `desktop_path` fall back to `$HOME` when no richer platform integration
/// is wired in.
pub struct NativeFilesystemAdapter;

impl FilesystemAdapter for NativeFilesystemAdapter {
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let mut out = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            out.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_directory: metadata.is_dir(),
                size: metadata.len(),
            });
        }
        Ok(out)
    }

    fn stat(&self, path: &Path) -> Result<Stat> {
        let metadata = fs::metadata(path)?;
        Ok(Stat { size: metadata.len(), is_directory: metadata.is_dir() })
    }

    fn open_read(&self, path: &Path) -> Result<Box<dyn Read + Send>> {
        Ok(Box::new(fs::File::open(path)?))
    }

    fn open_write(&self, path: &Path) -> Result<Box<dyn Write + Send>> {
        Ok(Box::new(fs::File::create(path)?))
    }

    fn delete(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn mkdir_recursive(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        Ok(())
    }

    fn active_folder(&self) -> Result<PathBuf> {
        std::env::var_os("HOME").map(PathBuf::from).ok_or(PlatformError::NotAvailable)
    }

    fn desktop_path(&self) -> Result<PathBuf> {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join("Desktop"))
            .ok_or(PlatformError::NotAvailable)
    }
}
