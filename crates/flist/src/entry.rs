/// One `MSG_FOLDER_ENTRY` record: a file or directory discovered during a
/// depth-first pre-order walk, relative to the folder being sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// Forward-slash separated, relative to the transfer root.
    pub relative_path: String,
    pub is_directory: bool,
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub last_write_time: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderTotals {
    pub total_files: u32,
    pub total_folders: u32,
    pub total_size: u64,
}
