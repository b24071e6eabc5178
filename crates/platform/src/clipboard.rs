use std::path::PathBuf;

use crate::error::Result;

/// Get/set text and file-list metadata on the local clipboard.
pub trait ClipboardAdapter: Send {
    fn get_text(&self) -> Result<Option<String>>;
    fn set_text(&mut self, text: &str) -> Result<()>;
    fn list_file_paths(&self) -> Result<Vec<PathBuf>>;
    fn set_file_list(&mut self, paths: &[PathBuf]) -> Result<()>;
}

#[derive(Default)]
pub struct NullClipboard {
    text: Option<String>,
    files: Vec<PathBuf>,
}

impl ClipboardAdapter for NullClipboard {
    fn get_text(&self) -> Result<Option<String>> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_owned());
        Ok(())
    }

    fn list_file_paths(&self) -> Result<Vec<PathBuf>> {
        Ok(self.files.clone())
    }

    fn set_file_list(&mut self, paths: &[PathBuf]) -> Result<()> {
        self.files = paths.to_vec();
        Ok(())
    }
}
