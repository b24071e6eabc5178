//! Wire payload codec for the file/folder transfer message family:
//! `MSG_FILE_START`, `MSG_FILE_ACK`, `MSG_FOLDER_START`, `MSG_FOLDER_ENTRY`.
//! `MSG_FILE_DATA` carries raw chunk bytes with no header of its own, and
//! `MSG_FILE_END` / `MSG_FOLDER_END` / `MSG_FILE_NONE` / `MSG_FILE_REQ`
//! carry empty payloads, so none of those need a codec here.

use crate::error::{Result, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStart {
    pub filename: String,
    pub total_chunks: u32,
    pub total_size: u64,
}

pub fn encode_file_start(start: &FileStart) -> Result<Vec<u8>> {
    let name = start.filename.as_bytes();
    let name_len = u16::try_from(name.len()).map_err(|_| SessionError::InvalidArgument("filename too long"))?;
    let mut out = Vec::with_capacity(14 + name.len());
    out.extend_from_slice(&start.total_chunks.to_le_bytes());
    out.extend_from_slice(&start.total_size.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(name);
    Ok(out)
}

pub fn decode_file_start(payload: &[u8]) -> Result<FileStart> {
    if payload.len() < 14 {
        return Err(SessionError::Protocol("file-start payload shorter than its header"));
    }
    let total_chunks = u32::from_le_bytes(payload[0..4].try_into().unwrap());
    let total_size = u64::from_le_bytes(payload[4..12].try_into().unwrap());
    let name_len = u16::from_le_bytes(payload[12..14].try_into().unwrap()) as usize;
    let name_bytes = payload
        .get(14..14 + name_len)
        .ok_or(SessionError::Protocol("file-start filename length exceeds payload"))?;
    let filename = String::from_utf8(name_bytes.to_vec())
        .map_err(|_| SessionError::Protocol("file-start filename is not valid UTF-8"))?;
    Ok(FileStart { filename, total_chunks, total_size })
}

#[must_use]
pub fn encode_file_ack(chunk_index: u32) -> [u8; 4] {
    chunk_index.to_le_bytes()
}

pub fn decode_file_ack(payload: &[u8]) -> Result<u32> {
    let bytes: [u8; 4] =
        payload.try_into().map_err(|_| SessionError::Protocol("file-ack payload must be 4 bytes"))?;
    Ok(u32::from_le_bytes(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderStart {
    pub folder_name: String,
    pub total_files: u32,
    pub total_folders: u32,
    pub total_size: u64,
}

pub fn encode_folder_start(start: &FolderStart) -> Result<Vec<u8>> {
    let name = start.folder_name.as_bytes();
    let name_len = u16::try_from(name.len()).map_err(|_| SessionError::InvalidArgument("folder name too long"))?;
    let mut out = Vec::with_capacity(18 + name.len());
    out.extend_from_slice(&start.total_files.to_le_bytes());
    out.extend_from_slice(&start.total_folders.to_le_bytes());
    out.extend_from_slice(&start.total_size.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(name);
    Ok(out)
}

pub fn decode_folder_start(payload: &[u8]) -> Result<FolderStart> {
    if payload.len() < 18 {
        return Err(SessionError::Protocol("folder-start payload shorter than its header"));
    }
    let total_files = u32::from_le_bytes(payload[0..4].try_into().unwrap());
    let total_folders = u32::from_le_bytes(payload[4..8].try_into().unwrap());
    let total_size = u64::from_le_bytes(payload[8..16].try_into().unwrap());
    let name_len = u16::from_le_bytes(payload[16..18].try_into().unwrap()) as usize;
    let name_bytes = payload
        .get(18..18 + name_len)
        .ok_or(SessionError::Protocol("folder-start name length exceeds payload"))?;
    let folder_name = String::from_utf8(name_bytes.to_vec())
        .map_err(|_| SessionError::Protocol("folder-start name is not valid UTF-8"))?;
    Ok(FolderStart { folder_name, total_files, total_folders, total_size })
}

const DIRECTORY_ATTR: u8 = 0b0000_0001;

pub fn encode_folder_entry(entry: &flist::FolderEntry) -> Result<Vec<u8>> {
    let path = entry.relative_path.as_bytes();
    let path_len =
        u16::try_from(path.len()).map_err(|_| SessionError::InvalidArgument("relative path too long"))?;
    let mut out = Vec::with_capacity(19 + path.len());
    out.push(if entry.is_directory { DIRECTORY_ATTR } else { 0 });
    out.extend_from_slice(&entry.size.to_le_bytes());
    out.extend_from_slice(&entry.last_write_time.to_le_bytes());
    out.extend_from_slice(&path_len.to_le_bytes());
    out.extend_from_slice(path);
    Ok(out)
}

pub fn decode_folder_entry(payload: &[u8]) -> Result<flist::FolderEntry> {
    if payload.len() < 19 {
        return Err(SessionError::Protocol("folder-entry payload shorter than its header"));
    }
    let is_directory = payload[0] & DIRECTORY_ATTR != 0;
    let size = u64::from_le_bytes(payload[1..9].try_into().unwrap());
    let last_write_time = u64::from_le_bytes(payload[9..17].try_into().unwrap());
    let path_len = u16::from_le_bytes(payload[17..19].try_into().unwrap()) as usize;
    let path_bytes = payload
        .get(19..19 + path_len)
        .ok_or(SessionError::Protocol("folder-entry path length exceeds payload"))?;
    let relative_path = String::from_utf8(path_bytes.to_vec())
        .map_err(|_| SessionError::Protocol("folder-entry path is not valid UTF-8"))?;
    Ok(flist::FolderEntry { relative_path, is_directory, size, last_write_time })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_start_round_trips() {
        let start = FileStart { filename: "report.pdf".to_owned(), total_chunks: 42, total_size: 1_376_256 };
        assert_eq!(decode_file_start(&encode_file_start(&start).unwrap()).unwrap(), start);
    }

    #[test]
    fn file_ack_round_trips() {
        assert_eq!(decode_file_ack(&encode_file_ack(7)).unwrap(), 7);
    }

    #[test]
    fn folder_start_round_trips() {
        let start = FolderStart {
            folder_name: "photos".to_owned(),
            total_files: 10,
            total_folders: 2,
            total_size: 5_000_000,
        };
        assert_eq!(decode_folder_start(&encode_folder_start(&start).unwrap()).unwrap(), start);
    }

    #[test]
    fn folder_entry_round_trips_a_directory() {
        let entry = flist::FolderEntry {
            relative_path: "a/b".to_owned(),
            is_directory: true,
            size: 0,
            last_write_time: 1_700_000_000,
        };
        assert_eq!(decode_folder_entry(&encode_folder_entry(&entry).unwrap()).unwrap(), entry);
    }

    #[test]
    fn folder_entry_round_trips_a_file() {
        let entry = flist::FolderEntry {
            relative_path: "a/b/file.txt".to_owned(),
            is_directory: false,
            size: 12345,
            last_write_time: 1_700_000_500,
        };
        assert_eq!(decode_folder_entry(&encode_folder_entry(&entry).unwrap()).unwrap(), entry);
    }
}
