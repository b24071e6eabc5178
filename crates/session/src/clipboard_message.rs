//! Wire payload codec for `MSG_CLIPBOARD_TEXT` / `MSG_CLIPBOARD_FILES`.
//!
//! File-path payloads are metadata only: receiving one never triggers a
//! file transfer on its own (that needs an explicit `MSG_FILE_REQ`).

use crate::error::{Result, SessionError};

const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    Text(String),
    FilePaths(Vec<String>),
}

/// `{ length: u32, isFile: u8, reserved: [u8; 3] }` followed by either raw
/// text bytes, or (when `isFile`) `{ fileCount: u32 }` then that many
/// NUL-terminated path strings.
pub fn encode(payload: &ClipboardPayload) -> Vec<u8> {
    match payload {
        ClipboardPayload::Text(text) => {
            let body = text.as_bytes();
            let mut out = Vec::with_capacity(HEADER_LEN + body.len());
            out.extend_from_slice(&(body.len() as u32).to_le_bytes());
            out.push(0);
            out.extend_from_slice(&[0u8; 3]);
            out.extend_from_slice(body);
            out
        }
        ClipboardPayload::FilePaths(paths) => {
            let mut body = Vec::new();
            body.extend_from_slice(&(paths.len() as u32).to_le_bytes());
            for path in paths {
                body.extend_from_slice(path.as_bytes());
                body.push(0);
            }
            let mut out = Vec::with_capacity(HEADER_LEN + body.len());
            out.extend_from_slice(&(body.len() as u32).to_le_bytes());
            out.push(1);
            out.extend_from_slice(&[0u8; 3]);
            out.extend_from_slice(&body);
            out
        }
    }
}

pub fn decode(payload: &[u8]) -> Result<ClipboardPayload> {
    if payload.len() < HEADER_LEN {
        return Err(SessionError::Protocol("clipboard payload shorter than its header"));
    }
    let length = u32::from_le_bytes(payload[0..4].try_into().unwrap()) as usize;
    let is_file = payload[4];
    let body = payload.get(HEADER_LEN..HEADER_LEN + length).ok_or(SessionError::Protocol(
        "clipboard payload length field does not match the bytes received",
    ))?;

    if is_file == 0 {
        let text = String::from_utf8(body.to_vec())
            .map_err(|_| SessionError::Protocol("clipboard text payload is not valid UTF-8"))?;
        return Ok(ClipboardPayload::Text(text));
    }

    if body.len() < 4 {
        return Err(SessionError::Protocol("clipboard file payload missing file count"));
    }
    let file_count = u32::from_le_bytes(body[0..4].try_into().unwrap()) as usize;
    let mut paths = Vec::with_capacity(file_count);
    let mut rest = &body[4..];
    for _ in 0..file_count {
        let nul_at = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(SessionError::Protocol("clipboard file path missing NUL terminator"))?;
        let path = String::from_utf8(rest[..nul_at].to_vec())
            .map_err(|_| SessionError::Protocol("clipboard file path is not valid UTF-8"))?;
        paths.push(path);
        rest = &rest[nul_at + 1..];
    }
    Ok(ClipboardPayload::FilePaths(paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_round_trips() {
        let payload = ClipboardPayload::Text("hello clipboard".to_owned());
        assert_eq!(decode(&encode(&payload)).unwrap(), payload);
    }

    #[test]
    fn empty_text_round_trips() {
        let payload = ClipboardPayload::Text(String::new());
        assert_eq!(decode(&encode(&payload)).unwrap(), payload);
    }

    #[test]
    fn file_paths_round_trip() {
        let payload =
            ClipboardPayload::FilePaths(vec!["C:\\a.txt".to_owned(), "/home/user/b.png".to_owned()]);
        assert_eq!(decode(&encode(&payload)).unwrap(), payload);
    }

    #[test]
    fn zero_files_round_trips() {
        let payload = ClipboardPayload::FilePaths(Vec::new());
        assert_eq!(decode(&encode(&payload)).unwrap(), payload);
    }

    #[test]
    fn truncated_payload_is_rejected() {
        let mut bytes = encode(&ClipboardPayload::Text("abc".to_owned()));
        bytes.truncate(bytes.len() - 1);
        assert!(decode(&bytes).is_err());
    }
}
