//! Drives a single file or folder transfer over an already-connected
//! [`PeerSession`], bridging the wire-level `MSG_FILE_*` / `MSG_FOLDER_*`
//! messages to the [`transfer`] and [`flist`] crates.

use std::path::Path;

use platform::FilesystemAdapter;
use wire::{PeerFrame, MSG_FILE_DATA, MSG_FILE_END, MSG_FILE_START, MSG_FOLDER_END, MSG_FOLDER_ENTRY, MSG_FOLDER_START};

use transfer::{validate_filename, ChunkReceiver, ChunkSender, TransferCancelToken};

use crate::error::{Result, SessionError};
use crate::event::SessionEvent;
use crate::peer_session::PeerSession;
use crate::transfer_message::{encode_file_start, encode_folder_entry, encode_folder_start, FileStart, FolderStart};

/// Sends `path` as a single-file transfer: `MSG_FILE_START`, then chunked
/// `MSG_FILE_DATA` paced by [`transfer::ChunkSender`], then `MSG_FILE_END`.
pub fn send_file(
    session: &PeerSession,
    fs: &dyn FilesystemAdapter,
    path: &Path,
    filename: &str,
    cancel: TransferCancelToken,
) -> Result<()> {
    validate_filename(filename)?;
    let stat = fs.stat(path)?;
    let reader = fs.open_read(path)?;

    let mut sender = ChunkSender::new(reader, stat.size, cancel)?;
    let start = FileStart { filename: filename.to_owned(), total_chunks: sender.total_chunks(), total_size: stat.size };
    send_frame(session, MSG_FILE_START, encode_file_start(&start)?)?;

    while let Some(chunk) = sender.next_chunk()? {
        send_frame(session, MSG_FILE_DATA, chunk)?;
    }
    send_frame(session, MSG_FILE_END, Vec::new())?;
    Ok(())
}

/// Blocks for `MSG_FILE_START`, validates its filename, then consumes
/// `MSG_FILE_DATA` frames until `MSG_FILE_END`. Any other frame in between
/// is a protocol violation that aborts the transfer without touching the
/// session's `Connected` state.
pub fn receive_file(
    session: &mut PeerSession,
    fs: &dyn FilesystemAdapter,
    destination_root: &Path,
) -> Result<std::path::PathBuf> {
    let start = match session.receive_next()? {
        SessionEvent::FileStartReceived(start) => start,
        _ => return Err(SessionError::Protocol("expected MSG_FILE_START")),
    };
    validate_filename(&start.filename)?;
    let dest_path = destination_root.join(&start.filename);

    let mut receiver = ChunkReceiver::create(fs, &dest_path, start.total_chunks)?;
    loop {
        match session.receive_next()? {
            SessionEvent::FileDataReceived(chunk) => receiver.write_chunk(&chunk),
            SessionEvent::FileEndReceived => break,
            _ => {
                receiver.finish(false)?;
                return Err(SessionError::Protocol("unexpected frame mid file transfer"));
            }
        }
    }
    receiver.finish(true)?;
    Ok(dest_path)
}

/// Sends a whole directory tree rooted at `root` as a folder transfer:
/// `MSG_FOLDER_START`, a depth-first `MSG_FOLDER_ENTRY` stream (directories
/// carry no body; files are immediately followed by their chunked body),
/// then `MSG_FOLDER_END`.
pub fn send_folder(
    session: &PeerSession,
    fs: &dyn FilesystemAdapter,
    root: &Path,
    folder_name: &str,
    cancel: TransferCancelToken,
) -> Result<()> {
    let (totals, entries) = flist::walk_folder(root)?;
    let start = FolderStart {
        folder_name: folder_name.to_owned(),
        total_files: totals.total_files,
        total_folders: totals.total_folders,
        total_size: totals.total_size,
    };
    send_frame(session, MSG_FOLDER_START, encode_folder_start(&start)?)?;

    for entry in &entries {
        send_frame(session, MSG_FOLDER_ENTRY, encode_folder_entry(entry)?)?;
        if entry.is_directory {
            continue;
        }
        let file_path = root.join(&entry.relative_path);
        let reader = fs.open_read(&file_path)?;
        let mut sender = ChunkSender::new(reader, entry.size, cancel.clone())?;
        while let Some(chunk) = sender.next_chunk()? {
            send_frame(session, MSG_FILE_DATA, chunk)?;
        }
    }
    send_frame(session, MSG_FOLDER_END, Vec::new())?;
    Ok(())
}

/// Receives a folder transfer into `destination_root`, creating directories
/// as encountered and guarding every entry's path against traversal via
/// [`flist::resolve_under_root`].
pub fn receive_folder(session: &mut PeerSession, fs: &dyn FilesystemAdapter, destination_root: &Path) -> Result<()> {
    match session.receive_next()? {
        SessionEvent::FolderStartReceived(_) => {}
        _ => return Err(SessionError::Protocol("expected MSG_FOLDER_START")),
    }

    loop {
        let entry = match session.receive_next()? {
            SessionEvent::FolderEntryReceived(entry) => entry,
            SessionEvent::FolderEndReceived => break,
            _ => return Err(SessionError::Protocol("unexpected frame mid folder transfer")),
        };
        let resolved = flist::resolve_under_root(destination_root, &entry.relative_path)?;

        if entry.is_directory {
            fs.mkdir_recursive(&resolved)?;
            continue;
        }
        if let Some(parent) = resolved.parent() {
            fs.mkdir_recursive(parent)?;
        }

        let total_chunks = transfer::total_chunks(entry.size)?;
        let mut receiver = ChunkReceiver::create(fs, &resolved, total_chunks)?;
        while !receiver.is_complete() {
            match session.receive_next()? {
                SessionEvent::FileDataReceived(chunk) => receiver.write_chunk(&chunk),
                _ => {
                    receiver.finish(false)?;
                    return Err(SessionError::Protocol("unexpected frame mid folder file body"));
                }
            }
        }
        receiver.finish(true)?;
    }
    Ok(())
}

/// Sends one frame, retrying a transient failure per
/// `transfer::retry_with_backoff` (100/200/300ms linear backoff, up to 3
/// additional attempts) before giving up.
fn send_frame(session: &PeerSession, message_kind: u8, payload: Vec<u8>) -> Result<()> {
    transfer::retry_with_backoff(|| session.send_raw_frame(PeerFrame::new(message_kind, 0, payload.clone())))
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::thread;

    use platform::NativeFilesystemAdapter;

    use super::*;
    use crate::handshake::Handshake;

    fn connected_pair() -> (PeerSession, PeerSession) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let host_local = Handshake::new(1, 0, 800, 600, wire::COMPRESSION_RLE);
        let host_thread = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            PeerSession::accept(stream, &host_local, 7).unwrap()
        });
        let controller_stream = std::net::TcpStream::connect(addr).unwrap();
        let controller = PeerSession::connect(controller_stream, Handshake::new(2, 7, 800, 600, wire::COMPRESSION_RLE)).unwrap();
        (host_thread.join().unwrap(), controller)
    }

    #[test]
    fn single_file_round_trips_over_a_live_session() {
        let (sender_session, mut receiver_session) = connected_pair();
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let src_path = src_dir.path().join("note.txt");
        std::fs::write(&src_path, b"hello transfer").unwrap();

        let fs = NativeFilesystemAdapter;
        let dest_root = dest_dir.path().to_path_buf();
        let receiver_thread =
            thread::spawn(move || receive_file(&mut receiver_session, &NativeFilesystemAdapter, &dest_root));

        send_file(&sender_session, &fs, &src_path, "note.txt", TransferCancelToken::new()).unwrap();
        let written = receiver_thread.join().unwrap().unwrap();
        assert_eq!(std::fs::read(written).unwrap(), b"hello transfer");
    }

    #[test]
    fn folder_round_trips_nested_entries() {
        let (sender_session, mut receiver_session) = connected_pair();
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(src_dir.path().join("sub")).unwrap();
        std::fs::write(src_dir.path().join("top.txt"), b"top").unwrap();
        std::fs::write(src_dir.path().join("sub/nested.txt"), b"nested").unwrap();

        let fs = NativeFilesystemAdapter;
        let src_root = src_dir.path().to_path_buf();
        let dest_root = dest_dir.path().to_path_buf();
        let receiver_thread =
            thread::spawn(move || receive_folder(&mut receiver_session, &NativeFilesystemAdapter, &dest_root));

        send_folder(&sender_session, &fs, &src_root, "pack", TransferCancelToken::new()).unwrap();
        receiver_thread.join().unwrap().unwrap();

        assert_eq!(std::fs::read(dest_dir.path().join("top.txt")).unwrap(), b"top");
        assert_eq!(std::fs::read(dest_dir.path().join("sub/nested.txt")).unwrap(), b"nested");
    }
}
