use std::fs::{File, Metadata};
use std::io::Read;
use std::path::Path;

use tracing::warn;

/// Bytes sniffed from the head of a file; enough for both `infer` and
/// `content_inspector`.
const SNIFF_LEN: usize = 8192;

/// Detect the MIME type of `path` from its content.
///
/// Only regular files are opened.  Directories, FIFOs, sockets and device
/// nodes get their `inode/*` name from the metadata alone, since opening a
/// FIFO blocks until a writer shows up.
///
/// Magic numbers are matched with `infer`.  When nothing matches, empty
/// files report `inode/x-empty`, text content `text/plain` and anything
/// else `application/octet-stream`.
///
/// Returns `None` (and logs a warning) when the path cannot be read.
pub fn mime_type(path: &Path) -> Option<String> {
    let meta = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!("cannot detect MIME type of {}: {e}", path.display());
            return None;
        }
    };
    if let Some(name) = inode_mime(&meta) {
        return Some(name.to_string());
    }

    let mut head = Vec::with_capacity(SNIFF_LEN);
    let read = File::open(path).and_then(|f| f.take(SNIFF_LEN as u64).read_to_end(&mut head));
    if let Err(e) = read {
        warn!("cannot detect MIME type of {}: {e}", path.display());
        return None;
    }

    Some(mime_from_bytes(&head).to_string())
}

/// `inode/*` type for anything that is not a regular file.
fn inode_mime(meta: &Metadata) -> Option<&'static str> {
    let file_type = meta.file_type();
    if file_type.is_dir() {
        return Some("inode/directory");
    }
    if file_type.is_file() {
        return None;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        if file_type.is_fifo() {
            return Some("inode/fifo");
        }
        if file_type.is_char_device() {
            return Some("inode/chardevice");
        }
        if file_type.is_block_device() {
            return Some("inode/blockdevice");
        }
        if file_type.is_socket() {
            return Some("inode/socket");
        }
    }
    // metadata() follows symlinks, so nothing else should reach here
    Some("application/octet-stream")
}

/// MIME type for the leading bytes of a file.
pub fn mime_from_bytes(head: &[u8]) -> &'static str {
    if head.is_empty() {
        return "inode/x-empty";
    }
    if let Some(kind) = infer::get(head) {
        return kind.mime_type();
    }
    if content_inspector::inspect(head).is_text() {
        "text/plain"
    } else {
        "application/octet-stream"
    }
}
