//! Chat text extraction from a WhatsApp export archive.
//!
//! WhatsApp's "Export chat" produces a zip holding one `.txt` transcript
//! (plus media when exported with attachments). [`extract_chat_text`] scans
//! the archive's entries in central-directory order and decodes the first
//! entry whose name ends in `.txt` as UTF-8.
//!
//! Entry sizes declared in the archive are not trusted: at most `max_bytes`
//! of the transcript are read, and a longer entry is rejected.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn main() -> zapmetrics::Result<()> {
//! use zapmetrics::archive::{DEFAULT_MAX_CHAT_BYTES, extract_chat_file};
//!
//! let chat = extract_chat_file("WhatsApp Chat with Alice.zip", DEFAULT_MAX_CHAT_BYTES)?;
//! println!("{}: {} bytes", chat.file_name, chat.text.len());
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Result, ZapError};

const BOM: char = '\u{feff}';

/// Default cap on the decompressed transcript size (256 MiB).
pub const DEFAULT_MAX_CHAT_BYTES: usize = 256 * 1024 * 1024;

/// The decoded transcript and the archive entry it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedChat {
    /// Name of the `.txt` entry inside the archive.
    pub file_name: String,
    /// Full transcript, UTF-8 BOM removed.
    pub text: String,
}

/// Reads the first `.txt` entry of a zip archive.
///
/// # Errors
///
/// - [`ZapError::Zip`] if `reader` is not a readable zip
/// - [`ZapError::NoChatFile`] if no entry name ends in `.txt`
/// - [`ZapError::ChatTooLarge`] if the entry decompresses past `max_bytes`
/// - [`ZapError::Utf8`] if the entry is not valid UTF-8
pub fn extract_chat_text<R: Read + Seek>(reader: R, max_bytes: usize) -> Result<ExtractedChat> {
    let mut archive = ZipArchive::new(reader)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || !is_chat_entry(entry.name()) {
            continue;
        }

        let file_name = entry.name().to_string();
        let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
        let mut bytes = Vec::new();
        entry.by_ref().take(limit).read_to_end(&mut bytes)?;
        if bytes.len() > max_bytes {
            return Err(ZapError::chat_too_large(file_name, max_bytes));
        }

        let mut text = String::from_utf8(bytes).map_err(|e| ZapError::utf8(&file_name, e))?;
        if text.starts_with(BOM) {
            text.drain(..BOM.len_utf8());
        }

        tracing::debug!(entry = %file_name, chars = text.len(), "extracted chat transcript");
        return Ok(ExtractedChat { file_name, text });
    }

    Err(ZapError::no_chat_file(None))
}

/// Opens a zip file from disk and extracts its chat transcript.
///
/// The archive path is attached to a [`ZapError::NoChatFile`] error.
pub fn extract_chat_file(path: impl AsRef<Path>, max_bytes: usize) -> Result<ExtractedChat> {
    let path = path.as_ref();
    let file = BufReader::new(File::open(path)?);
    extract_chat_text(file, max_bytes).map_err(|e| match e {
        ZapError::NoChatFile { archive: None } => ZapError::no_chat_file(Some(path.to_path_buf())),
        other => other,
    })
}

fn is_chat_entry(name: &str) -> bool {
    name.ends_with(".txt")
}
