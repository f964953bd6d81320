//! Unified error types for zapmetrics.
//!
//! This module provides a single [`ZapError`] enum that covers every failure
//! the pipeline can surface. The variants map onto four user-visible classes:
//!
//! - **Archive format** - the upload is not a zip, or carries no `.txt` chat
//! - **Decode** - the chat file is not valid UTF-8
//! - **Empty result** - the chat parsed to zero messages
//! - **Internal** - I/O, serialization, templating, metrics registration
//!
//! Degenerate chart input (no emojis, too little text) is not an error; the
//! report carries an informational notice for those sections instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for zapmetrics operations.
///
/// # Example
///
/// ```rust
/// use zapmetrics::error::Result;
/// use zapmetrics::RecordSet;
///
/// fn my_function() -> Result<RecordSet> {
///     Ok(RecordSet::default())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ZapError>;

/// The error type for all zapmetrics operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ZapError {
    /// An I/O error occurred while reading the archive or writing output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The upload could not be read as a zip archive.
    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive contains no `.txt` entry.
    #[error("No .txt file found in archive{}", archive.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    NoChatFile {
        /// The archive path, if it came from disk
        archive: Option<PathBuf>,
    },

    /// The chat file decompresses past the configured size cap.
    #[error("Chat file {file} exceeds the {limit_bytes}-byte limit")]
    ChatTooLarge {
        /// Name of the archive entry
        file: String,
        /// The cap that was exceeded
        limit_bytes: usize,
    },

    /// The chat file is not valid UTF-8.
    #[error("UTF-8 encoding error in {file}: {source}")]
    Utf8 {
        /// Name of the archive entry being decoded
        file: String,
        /// The underlying UTF-8 error
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// The chat text parsed to zero messages.
    #[error("No messages found in chat export")]
    NoMessages,

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// HTML template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Metric registration or encoding failed.
    #[cfg(feature = "metrics")]
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// A configuration value is out of range or malformed.
    #[error("Invalid configuration for {key}: {message}")]
    InvalidConfig {
        /// The setting that was rejected
        key: &'static str,
        /// Description of what's wrong
        message: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ZapError {
    /// Creates a missing-chat-file error.
    pub fn no_chat_file(archive: Option<PathBuf>) -> Self {
        ZapError::NoChatFile { archive }
    }

    /// Creates an oversized-chat error for an archive entry.
    pub fn chat_too_large(file: impl Into<String>, limit_bytes: usize) -> Self {
        ZapError::ChatTooLarge {
            file: file.into(),
            limit_bytes,
        }
    }

    /// Creates a UTF-8 decode error for an archive entry.
    pub fn utf8(file: impl Into<String>, source: std::string::FromUtf8Error) -> Self {
        ZapError::Utf8 {
            file: file.into(),
            source,
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(key: &'static str, message: impl Into<String>) -> Self {
        ZapError::InvalidConfig {
            key,
            message: message.into(),
        }
    }

    /// Returns `true` if the upload itself was unusable (bad zip, no chat
    /// file, oversized chat file).
    pub fn is_archive_format(&self) -> bool {
        matches!(
            self,
            ZapError::Zip(_) | ZapError::NoChatFile { .. } | ZapError::ChatTooLarge { .. }
        )
    }

    /// Returns `true` if the chat file could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, ZapError::Utf8 { .. })
    }

    /// Returns `true` if parsing succeeded but produced no messages.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, ZapError::NoMessages)
    }

    /// Returns `true` if the failure was caused by the uploaded content
    /// rather than by this process.
    pub fn is_user_error(&self) -> bool {
        self.is_archive_format() || self.is_decode() || self.is_empty_result()
    }

    /// Returns the single message shown to the person who uploaded the file.
    pub fn user_message(&self) -> String {
        match self {
            ZapError::Zip(_) => "O arquivo enviado não é um ZIP válido.".to_string(),
            ZapError::NoChatFile { .. } => "Nenhum arquivo .txt encontrado no ZIP".to_string(),
            ZapError::ChatTooLarge { limit_bytes, .. } => format!(
                "A conversa descompactada excede o limite de {} MB.",
                limit_bytes.div_ceil(1024 * 1024)
            ),
            ZapError::Utf8 { file, .. } => {
                format!("O arquivo '{file}' não está codificado em UTF-8.")
            }
            ZapError::NoMessages => "Nenhuma mensagem encontrada.".to_string(),
            other => format!("Erro: {other}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
