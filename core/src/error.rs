use std::path::PathBuf;

use thiserror::Error;

use crate::events::EventKind;

/// Errors raised while decoding tracker records or loading their inputs.
///
/// Decoding errors are scoped to a single record: the processor decides whether
/// to skip the record or stop the stream.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: EventKind, reason: String },

    #[error("{kind} field `{field}` is not valid UTF-8: {source}")]
    InvalidEncoding {
        kind: EventKind,
        field: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("unknown tracker event kind {0}")]
    UnknownEventKind(u32),

    #[error("invalid record on line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    pub(crate) fn malformed(kind: EventKind, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }

    /// Errors that only affect one record and leave the stream usable.
    pub fn is_record_scoped(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::InvalidEncoding { .. } | Self::UnknownEventKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
